use super::*;

/// A color-type and bit-depth pairing, as the `IHDR` declares it.
///
/// `Y` is greyscale, `I` is indexed-color, `A` is alpha. The number is the
/// bit depth per channel (per index, for indexed-color). Only the pairings
/// the PNG spec defines exist here; everything else fails header parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum PngPixelFormat {
  Y1,
  Y2,
  Y4,
  Y8,
  Y16,
  RGB8,
  RGB16,
  I1,
  I2,
  I4,
  I8,
  YA8,
  YA16,
  RGBA8,
  RGBA16,
}
impl PngPixelFormat {
  /// Builds the format from the `IHDR`'s `(bit_depth, color_type)` bytes.
  #[inline]
  #[must_use]
  pub const fn from_depth_and_color(bit_depth: u8, color_type: u8) -> Option<Self> {
    Some(match (bit_depth, color_type) {
      (1, 0) => PngPixelFormat::Y1,
      (2, 0) => PngPixelFormat::Y2,
      (4, 0) => PngPixelFormat::Y4,
      (8, 0) => PngPixelFormat::Y8,
      (16, 0) => PngPixelFormat::Y16,
      (8, 2) => PngPixelFormat::RGB8,
      (16, 2) => PngPixelFormat::RGB16,
      (1, 3) => PngPixelFormat::I1,
      (2, 3) => PngPixelFormat::I2,
      (4, 3) => PngPixelFormat::I4,
      (8, 3) => PngPixelFormat::I8,
      (8, 4) => PngPixelFormat::YA8,
      (16, 4) => PngPixelFormat::YA16,
      (8, 6) => PngPixelFormat::RGBA8,
      (16, 6) => PngPixelFormat::RGBA16,
      _ => return None,
    })
  }

  /// The `(bit_depth, color_type)` bytes for this format.
  #[inline]
  #[must_use]
  pub const fn to_depth_and_color(self) -> (u8, u8) {
    match self {
      PngPixelFormat::Y1 => (1, 0),
      PngPixelFormat::Y2 => (2, 0),
      PngPixelFormat::Y4 => (4, 0),
      PngPixelFormat::Y8 => (8, 0),
      PngPixelFormat::Y16 => (16, 0),
      PngPixelFormat::RGB8 => (8, 2),
      PngPixelFormat::RGB16 => (16, 2),
      PngPixelFormat::I1 => (1, 3),
      PngPixelFormat::I2 => (2, 3),
      PngPixelFormat::I4 => (4, 3),
      PngPixelFormat::I8 => (8, 3),
      PngPixelFormat::YA8 => (8, 4),
      PngPixelFormat::YA16 => (16, 4),
      PngPixelFormat::RGBA8 => (8, 6),
      PngPixelFormat::RGBA16 => (16, 6),
    }
  }

  /// Whole bytes per pixel, with sub-byte formats rounding up to 1.
  ///
  /// This is the stride the scanline filters work at ("filters are applied
  /// to bytes, not to pixels"), and it's also what the BMP encoder spends
  /// per pixel when re-encoding a PNG-sourced image.
  #[inline]
  #[must_use]
  pub const fn bytes_per_pixel(self) -> u32 {
    match self {
      PngPixelFormat::Y1
      | PngPixelFormat::Y2
      | PngPixelFormat::Y4
      | PngPixelFormat::Y8
      | PngPixelFormat::I1
      | PngPixelFormat::I2
      | PngPixelFormat::I4
      | PngPixelFormat::I8 => 1,
      PngPixelFormat::Y16 | PngPixelFormat::YA8 => 2,
      PngPixelFormat::RGB8 => 3,
      PngPixelFormat::YA16 | PngPixelFormat::RGBA8 => 4,
      PngPixelFormat::RGB16 => 6,
      PngPixelFormat::RGBA16 => 8,
    }
  }
}

/// The parsed fields of an `IHDR` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ihdr {
  /// Image width in pixels.
  pub width: u32,
  /// Image height in pixels.
  pub height: u32,
  /// The color-type / bit-depth pairing.
  pub pixel_format: PngPixelFormat,
  /// Whether the stream declares Adam7 interlacing.
  pub is_interlaced: bool,
}
impl Ihdr {
  /// Parses an `IHDR` payload.
  ///
  /// ## Failure
  /// * The payload must be exactly 13 bytes, the compression and filter
  ///   method bytes must both be 0, and the interlace byte must be 0 or 1.
  pub fn from_chunk_data(data: &[u8]) -> PngResult<Self> {
    if data.len() != 13 || data[10] != 0 || data[11] != 0 || data[12] > 1 {
      return Err(PngError::IllegalIhdr);
    }
    let pixel_format = PngPixelFormat::from_depth_and_color(data[8], data[9])
      .ok_or(PngError::IllegalColorTypeBitDepthCombination)?;
    Ok(Self {
      width: u32_be(&data[0..4]),
      height: u32_be(&data[4..8]),
      pixel_format,
      is_interlaced: data[12] == 1,
    })
  }

  /// Serializes these fields back into a 13-byte `IHDR` payload.
  #[must_use]
  pub fn to_chunk_data(self) -> [u8; 13] {
    let mut data = [0_u8; 13];
    data[0..4].copy_from_slice(&self.width.to_be_bytes());
    data[4..8].copy_from_slice(&self.height.to_be_bytes());
    let (depth, color) = self.pixel_format.to_depth_and_color();
    data[8] = depth;
    data[9] = color;
    // compression and filter method stay 0
    data[12] = self.is_interlaced as u8;
    data
  }
}
