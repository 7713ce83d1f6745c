use super::*;
use crate::pixels::{alpha8, narrow_16, unpack_rgba8};

/// The direction pixels are walked while serializing rows.
///
/// The first word is the direction *within* a row (`Right` is the normal
/// left-to-right), the second is the direction *between* rows (`Down` is
/// the normal top-to-bottom).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RowOrder {
  /// Left-to-right, top-to-bottom. What you almost always want.
  #[default]
  RightDown,
  /// Left-to-right, bottom-to-top.
  RightUp,
  /// Right-to-left, top-to-bottom.
  LeftDown,
  /// Right-to-left, bottom-to-top.
  LeftUp,
}
impl RowOrder {
  /// Whether rows are walked left-to-right.
  #[inline]
  #[must_use]
  pub const fn is_rightward(self) -> bool {
    matches!(self, RowOrder::RightDown | RowOrder::RightUp)
  }
  /// Whether rows are emitted top first.
  #[inline]
  #[must_use]
  pub const fn is_downward(self) -> bool {
    matches!(self, RowOrder::RightDown | RowOrder::LeftDown)
  }
}

/// What channel layout the encoded PNG should declare and spend bytes on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PngEncodeFormat {
  /// Four bytes per pixel; color type 6 at depth 8.
  #[default]
  Rgba,
  /// Three bytes per pixel; color type 2 at depth 8.
  Rgb,
  /// Luma and alpha as the two halves of a 16-bit grey sample: color type
  /// 0 at depth 16, two bytes per pixel.
  LuminanceAlpha,
  /// Alpha alone as an 8-bit grey sample: color type 0 at depth 8, one
  /// byte per pixel.
  Alpha,
}
impl PngEncodeFormat {
  const fn pixel_format(self) -> PngPixelFormat {
    match self {
      PngEncodeFormat::Rgba => PngPixelFormat::RGBA8,
      PngEncodeFormat::Rgb => PngPixelFormat::RGB8,
      PngEncodeFormat::LuminanceAlpha => PngPixelFormat::Y16,
      PngEncodeFormat::Alpha => PngPixelFormat::Y8,
    }
  }
  const fn bytes_per_pixel(self) -> u32 {
    match self {
      PngEncodeFormat::Rgba => 4,
      PngEncodeFormat::Rgb => 3,
      PngEncodeFormat::LuminanceAlpha => 2,
      PngEncodeFormat::Alpha => 1,
    }
  }
}

/// Settings for [`encode_png_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PngEncodeOptions {
  /// Channel layout of the output.
  pub format: PngEncodeFormat,
  /// Pixel walk order.
  pub order: RowOrder,
}

/// Encodes an image as a PNG stream with the default options (RGBA, normal
/// row order).
#[must_use]
pub fn encode_png(image: &Image) -> Vec<u8> {
  encode_png_with(image, PngEncodeOptions::default())
}

/// Encodes an image as a PNG stream.
///
/// The image is forced first if it's deferred. Encoding is total: even an
/// image with no pixels yields a well-formed (if empty) stream. Pixels
/// missing from short rows are written as the zero pixel.
///
/// Every scanline is Sub-filtered and the whole payload goes through the
/// zlib collaborator as a single `IDAT` chunk.
#[must_use]
pub fn encode_png_with(image: &Image, options: PngEncodeOptions) -> Vec<u8> {
  let raster = image.forced_pixels();
  let width = image.meta().width();
  let height = image.meta().height();
  let bpp = options.format.bytes_per_pixel();

  let ys: Vec<usize> = if options.order.is_downward() {
    (0..height as usize).collect()
  } else {
    (0..height as usize).rev().collect()
  };
  let xs: Vec<usize> = if options.order.is_rightward() {
    (0..width as usize).collect()
  } else {
    (0..width as usize).rev().collect()
  };

  let mut raw: Vec<u8> = Vec::with_capacity((height as usize) * (1 + width as usize * bpp as usize));
  let mut line: Vec<u8> = Vec::with_capacity(width as usize * bpp as usize);
  for &y in ys.iter() {
    line.clear();
    for &x in xs.iter() {
      let px = raster.cell_or(x, y, 0);
      match options.format {
        PngEncodeFormat::Rgba => line.extend_from_slice(&unpack_rgba8(px)),
        PngEncodeFormat::Rgb => line.extend_from_slice(&unpack_rgba8(px)[..3]),
        PngEncodeFormat::LuminanceAlpha => {
          let w16 = narrow_16(px);
          line.extend_from_slice(&[(w16 >> 8) as u8, w16 as u8]);
        }
        PngEncodeFormat::Alpha => line.push(alpha8(px)),
      }
    }
    sub_filter_scanline(&line, bpp, &mut raw);
  }

  let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&raw, 6);
  log::trace!("png encode: {width}x{height}, {} -> {} bytes", raw.len(), compressed.len());

  let ihdr = Ihdr {
    width,
    height,
    pixel_format: options.format.pixel_format(),
    is_interlaced: false,
  };
  let mut out: Vec<u8> = Vec::with_capacity(compressed.len() + 64);
  out.extend_from_slice(&PNG_SIGNATURE);
  push_chunk(&mut out, *b"IHDR", &ihdr.to_chunk_data());
  push_chunk(&mut out, *b"IDAT", &compressed);
  push_chunk(&mut out, *b"IEND", &[]);
  out
}

fn push_chunk(out: &mut Vec<u8>, kind: [u8; 4], data: &[u8]) {
  out.extend_from_slice(&(data.len() as u32).to_be_bytes());
  out.extend_from_slice(&kind);
  out.extend_from_slice(data);
  let crc = compute_crc(kind.iter().copied().chain(data.iter().copied()));
  out.extend_from_slice(&crc.to_be_bytes());
}
