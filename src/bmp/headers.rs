use super::*;

/// The 14-byte header at the start of every BMP file.
///
/// Note: all multi-byte values in BMP are little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BmpFileHeader {
  /// The file tag; this crate reads and writes only `BM`.
  pub tag: AsciiArray<2>,
  /// Declared total size of the file.
  pub file_size: u32,
  /// Offset of the pixel array from the start of the file.
  pub pixel_data_offset: u32,
}
impl From<[u8; 14]> for BmpFileHeader {
  #[inline]
  #[must_use]
  fn from(a: [u8; 14]) -> Self {
    Self {
      tag: AsciiArray(a[0..2].try_into().unwrap()),
      file_size: u32_le(&a[2..6]),
      // bytes 6..10 are two reserved u16s
      pixel_data_offset: u32_le(&a[10..14]),
    }
  }
}
impl From<BmpFileHeader> for [u8; 14] {
  #[inline]
  #[must_use]
  fn from(h: BmpFileHeader) -> Self {
    let mut a = [0; 14];
    a[0..2].copy_from_slice(h.tag.as_bytes());
    a[2..6].copy_from_slice(&h.file_size.to_le_bytes());
    a[10..14].copy_from_slice(&h.pixel_data_offset.to_le_bytes());
    a
  }
}

/// The 40-byte `BITMAPINFOHEADER`, the plain modern DIB header.
///
/// The V4 header this crate writes for 32-bpp output starts with these same
/// 40 bytes (with its own size in the first field) and appends
/// [`V4_STATIC_TAIL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BmpInfoHeader {
  /// Width in pixels.
  pub width: i32,
  /// Height in pixels. Negative means the rows are stored top-down
  /// instead of the usual bottom-up.
  pub height: i32,
  /// Color planes; always 1.
  pub color_planes: u16,
  /// Bits per pixel.
  pub bits_per_pixel: u16,
  /// Compression: 0 is uncompressed (`BI_RGB`), 3 is `BI_BITFIELDS`.
  pub compression: u32,
  /// Size of the pixel data in bytes (may be 0 for `BI_RGB`).
  pub data_size: u32,
  /// Horizontal resolution, pixels per meter.
  pub h_ppm: i32,
  /// Vertical resolution, pixels per meter.
  pub v_ppm: i32,
  /// Palette entry count (0 means "all of them").
  pub palette_len: u32,
  /// "Important" color count; universally ignored.
  pub important_colors: u32,
}
impl BmpInfoHeader {
  /// Parses the 40 header bytes *after* the leading size field.
  ///
  /// The caller has already consumed the `u32` header-size and decided
  /// these bytes are an info-header variant, so the slice here starts at
  /// the width field.
  pub fn from_bytes(a: &[u8; 36]) -> BmpResult<Self> {
    let color_planes = u16::from_le_bytes(a[8..10].try_into().unwrap());
    if color_planes != 1 {
      return Err(BmpError::IllegalColorPlanes);
    }
    Ok(Self {
      width: i32_le(&a[0..4]),
      height: i32_le(&a[4..8]),
      color_planes,
      bits_per_pixel: u16::from_le_bytes(a[10..12].try_into().unwrap()),
      compression: u32_le(&a[12..16]),
      data_size: u32_le(&a[16..20]),
      h_ppm: i32_le(&a[20..24]),
      v_ppm: i32_le(&a[24..28]),
      palette_len: u32_le(&a[28..32]),
      important_colors: u32_le(&a[32..36]),
    })
  }

  /// Serializes as a full 40-byte `BITMAPINFOHEADER`, including the size
  /// field (`size` lets the V4 writer reuse this for its first 40 bytes).
  #[must_use]
  pub fn to_bytes(self, size: u32) -> [u8; 40] {
    let mut a = [0; 40];
    a[0..4].copy_from_slice(&size.to_le_bytes());
    a[4..8].copy_from_slice(&self.width.to_le_bytes());
    a[8..12].copy_from_slice(&self.height.to_le_bytes());
    a[12..14].copy_from_slice(&self.color_planes.to_le_bytes());
    a[14..16].copy_from_slice(&self.bits_per_pixel.to_le_bytes());
    a[16..20].copy_from_slice(&self.compression.to_le_bytes());
    a[20..24].copy_from_slice(&self.data_size.to_le_bytes());
    a[24..28].copy_from_slice(&self.h_ppm.to_le_bytes());
    a[28..32].copy_from_slice(&self.v_ppm.to_le_bytes());
    a[32..36].copy_from_slice(&self.palette_len.to_le_bytes());
    a[36..40].copy_from_slice(&self.important_colors.to_le_bytes());
    a
  }
}

/// Uncompressed pixel data (`BI_RGB`).
pub const BMP_COMPRESSION_RGB: u32 = 0;
/// Channel positions given by explicit bit masks (`BI_BITFIELDS`).
pub const BMP_COMPRESSION_BITFIELDS: u32 = 3;

/// Size of the plain info header.
pub const INFO_HEADER_SIZE: u32 = 40;
/// Size of the `BITMAPV4HEADER` used for 32-bpp output.
pub const V4_HEADER_SIZE: u32 = 108;

/// The fixed tail of the V4 header: channel masks, color space, endpoints,
/// and gamma.
///
/// The masks pin the stored `u32` (little-endian) to red in the top byte
/// down through alpha in the bottom byte, which makes a stored pixel word
/// byte-identical to this crate's canonical `0xRRGGBBAA` layout. The color
/// space is `LCS_WINDOWS_COLOR_SPACE` ("Win ", little-endian), with the
/// endpoint and gamma fields left zero as that color space requires.
pub const V4_STATIC_TAIL: [u8; 68] = {
  let mut a = [0_u8; 68];
  // red mask 0xFF000000
  a[3] = 0xFF;
  // green mask 0x00FF0000
  a[6] = 0xFF;
  // blue mask 0x0000FF00
  a[9] = 0xFF;
  // alpha mask 0x000000FF
  a[12] = 0xFF;
  // LCS_WINDOWS_COLOR_SPACE = 'Win ' stored little-endian
  a[16] = b' ';
  a[17] = b'n';
  a[18] = b'i';
  a[19] = b'W';
  a
};
