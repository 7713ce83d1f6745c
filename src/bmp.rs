#![forbid(unsafe_code)]

//! BMP decoding and encoding.
//!
//! Note: all multi-byte values in BMP are little-endian.
//!
//! The file layout this module works with:
//!
//! * A 14-byte file header: a two-letter tag (`BM` here), the file size,
//!   and the offset of the pixel array. The decoder seeks straight to that
//!   offset, so color tables, bit-mask blocks, and gap bytes between the
//!   headers and the pixels are skipped without being interpreted.
//! * A DIB info header. Many sizes of this exist; the first 4 bytes give
//!   the size. Every variant this module cares about opens with the same
//!   width/height/planes/bpp/compression fields, so the decoder reads
//!   those and ignores whatever tail the declared size implies.
//! * The pixel array: rows padded to 4-byte alignment, normally stored
//!   bottom-up. A negative declared height flips that to top-down, and the
//!   decoder honors the flip.
//!
//! Supported pixel depths are 8, 16, 24, and 32 bits. Pixels are read
//! little-endian at their stored width and widened to canonical words by
//! the [`pixels`](crate::pixels) adapters; indexed/palette interpretation
//! of 8-bit data is deliberately not attempted.
//!
//! Encoding picks its header by depth: 32-bpp output gets the 122-byte
//! `BITMAPV4HEADER` form with `BI_BITFIELDS` masks that pin the stored
//! `u32` to the canonical channel order; everything narrower gets the
//! classic 54-byte `BITMAPINFOHEADER` form with `BI_RGB`.

use alloc::{boxed::Box, vec::Vec};

use crate::{
  ascii_array::AsciiArray,
  image::{Image, Meta},
  pixels::{narrow_16, narrow_24, narrow_8, widen_16, widen_24, widen_8},
  raster::Raster,
  util::{i32_le, u32_le},
};

mod headers;
pub use headers::*;

/// Things that can go wrong while reading BMP data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum BmpError {
  /// The file tag isn't `BM`.
  ThisIsProbablyNotABmpFile,
  /// The buffer ended before the header or pixel data did.
  InsufficientBytes,
  /// The color-planes field wasn't 1.
  IllegalColorPlanes,
  /// Bits per pixel other than 8, 16, 24, or 32.
  IllegalBitDepth,
}
/// Alias for BMP results.
pub type BmpResult<T> = Result<T, BmpError>;

/// Decodes BMP bytes into a deferred [`Image`].
///
/// The headers are parsed eagerly; the pixel rows are read when the image
/// is forced.
///
/// ## Failure
/// * `None` for a bad tag, a truncated header, a color-plane count other
///   than 1, or a bit depth outside {8, 16, 24, 32}. A failure inside the
///   deferred pixel pass (truncated pixel data, usually) yields an image
///   with an empty grid instead.
#[must_use]
pub fn decode_bmp(bytes: &[u8]) -> Option<Image> {
  let (file, info, dib_header_size) = match parse_bmp_headers(bytes) {
    Ok(parts) => parts,
    Err(err) => {
      log::debug!("bmp header rejected: {err:?}");
      return None;
    }
  };
  let meta = Meta::Bmp {
    file_size: file.file_size,
    pixel_start: file.pixel_data_offset,
    dib_header_size,
    width: info.width.unsigned_abs(),
    height: info.height.unsigned_abs(),
    color_planes: info.color_planes,
    bits_per_pixel: info.bits_per_pixel,
    compression: info.compression,
    data_size: info.data_size,
  };
  let owned: Vec<u8> = bytes.to_vec();
  let producer = move |meta: &Meta| match decode_bmp_pixels(&owned, file, info) {
    Ok(raster) => Image::Raw(meta.clone(), raster),
    Err(err) => {
      log::debug!("bmp pixel pass failed: {err:?}");
      Image::Raw(meta.clone(), Raster::default())
    }
  };
  Some(Image::Lazy(meta, Box::new(producer)))
}

fn parse_bmp_headers(bytes: &[u8]) -> BmpResult<(BmpFileHeader, BmpInfoHeader, u32)> {
  let (file_bytes, rest) = crate::util::try_pull_byte_array::<14>(bytes)
    .ok_or(BmpError::InsufficientBytes)?;
  let file = BmpFileHeader::from(file_bytes);
  if file.tag != AsciiArray(*b"BM") {
    return Err(BmpError::ThisIsProbablyNotABmpFile);
  }
  let (size_bytes, rest) =
    crate::util::try_pull_byte_array::<4>(rest).ok_or(BmpError::InsufficientBytes)?;
  let dib_header_size = u32::from_le_bytes(size_bytes);
  let (field_bytes, _rest) =
    crate::util::try_pull_byte_array::<36>(rest).ok_or(BmpError::InsufficientBytes)?;
  let info = BmpInfoHeader::from_bytes(&field_bytes)?;
  if ![8, 16, 24, 32].contains(&info.bits_per_pixel) {
    return Err(BmpError::IllegalBitDepth);
  }
  log::trace!(
    "bmp header: {}x{} @ {} bpp, pixels at {}",
    info.width,
    info.height,
    info.bits_per_pixel,
    file.pixel_data_offset
  );
  Ok((file, info, dib_header_size))
}

fn decode_bmp_pixels(
  bytes: &[u8], file: BmpFileHeader, info: BmpInfoHeader,
) -> BmpResult<Raster> {
  let w = info.width.unsigned_abs() as usize;
  let h = info.height.unsigned_abs() as usize;
  let bytes_per_px = (info.bits_per_pixel / 8) as usize;
  let row_bytes = w * bytes_per_px;
  let stride = row_bytes + row_padding(w as u32, bytes_per_px as u32) as usize;

  let data =
    bytes.get(file.pixel_data_offset as usize..).ok_or(BmpError::InsufficientBytes)?;
  // the final row's padding is allowed to be missing; the dimensions here
  // are whatever the header claimed, so the math has to be checked
  let needed = if h == 0 {
    0
  } else {
    stride
      .checked_mul(h - 1)
      .and_then(|v| v.checked_add(row_bytes))
      .ok_or(BmpError::InsufficientBytes)?
  };
  if data.len() < needed {
    return Err(BmpError::InsufficientBytes);
  }

  let mut rows: Vec<Vec<u32>> = Vec::with_capacity(h);
  for r in 0..h {
    let line = &data[r * stride..r * stride + row_bytes];
    let mut row: Vec<u32> = Vec::with_capacity(w);
    for px_bytes in line.chunks_exact(bytes_per_px) {
      let mut word: u32 = 0;
      for (i, &b) in px_bytes.iter().enumerate() {
        word |= (b as u32) << (8 * i as u32);
      }
      row.push(match bytes_per_px {
        1 => widen_8(word),
        2 => widen_16(word),
        3 => widen_24(word),
        _ => word,
      });
    }
    rows.push(row);
  }
  if info.height >= 0 {
    // stored bottom-up; flip to top-first
    rows.reverse();
  }
  Ok(Raster { rows })
}

/// Bytes of zero padding appended to each row to reach 4-byte alignment.
#[inline]
#[must_use]
pub const fn row_padding(width: u32, bytes_per_pixel: u32) -> u32 {
  // only the product's low two bits matter
  (4 - width.wrapping_mul(bytes_per_pixel) % 4) % 4
}

/// Settings for [`encode_bmp_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpEncodeOptions {
  /// Walk each row left-to-right (the default). `false` flips each row.
  pub order_right: bool,
  /// Store rows bottom-up, BMP's usual layout (the default). `false`
  /// stores them top-down *without* flipping the declared height sign,
  /// which a round-trip through [`decode_bmp`] will show as a vertical
  /// flip.
  pub order_up: bool,
}
impl Default for BmpEncodeOptions {
  #[inline]
  fn default() -> Self {
    Self { order_right: true, order_up: true }
  }
}

/// Encodes an image as a BMP file, spending the bytes-per-pixel its header
/// declares (clamped into 1 through 4).
#[must_use]
pub fn encode_bmp(image: &Image) -> Vec<u8> {
  encode_bmp_with(image, BmpEncodeOptions::default())
}

/// Encodes an image as a BMP file with explicit options.
#[must_use]
pub fn encode_bmp_with(image: &Image, options: BmpEncodeOptions) -> Vec<u8> {
  let bytes_per_px = image.meta().bytes_per_pixel().clamp(1, 4);
  encode_bmp_at(image, bytes_per_px, options)
}

/// Encodes an image as a 24-bpp BMP (54-byte header, `BI_RGB`), dropping
/// alpha.
#[must_use]
pub fn encode_bmp24(image: &Image) -> Vec<u8> {
  encode_bmp_at(image, 3, BmpEncodeOptions::default())
}

/// Encodes an image as a 32-bpp BMP (122-byte header, `BI_BITFIELDS`
/// masks), keeping alpha.
#[must_use]
pub fn encode_bmp32(image: &Image) -> Vec<u8> {
  encode_bmp_at(image, 4, BmpEncodeOptions::default())
}

fn encode_bmp_at(image: &Image, bytes_per_px: u32, options: BmpEncodeOptions) -> Vec<u8> {
  let raster = image.forced_pixels();
  let w = image.meta().width();
  let h = image.meta().height();
  let row_bytes = (w * bytes_per_px) as usize;
  let pad = row_padding(w, bytes_per_px) as usize;
  let stride = row_bytes + pad;
  let data_size = (stride * h as usize) as u32;

  let xs: Vec<usize> = if options.order_right {
    (0..w as usize).collect()
  } else {
    (0..w as usize).rev().collect()
  };
  let mut wire_rows: Vec<Vec<u8>> = Vec::with_capacity(h as usize);
  for y in 0..h as usize {
    let mut line: Vec<u8> = Vec::with_capacity(stride);
    for &x in xs.iter() {
      let px = raster.cell_or(x, y, 0);
      let word = match bytes_per_px {
        1 => narrow_8(px),
        2 => narrow_16(px),
        3 => narrow_24(px),
        _ => px,
      };
      line.extend_from_slice(&word.to_le_bytes()[..bytes_per_px as usize]);
    }
    line.resize(stride, 0);
    wire_rows.push(line);
  }
  if options.order_up {
    wire_rows.reverse();
  }

  let (dib_header_size, compression) = if bytes_per_px == 4 {
    (V4_HEADER_SIZE, BMP_COMPRESSION_BITFIELDS)
  } else {
    (INFO_HEADER_SIZE, BMP_COMPRESSION_RGB)
  };
  let pixel_start = 14 + dib_header_size;
  let file = BmpFileHeader {
    tag: AsciiArray(*b"BM"),
    file_size: pixel_start + data_size,
    pixel_data_offset: pixel_start,
  };
  let info = BmpInfoHeader {
    width: w as i32,
    height: h as i32,
    color_planes: 1,
    bits_per_pixel: (bytes_per_px * 8) as u16,
    compression,
    data_size,
    ..Default::default()
  };

  let mut out: Vec<u8> = Vec::with_capacity((pixel_start + data_size) as usize);
  out.extend_from_slice(&<[u8; 14]>::from(file));
  out.extend_from_slice(&info.to_bytes(dib_header_size));
  if dib_header_size == V4_HEADER_SIZE {
    out.extend_from_slice(&V4_STATIC_TAIL);
  }
  for line in wire_rows.iter() {
    out.extend_from_slice(line);
  }
  out
}
