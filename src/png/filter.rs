//! Scanline filtering.
//!
//! From the PNG spec:
//!
//! > Filters are applied to **bytes**, not to pixels, regardless of the bit
//! > depth or color type of the image.

use super::*;

/// The Paeth predictor: a simple linear function of the three neighboring
/// bytes (left `a`, above `b`, upper left `c`), snapped to whichever
/// neighbor it lands closest to.
///
/// Neighbors that fall off the top or left edge of the image read as 0.
const fn paeth_predict(a: u8, b: u8, c: u8) -> u8 {
  // The PNG spec requires this computed exactly, without overflow, and with
  // the ties broken in exactly this comparison order. i32 is plenty wide.
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

/// Reconstructs filtered scanlines in place.
///
/// `data` holds `height` scanlines, each a 1-byte filter type followed by
/// `width * bytes_per_pixel` filtered bytes. After this returns `Ok`, the
/// pixel bytes are reconstructed and every filter byte is reset to 0, so
/// running it twice is harmless.
///
/// Filter types None/Sub/Up/Paeth are reconstructed. Average (type 3) is
/// not implemented and is treated as None, as is any out-of-range type;
/// neither is an error.
///
/// ## Failure
/// * `data` may be *longer* than the scanlines require (only the needed
///   prefix is touched), but if it's shorter you get
///   [`PngError::NotEnoughImageData`].
pub fn unfilter_scanlines(
  data: &mut [u8], width: u32, height: u32, bytes_per_pixel: u32,
) -> PngResult<()> {
  let bpp = (bytes_per_pixel as usize).max(1);
  let line_len = 1 + (width as usize) * bpp;
  let needed = line_len * (height as usize);
  if data.len() < needed {
    return Err(PngError::NotEnoughImageData);
  }

  let mut previous: &mut [u8] = &mut [];
  for line in data[..needed].chunks_exact_mut(line_len) {
    let (filter_byte, pixels) = line.split_first_mut().unwrap();
    match *filter_byte {
      1 => {
        // Sub: add the byte one pixel to the left (first pixel passes
        // through unchanged).
        for i in bpp..pixels.len() {
          pixels[i] = pixels[i].wrapping_add(pixels[i - bpp]);
        }
      }
      2 => {
        // Up: add the corresponding byte of the previous line (absent on
        // the first line, where Up is equivalent to None).
        for (x, b) in pixels.iter_mut().zip(previous.iter()) {
          *x = x.wrapping_add(*b);
        }
      }
      4 => {
        // Paeth
        if previous.is_empty() {
          for i in bpp..pixels.len() {
            let a = pixels[i - bpp];
            pixels[i] = pixels[i].wrapping_add(paeth_predict(a, 0, 0));
          }
        } else {
          for i in 0..pixels.len() {
            let a = if i >= bpp { pixels[i - bpp] } else { 0 };
            let b = previous[i];
            let c = if i >= bpp { previous[i - bpp] } else { 0 };
            pixels[i] = pixels[i].wrapping_add(paeth_predict(a, b, c));
          }
        }
      }
      0 => (),
      other => {
        // Average (3) isn't implemented; it and any illegal type fall back
        // to None rather than killing the image.
        log::debug!("treating filter type {other} as None");
      }
    }
    *filter_byte = 0;
    previous = pixels;
  }
  Ok(())
}

/// Sub-filters one scanline's raw bytes, appending the filter byte and the
/// filtered bytes to `out`.
///
/// Each output byte is the raw byte minus the byte one pixel to the left
/// (mod 256), which is the inverse of what [`unfilter_scanlines`] does for
/// filter type 1.
pub fn sub_filter_scanline(raw: &[u8], bytes_per_pixel: u32, out: &mut Vec<u8>) {
  let bpp = (bytes_per_pixel as usize).max(1);
  out.push(1);
  for (i, &byte) in raw.iter().enumerate() {
    let left = if i >= bpp { raw[i - bpp] } else { 0 };
    out.push(byte.wrapping_sub(left));
  }
}
