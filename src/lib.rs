#![no_std]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

//! A pure-buffer raster image codec.
//!
//! This crate decodes and encodes images in three container formats (PNG,
//! BMP, and GIF89a) plus a generic in-memory pixel grid. There is no I/O
//! anywhere: decoders take a byte slice, encoders return a byte vector,
//! and everything in between is an [`Image`] holding 32-bit RGBA pixel
//! words.
//!
//! * [`decode`] sniffs the format from the magic bytes and dispatches to
//!   the right decoder; [`png::decode_png`], [`bmp::decode_bmp`], and
//!   [`gif::decode_gif`] are the direct entry points.
//! * Decoding is in two stages: the header is parsed eagerly and the pixel
//!   pass is deferred inside the returned [`Image`] until something
//!   actually needs pixels. See [`Image::eval`].
//! * [`png::encode_png`], [`bmp::encode_bmp24`] / [`bmp::encode_bmp32`],
//!   and [`gif::encode_gif`] go the other way, and are total: any image
//!   in, well-formed bytes out.
//! * [`Image::map`], [`Image::crop`], [`Image::paste`], and
//!   [`Image::mirror`] manipulate pixels in the middle; all of them return
//!   new images.
//!
//! zlib compression for PNG is delegated to `miniz_oxide`. Everything
//! else, including the GIF LZW coder and the PNG CRC-32, lives here.

extern crate alloc;

mod ascii_array;
pub use ascii_array::*;

mod image;
pub use image::*;

mod raster;
pub use raster::*;

pub mod bits;
pub mod bmp;
pub mod gif;
pub mod lzw;
pub mod pixels;
pub mod png;

mod util;

/// Decodes image bytes of any supported format, sniffing which one from
/// the magic bytes.
///
/// PNG, BMP, and GIF are tried by signature; `None` if none of them claim
/// the buffer or if the claiming decoder rejects it.
#[must_use]
pub fn decode(bytes: &[u8]) -> Option<Image> {
  if png::is_png_signature(bytes) {
    png::decode_png(bytes)
  } else if bytes.starts_with(b"BM") {
    bmp::decode_bmp(bytes)
  } else if bytes.starts_with(b"GIF8") {
    gif::decode_gif(bytes)
  } else {
    None
  }
}
