#![forbid(unsafe_code)]

//! PNG decoding and encoding.
//!
//! * [Portable Network Graphics (PNG) Specification][png-spec]
//!
//! [png-spec]: https://www.w3.org/TR/png/
//!
//! The decoder assumes the whole PNG stream is a single in-memory byte
//! slice, and it is deliberately forgiving where the PNG spec allows a reader
//! to be:
//!
//! * Chunk ordering and duplicate-chunk rules aren't enforced; chunks are
//!   processed in stream order and the pixel pass takes what it finds.
//! * Chunk CRCs are parsed and carried along, but not verified. They date
//!   from an era when disks and networks mangled bytes a lot more often
//!   than they do now. [`compute_crc`] is available if you want to check
//!   one yourself.
//! * Chunks the decoder doesn't interpret are preserved, raw, in the
//!   resulting header's `aux_chunks` map.
//!
//! What *is* strict: the 8-byte signature must be present, the `IHDR` must
//! be legal, and interlaced streams are refused (Adam7 is not supported).
//!
//! Decoding is deferred: [`decode_png`] parses the header eagerly and hands
//! back a [`Image::Lazy`](crate::Image) whose pixel pass re-reads the byte
//! buffer when forced.

use alloc::{boxed::Box, collections::BTreeMap, vec::Vec};

use crate::{
  ascii_array::AsciiArray,
  image::{Image, Meta},
  raster::Raster,
  util::u32_be,
};

mod chunk;
pub use chunk::*;

mod crc32;
pub use crc32::*;

mod ihdr;
pub use ihdr::*;

mod filter;
pub use filter::*;

mod decode;
pub use decode::*;

mod encode;
pub use encode::*;

/// The fixed 8-byte mark at the start of every PNG stream.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Checks that the bytes open with the PNG signature.
#[inline]
#[must_use]
pub fn is_png_signature(bytes: &[u8]) -> bool {
  bytes.len() >= 8 && bytes[..8] == PNG_SIGNATURE
}

/// Things that can go wrong while reading PNG data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PngError {
  /// The stream doesn't open with the PNG signature.
  BytesAreNotPng,
  /// No parseable chunk followed the signature.
  NoChunksDetected,
  /// The first chunk wasn't a legal `IHDR`.
  IllegalIhdr,
  /// The color-type and bit-depth pairing isn't one the PNG spec defines.
  IllegalColorTypeBitDepthCombination,
  /// The stream declares Adam7 interlacing, which this decoder doesn't
  /// handle.
  InterlaceNotSupported,
  /// The color format is legal PNG but outside the decoder's supported
  /// set (`I8`, `YA8`, `RGBA8`).
  UnsupportedPixelFormat,
  /// No `IDAT` chunk was found before the stream ended.
  IdatNotFound,
  /// The zlib collaborator rejected the `IDAT` payload.
  IdatDecompressionFailed,
  /// The decompressed image data is shorter than the header requires.
  NotEnoughImageData,
}
/// Alias for PNG results.
pub type PngResult<T> = Result<T, PngError>;
