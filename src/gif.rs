#![forbid(unsafe_code)]

//! GIF89a encoding, plus a deliberately small decoder.
//!
//! The encoder writes a complete single-frame GIF89a stream: logical
//! screen descriptor, global color table, image descriptor, LZW-compressed
//! image data in 255-byte sub-blocks, trailer. The palette is extracted
//! from the pixels in row-major order; alpha is flattened away (every
//! output pixel is opaque), and if more than 256 distinct colors show up,
//! the overflow all lands on index 0.
//!
//! The decoder handles the matching subset: first frame, global color
//! table only. Local color tables, interlacing, multi-frame animation, and
//! graphic control extensions are out of scope (extension blocks are
//! skipped, not interpreted).

use alloc::{boxed::Box, collections::BTreeMap, vec::Vec};

use crate::{
  image::{Image, Meta},
  lzw::{self, LzwError},
  raster::Raster,
  util::u16_le,
};

/// Things that can go wrong while reading GIF data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum GifError {
  /// The signature isn't `GIF87a` or `GIF89a`.
  ThisIsProbablyNotAGifFile,
  /// The buffer ended mid-structure.
  InsufficientBytes,
  /// The first image descriptor declares a local color table.
  LocalColorTableNotSupported,
  /// The first image descriptor declares interlacing.
  InterlaceNotSupported,
  /// The stream's minimum LZW code size can't be valid.
  IllegalCodeSize,
  /// A block introducer other than extension, image, or trailer.
  IllegalBlockKind,
  /// The stream ended (or hit the trailer) without an image descriptor.
  NoImageDescriptor,
  /// The LZW stream inside the image data was malformed.
  Lzw(LzwError),
}
impl From<LzwError> for GifError {
  #[inline]
  fn from(e: LzwError) -> Self {
    GifError::Lzw(e)
  }
}
/// Alias for GIF results.
pub type GifResult<T> = Result<T, GifError>;

/// Encodes an image as a single-frame GIF89a stream.
///
/// The image is forced first if it's deferred. Encoding is total; an image
/// with no pixels still yields a well-formed stream (with a degenerate
/// 4-entry color table). Dimensions are clamped to GIF's `u16` fields.
#[must_use]
pub fn encode_gif(image: &Image) -> Vec<u8> {
  let raster = image.forced_pixels();
  let w = image.meta().width().min(0xFFFF) as u16;
  let h = image.meta().height().min(0xFFFF) as u16;
  let (palette, indices) = extract_palette(&raster, w, h);

  // the wire's color table and code space are always a power of two
  let bits = lzw::code_size_for(palette.len() as u32);
  let table_len = 1_usize << bits;
  log::trace!("gif encode: {w}x{h}, {} color(s), code size {bits}", palette.len());

  let mut out: Vec<u8> = Vec::new();
  out.extend_from_slice(b"GIF89a");
  // logical screen descriptor
  out.extend_from_slice(&w.to_le_bytes());
  out.extend_from_slice(&h.to_le_bytes());
  let size_field = (bits - 1) as u8;
  out.push(0x80 | (size_field << 4) | size_field);
  out.push(0); // background color index
  out.push(0); // pixel aspect ratio
  // global color table, zero-padded out to its power-of-two size
  for i in 0..table_len {
    match palette.get(i) {
      Some(&rgb) => out.extend_from_slice(&[(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8]),
      None => out.extend_from_slice(&[0, 0, 0]),
    }
  }
  // image descriptor: full frame, no local table, no interlace
  out.push(0x2C);
  out.extend_from_slice(&0_u16.to_le_bytes());
  out.extend_from_slice(&0_u16.to_le_bytes());
  out.extend_from_slice(&w.to_le_bytes());
  out.extend_from_slice(&h.to_le_bytes());
  out.push(0);
  // LZW data: minimum code size, then the code stream in sub-blocks
  out.push(bits as u8);
  let stream = lzw::encode((table_len - 1) as u16, &indices);
  for block in stream.chunks(255) {
    out.push(block.len() as u8);
    out.extend_from_slice(block);
  }
  out.push(0);
  out.push(0x3B);
  out
}

/// Walks the pixels in row-major order, giving each novel color the next
/// free palette slot and emitting the per-pixel index stream alongside.
///
/// Palette entries are 24-bit `0xRRGGBB` words. Alpha never makes it into
/// the palette: every pixel flattens to its RGB. Colors past the 256th are
/// forced to index 0.
fn extract_palette(raster: &Raster, w: u16, h: u16) -> (Vec<u32>, Vec<u8>) {
  let mut lookup: BTreeMap<u32, u8> = BTreeMap::new();
  let mut palette: Vec<u32> = Vec::new();
  let mut indices: Vec<u8> = Vec::with_capacity(w as usize * h as usize);
  for y in 0..h as usize {
    for x in 0..w as usize {
      let rgb = raster.cell_or(x, y, 0) >> 8;
      let idx = match lookup.get(&rgb) {
        Some(&i) => i,
        None if palette.len() < 256 => {
          let i = palette.len() as u8;
          lookup.insert(rgb, i);
          palette.push(rgb);
          i
        }
        None => 0,
      };
      indices.push(idx);
    }
  }
  (palette, indices)
}

/// Decodes the first frame of a GIF stream into a deferred [`Image`].
///
/// Only the subset the encoder emits is handled: a global color table and
/// one non-interlaced image without a local table. Extension blocks before
/// the image are skipped.
///
/// ## Failure
/// * `None` for a bad signature or a truncated logical screen descriptor.
///   Failures in the deferred pixel pass (including unsupported local
///   tables or interlacing) yield an image with an empty grid.
#[must_use]
pub fn decode_gif(bytes: &[u8]) -> Option<Image> {
  if bytes.len() < 13 || &bytes[0..3] != b"GIF" {
    return None;
  }
  if &bytes[3..6] != b"87a" && &bytes[3..6] != b"89a" {
    return None;
  }
  let width = u16_le(&bytes[6..8]) as u32;
  let height = u16_le(&bytes[8..10]) as u32;
  let meta = Meta::Gif { width, height };
  let owned: Vec<u8> = bytes.to_vec();
  let producer = move |meta: &Meta| match decode_gif_pixels(&owned, width, height) {
    Ok(raster) => Image::Raw(meta.clone(), raster),
    Err(err) => {
      log::debug!("gif pixel pass failed: {err:?}");
      Image::Raw(meta.clone(), Raster::default())
    }
  };
  Some(Image::Lazy(meta, Box::new(producer)))
}

fn decode_gif_pixels(bytes: &[u8], width: u32, height: u32) -> GifResult<Raster> {
  let packed = bytes[10];
  let has_gct = (packed & 0x80) != 0;
  let gct_bits = (packed & 0x07) as u32 + 1;

  let mut pos: usize = 13;
  let mut palette: Vec<u32> = Vec::new();
  if has_gct {
    let entries = 1_usize << gct_bits;
    let table = bytes.get(pos..pos + 3 * entries).ok_or(GifError::InsufficientBytes)?;
    palette = table
      .chunks_exact(3)
      .map(|rgb| ((rgb[0] as u32) << 16) | ((rgb[1] as u32) << 8) | rgb[2] as u32)
      .collect();
    pos += 3 * entries;
  }

  loop {
    match bytes.get(pos).copied() {
      None => return Err(GifError::InsufficientBytes),
      Some(0x3B) => return Err(GifError::NoImageDescriptor),
      Some(0x21) => {
        // extension: introducer, label, then sub-blocks to a zero length
        pos += 2;
        loop {
          let len = *bytes.get(pos).ok_or(GifError::InsufficientBytes)? as usize;
          pos += 1;
          if len == 0 {
            break;
          }
          pos += len;
        }
      }
      Some(0x2C) => {
        let desc = bytes.get(pos + 1..pos + 10).ok_or(GifError::InsufficientBytes)?;
        let left = u16_le(&desc[0..2]) as usize;
        let top = u16_le(&desc[2..4]) as usize;
        let frame_w = u16_le(&desc[4..6]) as usize;
        let frame_h = u16_le(&desc[6..8]) as usize;
        let frame_packed = desc[8];
        if (frame_packed & 0x80) != 0 {
          return Err(GifError::LocalColorTableNotSupported);
        }
        if (frame_packed & 0x40) != 0 {
          return Err(GifError::InterlaceNotSupported);
        }
        pos += 10;
        let min_code = *bytes.get(pos).ok_or(GifError::InsufficientBytes)? as u32;
        pos += 1;
        if !(2..=11).contains(&min_code) {
          return Err(GifError::IllegalCodeSize);
        }
        let mut data: Vec<u8> = Vec::new();
        loop {
          let len = *bytes.get(pos).ok_or(GifError::InsufficientBytes)? as usize;
          pos += 1;
          if len == 0 {
            break;
          }
          let block = bytes.get(pos..pos + len).ok_or(GifError::InsufficientBytes)?;
          data.extend_from_slice(block);
          pos += len;
        }
        let indices = lzw::decode(((1_u32 << min_code) - 1) as u16, &data)?;

        let mut canvas = Raster::new_filled(width, height, 0);
        if frame_w > 0 {
          for (i, &idx) in indices.iter().enumerate().take(frame_w * frame_h) {
            let x = left + i % frame_w;
            let y = top + i / frame_w;
            if let Some(row) = canvas.rows.get_mut(y) {
              if let Some(cell) = row.get_mut(x) {
                let rgb = palette.get(idx as usize).copied().unwrap_or(0);
                *cell = (rgb << 8) | 0xFF;
              }
            }
          }
        }
        return Ok(canvas);
      }
      Some(_) => return Err(GifError::IllegalBlockKind),
    }
  }
}
