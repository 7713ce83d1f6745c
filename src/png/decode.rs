use super::*;
use crate::pixels;

/// Decodes PNG bytes into a deferred [`Image`].
///
/// The header is parsed eagerly: the signature and `IHDR` are checked, and
/// uninterpreted chunks are gathered into the header's `aux_chunks`. The
/// pixels themselves are *not* decoded until the image is forced, at which
/// point the byte buffer (captured by the returned image) is re-read in
/// full.
///
/// ## Failure
/// * `None` for a bad signature, an illegal `IHDR`, an interlaced stream,
///   or a stream with no `IDAT` at all. A failure *inside the deferred
///   pixel pass* instead yields an image with an empty pixel grid: the
///   header survives, the pixels are lost.
#[must_use]
pub fn decode_png(bytes: &[u8]) -> Option<Image> {
  let (meta, ihdr) = match parse_png_header(bytes) {
    Ok(pair) => pair,
    Err(err) => {
      log::debug!("png header rejected: {err:?}");
      return None;
    }
  };
  let owned: Vec<u8> = bytes.to_vec();
  let producer = move |meta: &Meta| match decode_png_pixels(&owned, ihdr) {
    Ok(raster) => Image::Raw(meta.clone(), raster),
    Err(err) => {
      log::debug!("png pixel pass failed: {err:?}");
      Image::Raw(meta.clone(), Raster::default())
    }
  };
  Some(Image::Lazy(meta, Box::new(producer)))
}

fn parse_png_header(bytes: &[u8]) -> PngResult<(Meta, Ihdr)> {
  let mut it = PngChunkIter::from_png_bytes(bytes).ok_or(PngError::BytesAreNotPng)?;
  let first = it.next().ok_or(PngError::NoChunksDetected)?;
  if first.chunk_ty.0 != *b"IHDR" {
    return Err(PngError::IllegalIhdr);
  }
  let ihdr = Ihdr::from_chunk_data(first.data)?;
  if ihdr.is_interlaced {
    return Err(PngError::InterlaceNotSupported);
  }
  let mut aux_chunks: BTreeMap<AsciiArray<4>, Vec<u8>> = BTreeMap::new();
  let mut saw_idat = false;
  for chunk in it {
    match &chunk.chunk_ty.0 {
      b"IHDR" | b"PLTE" | b"tRNS" | b"IEND" => (),
      b"IDAT" => saw_idat = true,
      _ => {
        // first occurrence wins for duplicated names
        aux_chunks.entry(chunk.chunk_ty).or_insert_with(|| chunk.data.to_vec());
      }
    }
  }
  if !saw_idat {
    return Err(PngError::IdatNotFound);
  }
  log::trace!(
    "png header: {}x{} {:?}, {} aux chunk(s)",
    ihdr.width,
    ihdr.height,
    ihdr.pixel_format,
    aux_chunks.len()
  );
  let meta = Meta::Png {
    width: ihdr.width,
    height: ihdr.height,
    color: ihdr.pixel_format,
    adam7: ihdr.is_interlaced,
    aux_chunks,
  };
  Ok((meta, ihdr))
}

fn decode_png_pixels(bytes: &[u8], ihdr: Ihdr) -> PngResult<Raster> {
  let bpp: u32 = match ihdr.pixel_format {
    PngPixelFormat::I8 => 1,
    PngPixelFormat::YA8 => 2,
    PngPixelFormat::RGBA8 => 4,
    _ => return Err(PngError::UnsupportedPixelFormat),
  };

  let mut palette: Vec<u32> = Vec::new();
  let mut zlib_data: Vec<u8> = Vec::new();
  for chunk in PngChunkIter::from_png_bytes(bytes).ok_or(PngError::BytesAreNotPng)? {
    match &chunk.chunk_ty.0 {
      b"PLTE" => {
        let whole_entries = chunk.data.len() - chunk.data.len() % 3;
        let entries: &[[u8; 3]] = bytemuck::cast_slice(&chunk.data[..whole_entries]);
        palette =
          entries.iter().map(|[r, g, b]| pixels::pack_rgba8(*r, *g, *b, 0xFF)).collect();
      }
      b"tRNS" => {
        // in indexed mode this augments palette entries with alpha values
        for (i, &alpha) in chunk.data.iter().enumerate() {
          if let Some(entry) = palette.get_mut(i) {
            *entry = (*entry & !0xFF) | alpha as u32;
          }
        }
      }
      b"IDAT" => zlib_data.extend_from_slice(chunk.data),
      b"IEND" => break,
      _ => (),
    }
  }
  if zlib_data.is_empty() {
    return Err(PngError::IdatNotFound);
  }

  let mut decompressed = miniz_oxide::inflate::decompress_to_vec_zlib(&zlib_data)
    .map_err(|_| PngError::IdatDecompressionFailed)?;
  unfilter_scanlines(&mut decompressed, ihdr.width, ihdr.height, bpp)?;

  let w = ihdr.width as usize;
  let h = ihdr.height as usize;
  let line_len = 1 + w * bpp as usize;
  let mut rows: Vec<Vec<u32>> = Vec::with_capacity(h);
  for line in decompressed[..line_len * h].chunks_exact(line_len) {
    let line_bytes = &line[1..];
    let mut row: Vec<u32> = Vec::with_capacity(w);
    match ihdr.pixel_format {
      PngPixelFormat::I8 => {
        for &i in line_bytes {
          row.push(palette.get(i as usize).copied().unwrap_or_default());
        }
      }
      PngPixelFormat::YA8 => {
        for pair in line_bytes.chunks_exact(2) {
          row.push(pixels::widen_16(((pair[0] as u32) << 8) | pair[1] as u32));
        }
      }
      PngPixelFormat::RGBA8 => {
        for quad in line_bytes.chunks_exact(4) {
          row.push(u32::from_be_bytes(quad.try_into().unwrap()));
        }
      }
      _ => return Err(PngError::UnsupportedPixelFormat),
    }
    rows.push(row);
  }
  Ok(Raster { rows })
}
