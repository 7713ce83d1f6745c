use super::*;

/// One chunk of a PNG stream, with its payload still raw.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RawPngChunk<'b> {
  /// The four-character chunk name.
  pub chunk_ty: AsciiArray<4>,
  /// The chunk's payload bytes.
  pub data: &'b [u8],
  /// The CRC-32 the stream declares for this chunk.
  ///
  /// Carried, not checked; compare against [`compute_crc`] if you care.
  pub declared_crc: u32,
}
impl core::fmt::Debug for RawPngChunk<'_> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("RawPngChunk")
      .field("chunk_ty", &self.chunk_ty)
      .field("data_len", &self.data.len())
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}
impl<'b> RawPngChunk<'b> {
  /// The CRC-32 of this chunk's name and payload, freshly computed.
  #[inline]
  #[must_use]
  pub fn actual_crc(&self) -> u32 {
    compute_crc(self.chunk_ty.0.iter().copied().chain(self.data.iter().copied()))
  }
}

/// Iterates the chunks of a PNG stream.
///
/// Construct it with the bytes *after* the 8-byte signature. Each chunk on
/// the wire is `length: u32_be`, a 4-byte name, `length` payload bytes, and
/// a `u32_be` CRC. The iterator simply stops at the first spot where a
/// whole chunk doesn't fit, so it never panics, not even on garbage input.
#[derive(Debug, Clone)]
pub struct PngChunkIter<'b> {
  bytes: &'b [u8],
}
impl<'b> PngChunkIter<'b> {
  /// Iterates chunks out of the bytes following the signature.
  #[inline]
  #[must_use]
  pub const fn new(bytes_after_signature: &'b [u8]) -> Self {
    Self { bytes: bytes_after_signature }
  }

  /// Iterates the chunks of a full PNG stream, checking the signature
  /// first.
  #[inline]
  #[must_use]
  pub fn from_png_bytes(bytes: &'b [u8]) -> Option<Self> {
    if is_png_signature(bytes) {
      Some(Self::new(&bytes[8..]))
    } else {
      None
    }
  }
}
impl<'b> Iterator for PngChunkIter<'b> {
  type Item = RawPngChunk<'b>;

  fn next(&mut self) -> Option<RawPngChunk<'b>> {
    if self.bytes.len() < 12 {
      self.bytes = &[];
      return None;
    }
    let length = u32_be(&self.bytes[0..4]) as usize;
    if self.bytes.len() < 12 + length {
      self.bytes = &[];
      return None;
    }
    let chunk_ty = AsciiArray(self.bytes[4..8].try_into().unwrap());
    let data = &self.bytes[8..8 + length];
    let declared_crc = u32_be(&self.bytes[8 + length..12 + length]);
    self.bytes = &self.bytes[12 + length..];
    Some(RawPngChunk { chunk_ty, data, declared_crc })
  }
}
