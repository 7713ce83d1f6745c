use core::fmt::Write;

/// A byte array that's expected (but not required) to hold ascii.
///
/// The `Debug` and `Display` impls `as` cast each byte to a character, which
/// is exactly right for ascii (`32..=126`) and merely strange for anything
/// else. Image containers are full of four-byte ascii tags (`IHDR`, `IDAT`,
/// magic signatures, and so on), and wrapping them in this newtype makes the
/// `Debug` output of the surrounding structs actually readable.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct AsciiArray<const N: usize>(pub [u8; N]);

impl<const N: usize> Default for AsciiArray<N> {
  #[inline]
  #[must_use]
  fn default() -> Self {
    Self([0_u8; N])
  }
}

impl<const N: usize> core::fmt::Debug for AsciiArray<N> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_char('"')?;
    for ch in self.0.iter().copied().map(|u| u as char) {
      f.write_char(ch)?;
    }
    f.write_char('"')?;
    Ok(())
  }
}
impl<const N: usize> core::fmt::Display for AsciiArray<N> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    for ch in self.0.iter().copied().map(|u| u as char) {
      f.write_char(ch)?;
    }
    Ok(())
  }
}

impl<const N: usize> From<[u8; N]> for AsciiArray<N> {
  #[inline]
  #[must_use]
  fn from(array: [u8; N]) -> Self {
    Self(array)
  }
}
impl<const N: usize> From<AsciiArray<N>> for [u8; N] {
  #[inline]
  #[must_use]
  fn from(ascii: AsciiArray<N>) -> Self {
    ascii.0
  }
}
impl<const N: usize> AsciiArray<N> {
  /// The bytes, as a slice.
  #[inline]
  #[must_use]
  pub fn as_bytes(&self) -> &[u8] {
    &self.0
  }
}
