/// The CRC-32 polynomial, bit-reversed, as PNG uses it.
const REFLECTED_POLY: u32 = 0xEDB8_8320;

/// One table slot: the starting byte value run through eight shift rounds.
const fn table_entry(index: u32) -> u32 {
  let mut value = index;
  let mut rounds_left = 8;
  while rounds_left > 0 {
    value = if (value & 1) != 0 { REFLECTED_POLY ^ (value >> 1) } else { value >> 1 };
    rounds_left -= 1;
  }
  value
}

const CRC_TABLE: [u32; 256] = {
  let mut table = [0_u32; 256];
  let mut index = 0;
  while index < 256 {
    table[index] = table_entry(index as u32);
    index += 1;
  }
  table
};

/// The CRC-32 of the given bytes, as PNG defines it.
///
/// This is what belongs in (and what to check against) the trailing field
/// of each chunk, computed over the chunk's name and payload.
#[inline]
#[must_use]
pub fn compute_crc(iter: impl Iterator<Item = u8>) -> u32 {
  let mut crc = u32::MAX;
  for byte in iter {
    let i = (crc ^ u32::from(byte)) as u8 as usize;
    crc = CRC_TABLE[i] ^ (crc >> 8);
  }
  crc ^ u32::MAX
}
