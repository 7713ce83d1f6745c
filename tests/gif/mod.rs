use pictor::{
  gif::{decode_gif, encode_gif},
  pixels::pack_rgba8,
  Meta,
};

use super::{image_from_rows, rand_bytes, BLACK, BLUE, GREEN, RED, WHITE};

#[test]
fn test_stream_framing() {
  let img = image_from_rows(vec![vec![RED, GREEN], vec![BLUE, WHITE]]);
  let bytes = encode_gif(&img);

  assert_eq!(&bytes[0..6], b"GIF89a");
  assert_eq!(u16::from_le_bytes(bytes[6..8].try_into().unwrap()), 2);
  assert_eq!(u16::from_le_bytes(bytes[8..10].try_into().unwrap()), 2);
  // global color table flag set; 4 colors fit a size field of 1 (4 entries)
  assert_eq!(bytes[10] & 0x80, 0x80);
  assert_eq!(bytes[10] & 0x07, 1);
  // image separator right after the 13-byte screen block + 4-entry table
  assert_eq!(bytes[13 + 12], 0x2C);
  // minimum LZW code size for a 4-entry table
  assert_eq!(bytes[13 + 12 + 10], 2);
  // zero-length sub-block, then the trailer
  assert_eq!(bytes[bytes.len() - 2], 0x00);
  assert_eq!(bytes[bytes.len() - 1], 0x3B);
}

#[test]
fn test_round_trip_flattens_alpha() {
  let rows = vec![
    vec![RED, GREEN, BLUE],
    vec![WHITE, BLACK, 0x80808000],
  ];
  let img = image_from_rows(rows.clone());
  let bytes = encode_gif(&img);
  let decoded = decode_gif(&bytes).unwrap();
  assert!(matches!(decoded.meta(), Meta::Gif { width: 3, height: 2 }));
  let forced = decoded.eval();
  let expected: Vec<Vec<u32>> =
    rows.iter().map(|row| row.iter().map(|px| px | 0xFF).collect()).collect();
  assert_eq!(forced.pixels().unwrap().rows, expected);
}

#[test]
fn test_256_distinct_colors_fill_the_table() {
  let mut rows = Vec::new();
  for y in 0..16_usize {
    let mut row = Vec::new();
    for x in 0..16_usize {
      let i = (y * 16 + x) as u8;
      row.push(pack_rgba8(i, i.wrapping_mul(3), i.wrapping_mul(7), 0xFF));
    }
    rows.push(row);
  }
  let img = image_from_rows(rows.clone());
  let bytes = encode_gif(&img);

  // size field 7: a full 256-entry table, 768 bytes of it
  assert_eq!(bytes[10] & 0x07, 7);
  assert_eq!(bytes[13 + 768], 0x2C);
  // code width 8
  assert_eq!(bytes[13 + 768 + 10], 8);

  let decoded = decode_gif(&bytes).unwrap().eval();
  assert_eq!(decoded.pixels().unwrap().rows, rows);
}

#[test]
fn test_palette_overflow_lands_on_index_zero() {
  // 16x17 pixels, every one a distinct color; the 17th row overflows the
  // palette and every overflowed pixel decodes as the first color
  let mut rows = Vec::new();
  for y in 0..17_usize {
    let mut row = Vec::new();
    for x in 0..16_usize {
      let i = y * 16 + x;
      row.push(pack_rgba8((i % 256) as u8, (i / 256) as u8 + 1, 0, 0xFF));
    }
    rows.push(row);
  }
  let img = image_from_rows(rows.clone());
  let decoded = decode_gif(&encode_gif(&img)).unwrap().eval();
  let got = &decoded.pixels().unwrap().rows;
  // the first 256 pixels survive
  for i in 0..256_usize {
    assert_eq!(got[i / 16][i % 16], rows[i / 16][i % 16]);
  }
  // the rest collapsed to palette entry 0
  let first = rows[0][0];
  for x in 0..16_usize {
    assert_eq!(got[16][x], first);
  }
}

#[test]
fn test_extension_blocks_are_skipped() {
  let img = image_from_rows(vec![vec![RED, GREEN], vec![BLUE, WHITE]]);
  let bytes = encode_gif(&img);
  // splice a graphic control extension in front of the image descriptor
  let descriptor_at = 13 + 12;
  let mut spliced = bytes[..descriptor_at].to_vec();
  spliced.extend_from_slice(&[0x21, 0xF9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00]);
  spliced.extend_from_slice(&bytes[descriptor_at..]);

  let a = decode_gif(&bytes).unwrap().eval();
  let b = decode_gif(&spliced).unwrap().eval();
  assert_eq!(a.pixels().unwrap().rows, b.pixels().unwrap().rows);
}

#[test]
fn test_decode_rejects_wrong_signature() {
  assert!(decode_gif(b"GIF88a\0\0\0\0\0\0\0").is_none());
  assert!(decode_gif(b"JIF89a\0\0\0\0\0\0\0").is_none());
  assert!(decode_gif(&[]).is_none());
}

#[test]
fn test_truncated_data_loses_pixels_but_keeps_header() {
  let img = image_from_rows(vec![vec![RED, GREEN], vec![BLUE, WHITE]]);
  let bytes = encode_gif(&img);
  let cut = &bytes[..20];
  let decoded = decode_gif(cut).unwrap();
  assert_eq!(decoded.width(), 2);
  let forced = decoded.eval();
  assert_eq!(forced.pixels().unwrap().rows.len(), 0);
}

#[test]
fn test_decode_never_panics_on_random_bytes() {
  for _ in 0..10 {
    let mut bytes = rand_bytes(256);
    bytes[0..6].copy_from_slice(b"GIF89a");
    let _ = decode_gif(&bytes).map(pictor::Image::eval);
  }
}
