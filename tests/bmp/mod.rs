use pictor::{
  bmp::{
    decode_bmp, encode_bmp, encode_bmp24, encode_bmp32, encode_bmp_with, row_padding,
    BmpEncodeOptions, INFO_HEADER_SIZE, V4_HEADER_SIZE,
  },
  DataShape, Meta,
};

use super::{image_from_rows, rand_bytes, BLACK, BLUE, GREEN, RED, WHITE};

#[test]
fn test_encode_2x2_as_24bpp() {
  let img = image_from_rows(vec![vec![RED, GREEN], vec![BLUE, WHITE]]);
  let bytes = encode_bmp24(&img);

  // 14-byte file header + 40-byte info header
  assert_eq!(&bytes[0..2], b"BM");
  assert_eq!(u32::from_le_bytes(bytes[2..6].try_into().unwrap()), bytes.len() as u32);
  assert_eq!(u32::from_le_bytes(bytes[10..14].try_into().unwrap()), 54);
  assert_eq!(u32::from_le_bytes(bytes[14..18].try_into().unwrap()), INFO_HEADER_SIZE);
  assert_eq!(i32::from_le_bytes(bytes[18..22].try_into().unwrap()), 2);
  assert_eq!(i32::from_le_bytes(bytes[22..26].try_into().unwrap()), 2);
  assert_eq!(u16::from_le_bytes(bytes[28..30].try_into().unwrap()), 24);

  // bottom row first (B, W as BGR triples plus 2 pad bytes), then the top
  // row (R, G likewise)
  #[rustfmt::skip]
  let expected = [
    0xFF, 0x00, 0x00,  0xFF, 0xFF, 0xFF,  0x00, 0x00,
    0x00, 0x00, 0xFF,  0x00, 0xFF, 0x00,  0x00, 0x00,
  ];
  assert_eq!(&bytes[54..], &expected);
}

#[test]
fn test_24bpp_round_trip_drops_alpha() {
  let rows = vec![
    vec![RED, 0x11223300, GREEN],
    vec![BLUE, WHITE, 0xA0B0C0D0],
  ];
  let img = image_from_rows(rows.clone());
  let decoded = decode_bmp(&encode_bmp24(&img)).unwrap().eval();
  let expected: Vec<Vec<u32>> =
    rows.iter().map(|row| row.iter().map(|px| px | 0xFF).collect()).collect();
  assert_eq!(decoded.pixels().unwrap().rows, expected);
}

#[test]
fn test_32bpp_round_trip_is_pixel_exact() {
  let rows = vec![
    vec![RED, 0x11223344, GREEN],
    vec![BLUE, WHITE, 0x00000000],
  ];
  let img = image_from_rows(rows.clone());
  let bytes = encode_bmp32(&img);
  assert_eq!(u32::from_le_bytes(bytes[14..18].try_into().unwrap()), V4_HEADER_SIZE);
  // BI_BITFIELDS with the red mask stored as 00 00 00 FF on the wire
  assert_eq!(u32::from_le_bytes(bytes[30..34].try_into().unwrap()), 3);
  assert_eq!(&bytes[54..58], &[0x00, 0x00, 0x00, 0xFF]);
  assert_eq!(u32::from_le_bytes(bytes[10..14].try_into().unwrap()), 122);

  let decoded = decode_bmp(&bytes).unwrap().eval();
  assert_eq!(decoded.pixels().unwrap().rows, rows);
}

#[test]
fn test_rows_are_padded_to_four_bytes() {
  for width in 1..=8_u32 {
    let img = image_from_rows(vec![vec![RED; width as usize]; 3]);
    let bytes = encode_bmp24(&img);
    let row_len = width as usize * 3 + row_padding(width, 3) as usize;
    assert_eq!(row_len % 4, 0);
    assert_eq!(bytes.len(), 54 + 3 * row_len, "width {width}");
  }
}

#[test]
fn test_header_shape_follows_declared_color() {
  let img = image_from_rows(vec![vec![RED, GREEN]]).with_shape(DataShape::RGB8);
  let bytes = encode_bmp(&img);
  assert_eq!(u16::from_le_bytes(bytes[28..30].try_into().unwrap()), 24);

  let img = image_from_rows(vec![vec![RED, GREEN]]).with_shape(DataShape::YA8);
  let bytes = encode_bmp(&img);
  assert_eq!(u16::from_le_bytes(bytes[28..30].try_into().unwrap()), 16);
}

#[test]
fn test_negative_height_means_top_down() {
  let rows = vec![vec![RED, GREEN], vec![BLUE, WHITE]];
  let img = image_from_rows(rows.clone());
  // write the rows top-down, then declare that in the height's sign
  let mut bytes = encode_bmp_with(&img, BmpEncodeOptions { order_right: true, order_up: false });
  let flipped_height = -(2_i32);
  bytes[22..26].copy_from_slice(&flipped_height.to_le_bytes());
  let decoded = decode_bmp(&bytes).unwrap().eval();
  let expected: Vec<Vec<u32>> =
    rows.iter().map(|row| row.iter().map(|px| px | 0xFF).collect()).collect();
  assert_eq!(decoded.pixels().unwrap().rows, expected);
}

#[test]
fn test_decode_rejects_wrong_tag() {
  let img = image_from_rows(vec![vec![RED]]);
  let mut bytes = encode_bmp24(&img);
  bytes[0] = b'b';
  assert!(decode_bmp(&bytes).is_none());
  assert!(decode_bmp(&[]).is_none());
  assert!(decode_bmp(b"BM").is_none());
}

#[test]
fn test_truncated_pixels_lose_data_but_keep_header() {
  let img = image_from_rows(vec![vec![RED, GREEN], vec![BLUE, WHITE]]);
  let bytes = encode_bmp24(&img);
  let cut = &bytes[..bytes.len() - 6];
  let decoded = decode_bmp(cut).unwrap();
  match decoded.meta() {
    Meta::Bmp { width, height, bits_per_pixel, .. } => {
      assert_eq!((*width, *height, *bits_per_pixel), (2, 2, 24));
    }
    other => panic!("wrong meta: {other:?}"),
  }
  let forced = decoded.eval();
  assert_eq!(forced.width(), 2);
  assert_eq!(forced.pixels().unwrap().rows.len(), 0);
}

#[test]
fn test_decode_never_panics_on_random_bytes() {
  for _ in 0..10 {
    let mut bytes = rand_bytes(256);
    bytes[0] = b'B';
    bytes[1] = b'M';
    let _ = decode_bmp(&bytes).map(pictor::Image::eval);
  }
}

#[test]
fn test_paste_then_encode_uses_padded_cells() {
  // a ragged grid: the encoder pads the short row with zero pixels
  let img = image_from_rows(vec![vec![RED, GREEN], vec![BLUE]]);
  let bytes = encode_bmp24(&img);
  // the bottom row comes first on the wire: BLUE, then the missing cell
  // written as black
  assert_eq!(&bytes[54..60], &[0xFF, 0x00, 0x00, 0x00, 0x00, 0x00]);
}

#[test]
fn test_8bpp_decodes_as_grey() {
  let img = image_from_rows(vec![vec![WHITE, BLACK], vec![BLACK, WHITE]]);
  let bytes = encode_bmp_with(
    &img.with_shape(DataShape::Y8),
    BmpEncodeOptions::default(),
  );
  assert_eq!(u16::from_le_bytes(bytes[28..30].try_into().unwrap()), 8);
  let decoded = decode_bmp(&bytes).unwrap().eval();
  assert_eq!(
    decoded.pixels().unwrap().rows,
    vec![vec![WHITE, BLACK], vec![BLACK, WHITE]]
  );
}
