use binbuf_buffers::{ByteBuffer, ByteOrder};
use binbuf_data_io::{
    decode_mutf8, encode_mutf8, mutf8_len, DataError, DataInput, DataInputStream, DataOutput,
    DataOutputStream,
};
use proptest::prelude::*;

#[test]
fn stream_matches_buffer_big_endian_layout() {
    let mut out = DataOutputStream::new(Vec::new());
    out.write_i16(-300).unwrap();
    out.write_char(0xBEEF).unwrap();
    out.write_i32(-70000).unwrap();
    out.write_i64(1 << 40).unwrap();
    out.write_f32(-2.5).unwrap();
    out.write_f64(f64::MIN_POSITIVE).unwrap();
    let bytes = out.into_inner();

    let mut buf = ByteBuffer::wrap(bytes);
    assert_eq!(buf.order(), ByteOrder::BigEndian);
    assert_eq!(buf.get_i16().unwrap(), -300);
    assert_eq!(buf.get_char().unwrap(), 0xBEEF);
    assert_eq!(buf.get_i32().unwrap(), -70000);
    assert_eq!(buf.get_i64().unwrap(), 1 << 40);
    assert_eq!(buf.get_f32().unwrap(), -2.5);
    assert_eq!(buf.get_f64().unwrap(), f64::MIN_POSITIVE);
    assert!(!buf.has_remaining());
}

#[test]
fn round_trip_through_byte_buffer() {
    let mut out = DataOutputStream::new(ByteBuffer::allocate(64));
    out.write_bool(false).unwrap();
    out.write_u8(200).unwrap();
    out.write_utf("caf\u{e9} \u{1F600}").unwrap();
    out.write_bytes("line\r\n").unwrap();
    out.write_f64(f64::NAN).unwrap();
    let written = out.size();

    let mut buf = out.into_inner();
    assert_eq!(buf.position(), written);
    buf.flip();

    let mut input = DataInputStream::new(buf);
    assert!(!input.read_bool().unwrap());
    assert_eq!(input.read_u8().unwrap(), 200);
    assert_eq!(input.read_utf().unwrap(), "caf\u{e9} \u{1F600}");
    assert_eq!(input.read_line().unwrap().as_deref(), Some("line"));
    assert!(input.read_f64().unwrap().is_nan());
    assert_eq!(input.offset(), written as u64);
    assert!(!input.get_ref().has_remaining());
}

#[test]
fn full_byte_buffer_rejects_writes() {
    let mut out = DataOutputStream::new(ByteBuffer::allocate(3));
    out.write_u16(1).unwrap();
    match out.write_i32(1) {
        Err(DataError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::WriteZero),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(out.size(), 2);
}

#[test]
fn read_only_byte_buffer_rejects_writes() {
    let buf = ByteBuffer::allocate(4).as_read_only_buffer();
    let mut out = DataOutputStream::new(buf);
    match out.write_u8(1) {
        Err(DataError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::PermissionDenied),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(out.size(), 0);
}

#[test]
fn exhausted_byte_buffer_reports_eof() {
    let mut input = DataInputStream::new(ByteBuffer::wrap(vec![0, 0, 1]));
    assert!(matches!(input.read_i32(), Err(DataError::UnexpectedEof)));
    assert_eq!(input.read_line().unwrap(), None);
}

#[test]
fn utf_length_prefix_counts_encoded_bytes() {
    let s = "A\u{7FF}\u{1234}";
    assert_eq!(mutf8_len(s.encode_utf16()), 6);
    let mut out = DataOutputStream::new(Vec::new());
    out.write_utf(s).unwrap();
    assert_eq!(
        out.into_inner(),
        vec![0x00, 0x06, 0x41, 0xDF, 0xBF, 0xE1, 0x88, 0xB4]
    );
}

#[test]
fn embedded_nul_is_one_byte() {
    assert_eq!(encode_mutf8("a\0b").unwrap(), vec![0x61, 0x00, 0x62]);
    assert_eq!(decode_mutf8(&[0x61, 0x00, 0x62]).unwrap(), "a\0b");
}

#[test]
fn malformed_utf_body_is_reported() {
    let mut input = DataInputStream::new(ByteBuffer::wrap(vec![0, 2, 0xE1, 0x88]));
    assert!(matches!(
        input.read_utf(),
        Err(DataError::MalformedInput { offset: 0 })
    ));
}

#[test]
fn input_through_trait_object() {
    let mut stream = DataInputStream::new(&[0x7Fu8, 0xFF][..]);
    let input: &mut dyn DataInput = &mut stream;
    assert_eq!(input.read_i16().unwrap(), 0x7FFF);
}

proptest! {
    #[test]
    fn strings_survive_the_stream(s in ".{0,64}") {
        let mut out = DataOutputStream::new(Vec::new());
        out.write_utf(&s).unwrap();
        prop_assert_eq!(out.size(), 2 + mutf8_len(s.encode_utf16()));
        let bytes = out.into_inner();
        let mut input = DataInputStream::new(bytes.as_slice());
        prop_assert_eq!(input.read_utf().unwrap(), s);
    }

    #[test]
    fn primitives_survive_the_stream(
        a in any::<i8>(),
        b in any::<i16>(),
        c in any::<u16>(),
        d in any::<i32>(),
        e in any::<i64>(),
        f in any::<u32>(),
        g in any::<u64>(),
    ) {
        let mut out = DataOutputStream::new(Vec::new());
        out.write_i8(a).unwrap();
        out.write_i16(b).unwrap();
        out.write_char(c).unwrap();
        out.write_i32(d).unwrap();
        out.write_i64(e).unwrap();
        out.write_f32(f32::from_bits(f)).unwrap();
        out.write_f64(f64::from_bits(g)).unwrap();
        prop_assert_eq!(out.size(), 1 + 2 + 2 + 4 + 8 + 4 + 8);

        let bytes = out.into_inner();
        let mut input = DataInputStream::new(bytes.as_slice());
        prop_assert_eq!(input.read_i8().unwrap(), a);
        prop_assert_eq!(input.read_i16().unwrap(), b);
        prop_assert_eq!(input.read_char().unwrap(), c);
        prop_assert_eq!(input.read_i32().unwrap(), d);
        prop_assert_eq!(input.read_i64().unwrap(), e);
        prop_assert_eq!(input.read_f32().unwrap().to_bits(), f);
        prop_assert_eq!(input.read_f64().unwrap().to_bits(), g);
        prop_assert!(matches!(input.read_u8(), Err(DataError::UnexpectedEof)));
    }
}
