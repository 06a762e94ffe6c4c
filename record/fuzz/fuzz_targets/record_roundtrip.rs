#![no_main]

use arbitrary::Arbitrary;
use commonware_record::{record, Buffer, Error, Mapper, Serializer};
use libfuzzer_sys::fuzz_target;

record! {
    #[derive(Debug, Clone, Default, PartialEq, Arbitrary)]
    struct Sample {
        tag: u8,
        name: String,
        delta: i16,
        count: i32,
        stamp: i64,
        ratio: f32,
        live: bool,
    }
}

fn roundtrip_record(sample: Sample) {
    let mapper = Mapper::<Sample>::new().expect("Sample only uses supported kinds");
    let encoded = match mapper.serialize(&sample) {
        Ok(encoded) => encoded,
        Err(Error::NonAscii) => {
            assert!(!sample.name.is_ascii());
            return;
        }
        Err(e) => panic!("unexpected encode failure: {e}"),
    };
    assert_eq!(encoded.len(), mapper.encode_size(&sample));

    // Compare re-encoded bytes rather than records so NaN ratios round-trip
    let decoded = mapper
        .deserialize(&encoded)
        .expect("Failed to decode a successfully encoded input!");
    let reencoded = mapper.serialize(&decoded).expect("Failed to re-encode!");
    assert_eq!(encoded, reencoded);
}

fn decode_raw(data: &[u8]) {
    let mapper = Mapper::<Sample>::new().expect("Sample only uses supported kinds");
    let mut buf = Buffer::from(data);
    match mapper.read(&mut buf) {
        Ok(decoded) => {
            assert!(buf.cursor() <= data.len());
            let reencoded = mapper.serialize(&decoded).expect("Failed to re-encode!");
            assert_eq!(&reencoded[..], &data[..buf.cursor()]);
        }
        Err(_) => assert!(buf.cursor() <= data.len()),
    }
}

fn peek_then_read(data: &[u8]) {
    let mut buf = Buffer::from(data);
    while buf.remaining() > 0 {
        let start = buf.cursor();
        let peeked = buf.peek_string();
        assert_eq!(buf.cursor(), start);
        match buf.read_string() {
            Ok(text) => {
                assert_eq!(peeked, Ok(text.clone()));
                assert_eq!(buf.cursor(), start + 4 + text.len());
            }
            Err(e) => {
                assert_eq!(peeked, Err(e));
                break;
            }
        }
    }
}

#[derive(Arbitrary, Debug)]
enum FuzzInput<'a> {
    Record(Sample),
    Raw(&'a [u8]),
    Strings(&'a [u8]),
}

fn fuzz(input: FuzzInput) {
    match input {
        FuzzInput::Record(it) => roundtrip_record(it),
        FuzzInput::Raw(it) => decode_raw(it),
        FuzzInput::Strings(it) => peek_then_read(it),
    };
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
