//! Byte-for-byte comparison against a standard serializer.
//!
//! The models below mirror each other: the serde versions describe the
//! expected layout declaratively, the zjson versions write it by hand.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use regex::Regex;
use serde::Serialize;
use zjson::{DecodeError, Decoder, Encoder, FloatFormat, ObjectDecoder, ObjectEncoder, Objects};

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(b: &bool) -> bool {
    !*b
}

fn is_zero<T: Default + PartialEq>(v: &T) -> bool {
    *v == T::default()
}

#[derive(Debug, Default, PartialEq, Serialize)]
struct Outer {
    #[serde(skip_serializing_if = "is_false")]
    b1: bool,
    #[serde(skip_serializing_if = "is_false")]
    b2: bool,
    #[serde(skip_serializing_if = "is_zero")]
    i1: u8,
    #[serde(skip_serializing_if = "is_zero")]
    i2: u16,
    #[serde(skip_serializing_if = "is_zero")]
    i3: i64,
    #[serde(skip_serializing_if = "is_zero")]
    i4: u64,
    #[serde(skip_serializing_if = "is_zero")]
    f1: f64,
    #[serde(skip_serializing_if = "String::is_empty")]
    s1: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    s2: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    d: Vec<Inner>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
struct Inner {
    #[serde(skip_serializing_if = "is_false")]
    b1: bool,
    #[serde(skip_serializing_if = "is_false")]
    b2: bool,
    #[serde(skip_serializing_if = "is_zero")]
    i1: u8,
    #[serde(skip_serializing_if = "is_zero")]
    i2: u16,
}

impl ObjectEncoder for Outer {
    fn is_empty(&self) -> bool {
        false
    }

    fn encode_fields(&self, enc: &mut Encoder) {
        enc.bool_field_opt("b1", self.b1);
        enc.bool_field_opt("b2", self.b2);
        enc.u8_field_opt("i1", self.i1);
        enc.u16_field_opt("i2", self.i2);
        enc.i64_field_opt("i3", self.i3);
        enc.u64_field_opt("i4", self.i4);
        enc.float_field_opt("f1", self.f1, FloatFormat::General, None);
        enc.string_field_opt("s1", &self.s1);
        enc.string_field_opt("s2", &self.s2);
        enc.array_field_opt("d", Some(&Objects(&self.d)));
    }
}

impl ObjectDecoder for Outer {
    fn decode_field(&mut self, dec: &mut Decoder<'_>, key: &[u8]) -> Result<(), DecodeError> {
        match key {
            b"b1" => self.b1 = dec.bool()?,
            b"b2" => self.b2 = dec.bool()?,
            b"i1" => self.i1 = dec.u8()?,
            b"i2" => self.i2 = dec.u16()?,
            b"i3" => self.i3 = dec.i64()?,
            b"i4" => self.i4 = dec.u64()?,
            b"f1" => self.f1 = dec.f64()?,
            b"s1" => self.s1 = dec.string_owned()?,
            b"s2" => self.s2 = dec.string_owned()?,
            b"d" => dec.array(|dec| {
                let mut inner = Inner::default();
                dec.object(&mut inner)?;
                self.d.push(inner);
                Ok(())
            })?,
            _ => return Err(DecodeError::unknown_field("Outer", key)),
        }
        Ok(())
    }
}

impl ObjectEncoder for Inner {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn encode_fields(&self, enc: &mut Encoder) {
        enc.bool_field_opt("b1", self.b1);
        enc.bool_field_opt("b2", self.b2);
        enc.u8_field_opt("i1", self.i1);
        enc.u16_field_opt("i2", self.i2);
    }
}

impl ObjectDecoder for Inner {
    fn decode_field(&mut self, dec: &mut Decoder<'_>, key: &[u8]) -> Result<(), DecodeError> {
        match key {
            b"b1" => self.b1 = dec.bool()?,
            b"b2" => self.b2 = dec.bool()?,
            b"i1" => self.i1 = dec.u8()?,
            b"i2" => self.i2 = dec.u16()?,
            _ => return Err(DecodeError::unknown_field("Inner", key)),
        }
        Ok(())
    }
}

fn inner(b1: bool, b2: bool, i1: u8, i2: u16) -> Inner {
    Inner { b1, b2, i1, i2 }
}

fn sample() -> Outer {
    Outer {
        b1: false,
        b2: true,
        i1: 1,
        i2: 2,
        i3: 12_345_678,
        i4: 1_234_567_890,
        f1: 123.456,
        s1: "haha".into(),
        s2: "wat een dag".into(),
        d: vec![
            inner(true, false, 5, 231),
            inner(false, false, 15, 131),
            inner(true, true, 25, 31),
        ],
    }
}

fn encode<O: ObjectEncoder>(o: &O) -> Vec<u8> {
    let mut enc = zjson::acquire_encoder(256);
    enc.object(o);
    enc.bytes().to_vec()
}

#[test]
fn sample_matches_serde_json() {
    let sample = sample();
    let expected = serde_json::to_vec(&sample).unwrap();
    assert_eq!(encode(&sample), expected);
    assert_eq!(
        String::from_utf8(expected).unwrap(),
        r#"{"b2":true,"i1":1,"i2":2,"i3":12345678,"i4":1234567890,"f1":123.456,"s1":"haha","s2":"wat een dag","d":[{"b1":true,"i1":5,"i2":231},{"i1":15,"i2":131},{"b1":true,"b2":true,"i1":25,"i2":31}]}"#
    );
}

#[test]
fn zero_model_matches_serde_json() {
    let zero = Outer {
        d: vec![Inner::default()],
        ..Default::default()
    };
    assert_eq!(encode(&zero), serde_json::to_vec(&zero).unwrap());
    assert_eq!(encode(&Outer::default()), b"{}");
}

#[test]
fn serde_output_decodes_to_sample() {
    let bytes = serde_json::to_vec_pretty(&sample()).unwrap();
    let mut dec = zjson::acquire_decoder(&bytes);
    let mut got = Outer::default();
    dec.object(&mut got).unwrap();
    assert_eq!(got, sample());
}

#[test]
fn floats_match_serde_json_when_layouts_agree() {
    // Non-integral values between 1e-4 and 1e6 print as plain decimals in both.
    for f1 in [0.5, -2.25, 999_999.5, 0.000_123, 3.141_592_653_589_793] {
        let model = Outer {
            f1,
            ..Default::default()
        };
        assert_eq!(
            String::from_utf8(encode(&model)).unwrap(),
            serde_json::to_string(&model).unwrap(),
            "{f1}"
        );
    }
}

#[test]
fn string_maps_decode_from_serde_json() {
    let map = HashMap::from([
        ("plain".to_owned(), "value".to_owned()),
        ("quote\"d".to_owned(), "line\nbreak\ttab".to_owned()),
    ]);
    let bytes = serde_json::to_vec(&map).unwrap();
    let mut got = HashMap::new();
    zjson::acquire_decoder(&bytes).string_map(&mut got).unwrap();
    assert_eq!(got, map);

    let mut enc = zjson::acquire_encoder(64);
    enc.string_map(&map);
    let reparsed: HashMap<String, String> = serde_json::from_slice(enc.bytes()).unwrap();
    assert_eq!(reparsed, map);
}

#[test]
fn timestamps_have_compact_layout() {
    let shape = Regex::new(r#"^"\d{14}(\.\d{1,3})?Z"$"#).unwrap();
    let base = Utc.with_ymd_and_hms(2023, 11, 5, 7, 8, 9).unwrap();
    for millis in [0, 1, 10, 100, 123, 999] {
        let t = base + chrono::Duration::milliseconds(millis);
        let mut enc = zjson::acquire_encoder(32);
        enc.timestamp(&t);
        let text = String::from_utf8(enc.bytes().to_vec()).unwrap();
        assert!(shape.is_match(&text), "{text}");

        let back: DateTime<Utc> = zjson::acquire_decoder(enc.bytes()).timestamp().unwrap();
        assert_eq!(back, t);
    }
}
