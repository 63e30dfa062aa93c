use rstest::rstest;

use crate::{
    Decoder, Encoder,
    testing::{Data1, Data2},
};

fn decode(input: &str) -> Data1 {
    let mut dec = Decoder::acquire(input.as_bytes());
    let mut got = Data1::default();
    dec.object(&mut got).unwrap();
    assert!(dec.error().is_none());
    got
}

#[rstest]
#[case::empty("{}", Data1::default())]
#[case::empty_wsp("  {  }  ", Data1::default())]
#[case::b1(r#"  { "b1"  : true  } "#, Data1 { b1: true, ..Default::default() })]
#[case::b2(r#"  { "b2"  : false  } "#, Data1::default())]
#[case::i1_small(r#"  { "i1"  : 12  } "#, Data1 { i1: 12, ..Default::default() })]
#[case::i1_max(r#"  { "i1"  : 255  } "#, Data1 { i1: 255, ..Default::default() })]
#[case::i2(r#"  { "i2"  : 1234  } "#, Data1 { i2: 1234, ..Default::default() })]
#[case::i3(r#"  { "i3"  : 12345678  } "#, Data1 { i3: 12_345_678, ..Default::default() })]
#[case::i3_negative(r#"  { "i3"  : -12345678  } "#, Data1 { i3: -12_345_678, ..Default::default() })]
#[case::i3_long(r#"  { "i3"  : -123456789  } "#, Data1 { i3: -123_456_789, ..Default::default() })]
#[case::i4(
    r#"  { "i4"  : 1234567812345678  } "#,
    Data1 { i4: 1_234_567_812_345_678, ..Default::default() }
)]
#[case::f1_int(r#"  { "f1"  : 1  } "#, Data1 { f1: 1.0, ..Default::default() })]
#[case::f1_fraction(r#"  { "f1"  : 1.25  } "#, Data1 { f1: 1.25, ..Default::default() })]
#[case::f1_negative(
    r#"  { "f1"  : -987.654321  } "#,
    Data1 { f1: -987.654_321, ..Default::default() }
)]
#[case::f1_exponent(r#"  { "f1"  : 10e12  } "#, Data1 { f1: 10e12, ..Default::default() })]
#[case::s1_empty(r#"  { "s1"  : ""  } "#, Data1::default())]
#[case::s1(r#"  { "s1"  : "hihi"  } "#, Data1 { s1: "hihi".into(), ..Default::default() })]
#[case::s2_escaped(
    r#"  { "s2"  : "This is\n some text\t with\r whitespace  \r\n"  } "#,
    Data1 { s2: "This is\n some text\t with\r whitespace  \r\n".into(), ..Default::default() }
)]
#[case::d_empty(r#"  { "d"  :  [  ]  } "#, Data1::default())]
#[case::d_empty_element(
    r#"  { "d"  :  [ { } ]  } "#,
    Data1 { d: vec![Data2::default()], ..Default::default() }
)]
#[case::d_one(
    r#"  { "d"  :  [ { "i2" : 500, "b2"  : true } ]  } "#,
    Data1 { d: vec![Data2::new(false, true, 0, 500)], ..Default::default() }
)]
#[case::d_two(
    r#"  { "d"  :  [ { "i2" : 500, "b2"  : true } , { "i1" :100, "b1": true } ]  } "#,
    Data1 {
        d: vec![Data2::new(false, true, 0, 500), Data2::new(true, false, 100, 0)],
        ..Default::default()
    }
)]
#[case::combo(
    r#" { "s2":  "non"  ,"d"  :  [ { "i2" : 500, "b2"  : true } , { "i1" :100, "b1": true } ]  , "b2" :true, "i3" : -54321, "f1"   : -5.67, "i1": 9  }  "#,
    Data1 {
        b2: true,
        i1: 9,
        i3: -54_321,
        f1: -5.67,
        s2: "non".into(),
        d: vec![Data2::new(false, true, 0, 500), Data2::new(true, false, 100, 0)],
        ..Default::default()
    }
)]
#[case::escaped_key(r#"{"\i1":7}"#, Data1 { i1: 7, ..Default::default() })]
fn decode_data1(#[case] input: &str, #[case] expected: Data1) {
    assert_eq!(decode(input), expected);
}

#[test]
fn sample_round_trip() {
    let sample = Data1::sample();
    let mut enc = Encoder::acquire(256);
    enc.object(&sample);
    assert_eq!(decode(core::str::from_utf8(enc.bytes()).unwrap()), sample);
}

#[test]
fn escaped_key_survives_value_unescape() {
    // The key is unescaped into its own buffer, so unescaping the value
    // cannot clobber it.
    let got = decode(r#"{"s\1":"a\tb","\s2":"c\nd"}"#);
    assert_eq!(got.s1, "a\tb");
    assert_eq!(got.s2, "c\nd");
}

#[test]
fn nested_objects_with_escaped_keys() {
    let got = decode(r#"{"\d":[{"\i1":1,"i\2":2},{"b\1":true}]}"#);
    assert_eq!(got.d, [Data2::new(false, false, 1, 2), Data2::new(true, false, 0, 0)]);
}

#[test]
fn decoder_is_reusable_after_reset() {
    let first = br#"{"i1":1}"#;
    let second = br#"{"i2":2}"#;
    let mut dec = Decoder::acquire(first);
    let mut a = Data1::default();
    dec.object(&mut a).unwrap();

    dec.reset(second);
    let mut b = Data1::default();
    dec.object(&mut b).unwrap();
    assert_eq!((a.i1, a.i2), (1, 0));
    assert_eq!((b.i1, b.i2), (0, 2));
}
