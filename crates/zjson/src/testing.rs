//! Hand-written models used by tests, benchmarks and the fuzzer.
//!
//! [`Data1`] exercises every scalar kind plus a nested array of [`Data2`]
//! objects. All fields are written with the `*_field_opt` writers, so zero
//! values are omitted.

use crate::{DecodeError, Decoder, Encoder, FloatFormat, ObjectDecoder, ObjectEncoder, Objects};

/// Outer test model.
#[derive(Debug, Clone, Default, PartialEq)]
#[allow(missing_docs)]
pub struct Data1 {
    pub b1: bool,
    pub b2: bool,
    pub i1: u8,
    pub i2: u16,
    pub i3: i64,
    pub i4: u64,
    pub f1: f64,
    pub s1: String,
    pub s2: String,
    pub d: Vec<Data2>,
}

/// Array element of [`Data1::d`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct Data2 {
    pub b1: bool,
    pub b2: bool,
    pub i1: u8,
    pub i2: u16,
}

impl Data1 {
    /// The reference document used by the golden tests and benchmarks.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            b1: false,
            b2: true,
            i1: 1,
            i2: 2,
            i3: 12_345_678,
            i4: 1_234_567_890,
            f1: 123.456,
            s1: "haha".to_owned(),
            s2: "wat een dag".to_owned(),
            d: vec![
                Data2::new(true, false, 5, 231),
                Data2::new(false, false, 15, 131),
                Data2::new(true, true, 25, 31),
            ],
        }
    }
}

impl Data2 {
    /// Builds an element from its fields in declaration order.
    #[must_use]
    pub const fn new(b1: bool, b2: bool, i1: u8, i2: u16) -> Self {
        Self { b1, b2, i1, i2 }
    }
}

impl ObjectEncoder for Data1 {
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
        enc.escaped_string_field_opt("s1", &self.s1);
        enc.escaped_string_field_opt("s2", &self.s2);
        enc.array_field_opt("d", Some(&Objects(&self.d)));
    }
}

impl ObjectDecoder for Data1 {
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
                let mut d = Data2::default();
                dec.object(&mut d)?;
                self.d.push(d);
                Ok(())
            })?,
            _ => return Err(DecodeError::unknown_field("Data1", key)),
        }
        Ok(())
    }
}

impl ObjectEncoder for Data2 {
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

impl ObjectDecoder for Data2 {
    fn decode_field(&mut self, dec: &mut Decoder<'_>, key: &[u8]) -> Result<(), DecodeError> {
        match key {
            b"b1" => self.b1 = dec.bool()?,
            b"b2" => self.b2 = dec.bool()?,
            b"i1" => self.i1 = dec.u8()?,
            b"i2" => self.i2 = dec.u16()?,
            _ => return Err(DecodeError::unknown_field("Data2", key)),
        }
        Ok(())
    }
}
