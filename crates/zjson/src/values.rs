//! Arrays of scalars and of objects.
//!
//! Slices and vectors of [`ArrayElement`] types implement [`ArrayEncoder`],
//! and [`Decoder::values`] reads them back. Booleans travel as `1`/`0`, floats
//! in the shortest `%g` layout unless written with [`Encoder::float_array`].
//! [`Objects`] wraps a slice of [`ObjectEncoder`] types.

use crate::{ArrayEncoder, DecodeError, Decoder, Encoder, FloatFormat, ObjectEncoder};

/// A scalar stored as a bare array element.
pub trait ArrayElement: Sized {
    /// Writes `self` as one element.
    fn encode(&self, enc: &mut Encoder);

    /// Reads one element.
    ///
    /// # Errors
    ///
    /// Fails if the next token is not a valid element of this type.
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, DecodeError>;
}

impl ArrayElement for bool {
    fn encode(&self, enc: &mut Encoder) {
        enc.int_bool(*self);
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        dec.int_bool()
    }
}

impl ArrayElement for f64 {
    fn encode(&self, enc: &mut Encoder) {
        enc.float(*self, FloatFormat::General, None);
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        dec.f64()
    }
}

macro_rules! int_elements {
    ($($ty:ident)*) => {$(
        impl ArrayElement for $ty {
            fn encode(&self, enc: &mut Encoder) {
                enc.$ty(*self);
            }

            fn decode(dec: &mut Decoder<'_>) -> Result<Self, DecodeError> {
                dec.$ty()
            }
        }
    )*};
}

int_elements!(i32 i64 isize u8 u16 u32 u64 usize);

impl<T: ArrayElement> ArrayEncoder for [T] {
    fn is_empty(&self) -> bool {
        <[T]>::is_empty(self)
    }

    fn encode_values(&self, enc: &mut Encoder) {
        for v in self {
            v.encode(enc);
        }
    }
}

impl<T: ArrayElement> ArrayEncoder for Vec<T> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }

    fn encode_values(&self, enc: &mut Encoder) {
        self.as_slice().encode_values(enc);
    }
}

/// A slice of objects written as an array, one object per element.
///
/// Elements are written even when empty, so positions survive a round trip.
///
/// ```
/// use zjson::{Encoder, ObjectEncoder, Objects};
///
/// struct Id(u32);
///
/// impl ObjectEncoder for Id {
///     fn is_empty(&self) -> bool {
///         self.0 == 0
///     }
///
///     fn encode_fields(&self, enc: &mut Encoder) {
///         enc.u32_field_opt("id", self.0);
///     }
/// }
///
/// let mut enc = Encoder::new();
/// enc.array(&Objects(&[Id(1), Id(0)]));
/// assert_eq!(enc.bytes(), br#"[{"id":1},{}]"#);
/// ```
#[derive(Debug)]
pub struct Objects<'a, T>(pub &'a [T]);

impl<T: ObjectEncoder> ArrayEncoder for Objects<'_, T> {
    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn encode_values(&self, enc: &mut Encoder) {
        for o in self.0 {
            enc.object(o);
        }
    }
}

impl Encoder {
    /// Writes `values` as an array of floats in one layout.
    pub fn float_array(&mut self, values: &[f64], format: FloatFormat, precision: Option<usize>) {
        self.start_array();
        for &v in values {
            self.float(v, format, precision);
        }
        self.end_array();
    }

    /// Writes a field key and `values` as an array of floats.
    pub fn float_array_field(
        &mut self,
        key: &str,
        values: &[f64],
        format: FloatFormat,
        precision: Option<usize>,
    ) {
        self.key(key);
        self.float_array(values, format, precision);
    }
}

impl Decoder<'_> {
    /// Decodes an array of scalars into `out`, replacing its contents.
    ///
    /// # Errors
    ///
    /// Fails on malformed structure and on any invalid element. `out` holds
    /// the elements decoded before the failure.
    pub fn values<T: ArrayElement>(&mut self, out: &mut Vec<T>) -> Result<(), DecodeError> {
        out.clear();
        self.array(|dec| {
            out.push(T::decode(dec)?);
            Ok(())
        })
    }
}
