//! Append-only JSON writer.
//!
//! Every value writer appends the value followed by a `,`. The closing
//! writers ([`Encoder::end_object`], [`Encoder::end_array`]) drop a trailing
//! `,` before writing the delimiter, and [`Encoder::bytes`] drops the one left
//! after the outermost value. Nothing is validated: unbalanced start and end
//! calls produce malformed output.

use core::mem;
use std::{collections::HashMap, hash::BuildHasher};

use chrono::{DateTime, Utc};

use crate::{
    float::{self, FloatFormat},
    pool,
    timestamp,
};

/// A value written as a JSON object through [`Encoder::object`] and friends.
pub trait ObjectEncoder {
    /// Whether the `*_opt` writers should omit the object.
    fn is_empty(&self) -> bool;

    /// Writes the object's fields, typically with the `*_field_opt` writers.
    fn encode_fields(&self, enc: &mut Encoder);
}

/// A value written as a JSON array through [`Encoder::array`] and friends.
pub trait ArrayEncoder {
    /// Whether the `*_opt` writers should omit the array.
    fn is_empty(&self) -> bool;

    /// Writes the array's elements.
    fn encode_values(&self, enc: &mut Encoder);
}

/// Streaming JSON writer over a pooled byte buffer.
///
/// Dropping (or [releasing](Encoder::release)) an encoder returns its buffer
/// to the encoder pool.
///
/// ```rust
/// let mut enc = zjson::acquire_encoder(64);
/// enc.start_object();
/// enc.u64_field_opt("id", 42);
/// enc.escaped_string_field("name", "a \"quoted\" name");
/// enc.bool_field_opt("hidden", false);
/// enc.end_object();
/// assert_eq!(enc.bytes(), br#"{"id":42,"name":"a \"quoted\" name"}"#);
/// ```
#[derive(Debug, Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

macro_rules! int_writers {
    ($(
        $ty:ty => $writer:ident, $field:ident, $field_opt:ident via $wide:ident as $wide_ty:ty;
    )*) => {$(
        #[doc = concat!("Writes a `", stringify!($ty), "` value.")]
        pub fn $writer(&mut self, v: $ty) {
            self.$wide(<$wide_ty>::from(v));
        }

        #[doc = concat!("Writes a field key and a `", stringify!($ty), "` value.")]
        pub fn $field(&mut self, key: &str, v: $ty) {
            self.key(key);
            self.$writer(v);
        }

        #[doc = concat!(
            "Writes a field key and a `", stringify!($ty), "` value unless it is zero."
        )]
        pub fn $field_opt(&mut self, key: &str, v: $ty) {
            if v != 0 {
                self.$field(key, v);
            }
        }
    )*};
}

impl Encoder {
    /// Creates an encoder with an empty, unpooled buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a buffer from the encoder pool.
    ///
    /// A buffer smaller than
    /// [`fix_buffer_size(capacity)`](crate::fix_buffer_size) is grown to it.
    #[must_use]
    pub fn acquire(capacity: usize) -> Self {
        let mut buf = pool::take_encoder_buffer();
        let size = crate::fix_buffer_size(capacity);
        if buf.capacity() < size {
            buf.reserve_exact(size);
        }
        Self { buf }
    }

    /// Returns the buffer to the encoder pool.
    pub fn release(self) {
        drop(self);
    }

    /// The encoded document, without the trailing `,` of the last value.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        match self.buf.split_last() {
            Some((b',', rest)) => rest,
            _ => &self.buf,
        }
    }

    /// Moves the encoded document out of the encoder.
    ///
    /// The buffer leaves with the document, so nothing returns to the pool.
    #[must_use]
    pub fn into_vec(mut self) -> Vec<u8> {
        let mut buf = mem::take(&mut self.buf);
        if buf.last() == Some(&b',') {
            buf.pop();
        }
        buf
    }

    /// Number of bytes written, including any trailing `,`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written since the last reset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Discards everything written, keeping the allocation.
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Appends pre-encoded bytes verbatim.
    ///
    /// No separator is added; a complete value should end with `,`.
    pub fn raw(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes `o` as an object.
    pub fn object<O: ObjectEncoder + ?Sized>(&mut self, o: &O) {
        self.start_object();
        o.encode_fields(self);
        self.end_object();
    }

    /// Writes `o` as an object unless it is absent or empty.
    pub fn object_opt<O: ObjectEncoder + ?Sized>(&mut self, o: Option<&O>) {
        if let Some(o) = o.filter(|o| !o.is_empty()) {
            self.object(o);
        }
    }

    /// Writes a field key and `o` as an object.
    pub fn object_field<O: ObjectEncoder + ?Sized>(&mut self, key: &str, o: &O) {
        self.start_object_field(key);
        o.encode_fields(self);
        self.end_object();
    }

    /// Writes a field key and `o` as an object unless it is absent or empty.
    pub fn object_field_opt<O: ObjectEncoder + ?Sized>(&mut self, key: &str, o: Option<&O>) {
        if let Some(o) = o.filter(|o| !o.is_empty()) {
            self.object_field(key, o);
        }
    }

    /// Writes `{`.
    pub fn start_object(&mut self) {
        self.buf.push(b'{');
    }

    /// Writes a field key and `{`.
    pub fn start_object_field(&mut self, key: &str) {
        self.key(key);
        self.buf.push(b'{');
    }

    /// Drops a trailing `,` and writes `},`.
    pub fn end_object(&mut self) {
        self.close(b'}');
    }

    /// Writes `a` as an array.
    pub fn array<A: ArrayEncoder + ?Sized>(&mut self, a: &A) {
        self.start_array();
        a.encode_values(self);
        self.end_array();
    }

    /// Writes `a` as an array unless it is absent or empty.
    pub fn array_opt<A: ArrayEncoder + ?Sized>(&mut self, a: Option<&A>) {
        if let Some(a) = a.filter(|a| !a.is_empty()) {
            self.array(a);
        }
    }

    /// Writes a field key and `a` as an array.
    pub fn array_field<A: ArrayEncoder + ?Sized>(&mut self, key: &str, a: &A) {
        self.start_array_field(key);
        a.encode_values(self);
        self.end_array();
    }

    /// Writes a field key and `a` as an array unless it is absent or empty.
    pub fn array_field_opt<A: ArrayEncoder + ?Sized>(&mut self, key: &str, a: Option<&A>) {
        if let Some(a) = a.filter(|a| !a.is_empty()) {
            self.array_field(key, a);
        }
    }

    /// Writes `[`.
    pub fn start_array(&mut self) {
        self.buf.push(b'[');
    }

    /// Writes a field key and `[`.
    pub fn start_array_field(&mut self, key: &str) {
        self.key(key);
        self.buf.push(b'[');
    }

    /// Drops a trailing `,` and writes `],`.
    pub fn end_array(&mut self) {
        self.close(b']');
    }

    fn close(&mut self, delimiter: u8) {
        if self.buf.last() == Some(&b',') {
            self.buf.pop();
        }
        self.buf.push(delimiter);
        self.buf.push(b',');
    }

    /// Writes `"key":`.
    ///
    /// The key is written as is; it must not need escaping.
    pub fn key(&mut self, key: &str) {
        self.buf.push(b'"');
        self.buf.extend_from_slice(key.as_bytes());
        self.buf.extend_from_slice(b"\":");
    }

    /// Writes `true` or `false`.
    pub fn bool(&mut self, b: bool) {
        self.buf
            .extend_from_slice(if b { b"true," as &[u8] } else { b"false," });
    }

    /// Writes a field key and a boolean.
    pub fn bool_field(&mut self, key: &str, b: bool) {
        self.key(key);
        self.bool(b);
    }

    /// Writes a field key and `true` if `b` is set.
    pub fn bool_field_opt(&mut self, key: &str, b: bool) {
        if b {
            self.bool_field(key, b);
        }
    }

    /// Writes a boolean as `1` or `0`.
    pub fn int_bool(&mut self, b: bool) {
        self.buf.extend_from_slice(if b { b"1," } else { b"0," });
    }

    /// Writes a field key and a boolean as `1` or `0`.
    pub fn int_bool_field(&mut self, key: &str, b: bool) {
        self.key(key);
        self.int_bool(b);
    }

    /// Writes a field key and `1` if `b` is set.
    pub fn int_bool_field_opt(&mut self, key: &str, b: bool) {
        if b {
            self.int_bool_field(key, b);
        }
    }

    /// Writes a signed integer.
    pub fn i64(&mut self, v: i64) {
        if v < 0 {
            self.buf.push(b'-');
        }
        self.u64(v.unsigned_abs());
    }

    /// Writes an unsigned integer.
    #[expect(clippy::cast_possible_truncation)]
    pub fn u64(&mut self, v: u64) {
        if v < 10 {
            self.buf.push(b'0' + v as u8);
        } else if v < 100 {
            self.buf
                .extend_from_slice(&[b'0' + (v / 10) as u8, b'0' + (v % 10) as u8]);
        } else {
            let mut digits = [0u8; 20];
            let mut pos = digits.len();
            let mut n = v;
            while n > 0 {
                pos -= 1;
                digits[pos] = b'0' + (n % 10) as u8;
                n /= 10;
            }
            self.buf.extend_from_slice(&digits[pos..]);
        }
        self.buf.push(b',');
    }

    /// Writes a field key and a signed integer.
    pub fn i64_field(&mut self, key: &str, v: i64) {
        self.key(key);
        self.i64(v);
    }

    /// Writes a field key and a signed integer unless it is zero.
    pub fn i64_field_opt(&mut self, key: &str, v: i64) {
        if v != 0 {
            self.i64_field(key, v);
        }
    }

    /// Writes a field key and an unsigned integer.
    pub fn u64_field(&mut self, key: &str, v: u64) {
        self.key(key);
        self.u64(v);
    }

    /// Writes a field key and an unsigned integer unless it is zero.
    pub fn u64_field_opt(&mut self, key: &str, v: u64) {
        if v != 0 {
            self.u64_field(key, v);
        }
    }

    int_writers! {
        i8 => i8, i8_field, i8_field_opt via i64 as i64;
        i16 => i16, i16_field, i16_field_opt via i64 as i64;
        i32 => i32, i32_field, i32_field_opt via i64 as i64;
        u8 => u8, u8_field, u8_field_opt via u64 as u64;
        u16 => u16, u16_field, u16_field_opt via u64 as u64;
        u32 => u32, u32_field, u32_field_opt via u64 as u64;
    }

    /// Writes a pointer-sized signed integer.
    pub fn isize(&mut self, v: isize) {
        self.i64(v as i64);
    }

    /// Writes a field key and a pointer-sized signed integer.
    pub fn isize_field(&mut self, key: &str, v: isize) {
        self.key(key);
        self.isize(v);
    }

    /// Writes a field key and a pointer-sized signed integer unless it is
    /// zero.
    pub fn isize_field_opt(&mut self, key: &str, v: isize) {
        if v != 0 {
            self.isize_field(key, v);
        }
    }

    /// Writes a pointer-sized unsigned integer.
    pub fn usize(&mut self, v: usize) {
        self.u64(v as u64);
    }

    /// Writes a field key and a pointer-sized unsigned integer.
    pub fn usize_field(&mut self, key: &str, v: usize) {
        self.key(key);
        self.usize(v);
    }

    /// Writes a field key and a pointer-sized unsigned integer unless it is
    /// zero.
    pub fn usize_field_opt(&mut self, key: &str, v: usize) {
        if v != 0 {
            self.usize_field(key, v);
        }
    }

    /// Writes a float in the given layout.
    ///
    /// `precision` is forwarded to the layout; `None` writes the fewest digits
    /// that parse back to `v`. Exponents have a sign and at least two digits.
    pub fn float(&mut self, v: f64, format: FloatFormat, precision: Option<usize>) {
        float::append(&mut self.buf, v, format, precision);
        self.buf.push(b',');
    }

    /// Writes a field key and a float.
    pub fn float_field(
        &mut self,
        key: &str,
        v: f64,
        format: FloatFormat,
        precision: Option<usize>,
    ) {
        self.key(key);
        self.float(v, format, precision);
    }

    /// Writes a field key and a float unless it is zero.
    pub fn float_field_opt(
        &mut self,
        key: &str,
        v: f64,
        format: FloatFormat,
        precision: Option<usize>,
    ) {
        if v != 0.0 {
            self.float_field(key, v, format, precision);
        }
    }

    /// Writes a timestamp as `"YYYYMMDDHHMMSS[.fff]Z"`.
    pub fn timestamp(&mut self, t: &DateTime<Utc>) {
        self.buf.push(b'"');
        timestamp::append(&mut self.buf, t);
        self.buf.extend_from_slice(b"\",");
    }

    /// Writes a field key and a timestamp.
    pub fn timestamp_field(&mut self, key: &str, t: &DateTime<Utc>) {
        self.key(key);
        self.timestamp(t);
    }

    /// Writes a field key and a timestamp, unless `t` is after
    /// 1900-01-01T00:00:00Z.
    ///
    /// Only timestamps at or before the threshold are written.
    pub fn timestamp_field_opt(&mut self, key: &str, t: &DateTime<Utc>) {
        if !timestamp::is_after_threshold(t) {
            self.timestamp_field(key, t);
        }
    }

    /// Writes a quoted string without escaping.
    pub fn string(&mut self, s: &str) {
        self.bytes_string(s.as_bytes());
    }

    /// Writes a field key and a quoted string without escaping.
    pub fn string_field(&mut self, key: &str, s: &str) {
        self.key(key);
        self.string(s);
    }

    /// Writes a field key and a quoted string without escaping, unless it is
    /// empty.
    pub fn string_field_opt(&mut self, key: &str, s: &str) {
        if !s.is_empty() {
            self.string_field(key, s);
        }
    }

    /// Writes a quoted string, escaping `\`, `"`, newline, carriage return and
    /// tab.
    pub fn escaped_string(&mut self, s: &str) {
        self.escaped_bytes_string(s.as_bytes());
    }

    /// Writes a field key and an escaped string.
    pub fn escaped_string_field(&mut self, key: &str, s: &str) {
        self.key(key);
        self.escaped_string(s);
    }

    /// Writes a field key and an escaped string unless it is empty.
    pub fn escaped_string_field_opt(&mut self, key: &str, s: &str) {
        if !s.is_empty() {
            self.escaped_string_field(key, s);
        }
    }

    /// Writes bytes as a quoted string without escaping.
    pub fn bytes_string(&mut self, s: &[u8]) {
        self.buf.push(b'"');
        self.buf.extend_from_slice(s);
        self.buf.extend_from_slice(b"\",");
    }

    /// Writes a field key and bytes as a quoted string without escaping.
    pub fn bytes_string_field(&mut self, key: &str, s: &[u8]) {
        self.key(key);
        self.bytes_string(s);
    }

    /// Writes a field key and bytes as a quoted string without escaping,
    /// unless they are empty.
    pub fn bytes_string_field_opt(&mut self, key: &str, s: &[u8]) {
        if !s.is_empty() {
            self.bytes_string_field(key, s);
        }
    }

    /// Writes bytes as an escaped quoted string.
    pub fn escaped_bytes_string(&mut self, s: &[u8]) {
        self.buf.push(b'"');
        self.escape(s);
        self.buf.extend_from_slice(b"\",");
    }

    /// Writes a field key and bytes as an escaped quoted string.
    pub fn escaped_bytes_string_field(&mut self, key: &str, s: &[u8]) {
        self.key(key);
        self.escaped_bytes_string(s);
    }

    /// Writes a field key and bytes as an escaped quoted string, unless they
    /// are empty.
    pub fn escaped_bytes_string_field_opt(&mut self, key: &str, s: &[u8]) {
        if !s.is_empty() {
            self.escaped_bytes_string_field(key, s);
        }
    }

    fn escape(&mut self, s: &[u8]) {
        let mut start = 0;
        for (ix, &b) in s.iter().enumerate() {
            let escaped = match b {
                b'\\' | b'"' => b,
                b'\n' => b'n',
                b'\r' => b'r',
                b'\t' => b't',
                _ => continue,
            };
            self.buf.extend_from_slice(&s[start..ix]);
            self.buf.extend_from_slice(&[b'\\', escaped]);
            start = ix + 1;
        }
        self.buf.extend_from_slice(&s[start..]);
    }

    /// Writes a map as an object of escaped strings.
    ///
    /// Keys are escaped as well. Entries follow the map's iteration order.
    pub fn string_map<K, V, S>(&mut self, m: &HashMap<K, V, S>)
    where
        K: AsRef<str>,
        V: AsRef<str>,
        S: BuildHasher,
    {
        self.start_object();
        for (k, v) in m {
            self.buf.push(b'"');
            self.escape(k.as_ref().as_bytes());
            self.buf.extend_from_slice(b"\":");
            self.escaped_string(v.as_ref());
        }
        self.end_object();
    }

    /// Writes a field key and a map as an object of escaped strings.
    pub fn string_map_field<K, V, S>(&mut self, key: &str, m: &HashMap<K, V, S>)
    where
        K: AsRef<str>,
        V: AsRef<str>,
        S: BuildHasher,
    {
        self.key(key);
        self.string_map(m);
    }

    /// Writes a field key and a map as an object of escaped strings, unless
    /// the map is empty.
    pub fn string_map_field_opt<K, V, S>(&mut self, key: &str, m: &HashMap<K, V, S>)
    where
        K: AsRef<str>,
        V: AsRef<str>,
        S: BuildHasher,
    {
        if !m.is_empty() {
            self.string_map_field(key, m);
        }
    }
}

impl Drop for Encoder {
    fn drop(&mut self) {
        pool::give_encoder_buffer(mem::take(&mut self.buf));
    }
}
