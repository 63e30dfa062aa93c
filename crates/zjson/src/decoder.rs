//! Pull-style JSON reader driven by hand-written field dispatch.
//!
//! The decoder never builds a document tree. Callers ask for the value they
//! expect next ([`Decoder::u8`], [`Decoder::string`], [`Decoder::object`],
//! ...) and the decoder scans exactly that much of the input. Whitespace
//! (space, tab, carriage return, newline) is skipped around every token.
//!
//! # Errors
//!
//! Every reader returns a [`DecodeError`] on malformed input. The first error
//! is also kept on the decoder ("sticky"): every later read returns it again
//! until [`Decoder::reset`], and [`Decoder::error`] reports it. There is no
//! recovery within a document.
//!
//! # Escapes
//!
//! Strings are returned as raw input slices plus an `escaped` flag. Only
//! `\\`, `\"`, `\b`, `\f`, `\n`, `\r` and `\t` are decoded by
//! [`Decoder::unescaped`]; any other escaped byte is kept as is, so `\u0041`
//! decodes to `u0041`.

use core::{mem, str::FromStr};
use std::{collections::HashMap, hash::BuildHasher};

use bstr::ByteSlice;
use chrono::{DateTime, Utc};
use tracing::trace;

use crate::{
    error::DecodeError,
    pool::{self, Reusable},
    size::{DEFAULT_SCRATCH_CAPACITY, fix_buffer_size},
    timestamp,
};

/// A value decoded from a JSON object, one field at a time.
pub trait ObjectDecoder {
    /// Decodes the value of `key`.
    ///
    /// The key is already unescaped. Implementations read exactly one value
    /// from `dec`, and usually return [`DecodeError::unknown_field`] for keys
    /// they do not know.
    ///
    /// # Errors
    ///
    /// Any error aborts the enclosing [`Decoder::object`] call.
    fn decode_field(&mut self, dec: &mut Decoder<'_>, key: &[u8]) -> Result<(), DecodeError>;
}

/// Reusable buffers of a decoder, kept in the decoder pool between uses.
#[derive(Debug, Default)]
pub(crate) struct Scratch {
    /// Target of [`Decoder::unescaped`].
    value: Vec<u8>,
    /// Unescaped object keys. Borrowed while a field decoder runs.
    keys: Vec<u8>,
}

impl Reusable for Scratch {
    fn capacity(&self) -> usize {
        self.value.capacity() + self.keys.capacity()
    }

    fn clear(&mut self) {
        self.value.clear();
        self.keys.clear();
    }
}

/// Streaming JSON reader over a borrowed input.
///
/// ```rust
/// use zjson::{DecodeError, Decoder, ObjectDecoder};
///
/// #[derive(Default)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl ObjectDecoder for Point {
///     fn decode_field(&mut self, dec: &mut Decoder<'_>, key: &[u8]) -> Result<(), DecodeError> {
///         match key {
///             b"x" => self.x = dec.i32()?,
///             b"y" => self.y = dec.i32()?,
///             _ => return Err(DecodeError::unknown_field("Point", key)),
///         }
///         Ok(())
///     }
/// }
///
/// let mut dec = zjson::acquire_decoder(br#" { "x": 3, "y" : -4 } "#);
/// let mut p = Point::default();
/// dec.object(&mut p)?;
/// assert_eq!((p.x, p.y), (3, -4));
/// # Ok::<(), DecodeError>(())
/// ```
#[derive(Debug)]
pub struct Decoder<'a> {
    buf: &'a [u8],
    ptr: usize,
    err: Option<DecodeError>,
    scratch: Scratch,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder over `data` with unpooled scratch buffers.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_scratch(data, Scratch::default())
    }

    /// Creates a decoder over `data`, reusing scratch buffers from the
    /// decoder pool.
    #[must_use]
    pub fn acquire(data: &'a [u8]) -> Self {
        Self::with_scratch(data, pool::take_decoder_scratch())
    }

    fn with_scratch(data: &'a [u8], scratch: Scratch) -> Self {
        Self {
            buf: data,
            ptr: 0,
            err: None,
            scratch,
        }
    }

    /// Returns the scratch buffers to the decoder pool.
    pub fn release(self) {
        drop(self);
    }

    /// Starts over on `data`, clearing the sticky error.
    pub fn reset(&mut self, data: &'a [u8]) {
        self.buf = data;
        self.ptr = 0;
        self.err = None;
        self.scratch.clear();
    }

    /// The first error encountered since the last reset.
    #[must_use]
    pub fn error(&self) -> Option<&DecodeError> {
        self.err.as_ref()
    }

    /// Offset of the next unread byte.
    #[must_use]
    pub fn position(&self) -> usize {
        self.ptr
    }

    /// Decodes an object, calling `o` once per field.
    ///
    /// # Errors
    ///
    /// Fails on a missing `{`, `}`, `,` or `:`, on a key that is not a string,
    /// and with any error returned by `o`.
    pub fn object<O: ObjectDecoder + ?Sized>(&mut self, o: &mut O) -> Result<(), DecodeError> {
        self.check()?;
        self.open(b'{')?;
        let mut first = true;
        while self.next_element(b'}', &mut first)? {
            let (key, escaped) = self.read_string()?;
            self.expect_colon()?;
            let result = if escaped {
                let mut keys = mem::take(&mut self.scratch.keys);
                unescape_into(&mut keys, key);
                let result = o.decode_field(self, &keys);
                keys.clear();
                self.scratch.keys = keys;
                result
            } else {
                o.decode_field(self, key)
            };
            if let Err(err) = result {
                return self.fail(err);
            }
        }
        Ok(())
    }

    /// Decodes an array, calling `f` once per element.
    ///
    /// `f` must consume exactly one value.
    ///
    /// # Errors
    ///
    /// Fails on a missing `[`, `]` or `,`, and with any error returned by `f`.
    pub fn array<F>(&mut self, mut f: F) -> Result<(), DecodeError>
    where
        F: FnMut(&mut Self) -> Result<(), DecodeError>,
    {
        self.check()?;
        self.open(b'[')?;
        let mut first = true;
        while self.next_element(b']', &mut first)? {
            if let Err(err) = f(self) {
                return self.fail(err);
            }
        }
        Ok(())
    }

    /// Decodes a string, returning its raw bytes and whether they contain
    /// escapes.
    ///
    /// Pass escaped strings through [`Decoder::unescaped`].
    ///
    /// # Errors
    ///
    /// Fails on a missing opening quote or on input ending inside the string.
    pub fn string(&mut self) -> Result<(&'a [u8], bool), DecodeError> {
        self.check()?;
        self.read_string()
    }

    /// Decodes a string into an owned, unescaped `String`.
    ///
    /// # Errors
    ///
    /// As [`Decoder::string`], and fails if the unescaped bytes are not UTF-8.
    pub fn string_owned(&mut self) -> Result<String, DecodeError> {
        self.check()?;
        let (raw, escaped) = self.read_string()?;
        self.owned(raw, escaped)
    }

    /// Decodes an object of strings into `out`, unescaping keys and values.
    ///
    /// Existing entries of `out` are kept unless overwritten.
    ///
    /// # Errors
    ///
    /// Fails on malformed structure, on non-string values, and on keys or
    /// values that are not UTF-8.
    pub fn string_map<S: BuildHasher>(
        &mut self,
        out: &mut HashMap<String, String, S>,
    ) -> Result<(), DecodeError> {
        self.check()?;
        self.open(b'{')?;
        let mut first = true;
        while self.next_element(b'}', &mut first)? {
            let (raw, escaped) = self.read_string()?;
            let key = self.owned(raw, escaped)?;
            self.expect_colon()?;
            let (raw, escaped) = self.read_string()?;
            let value = self.owned(raw, escaped)?;
            out.insert(key, value);
        }
        Ok(())
    }

    /// Decodes the escape sequences in `data` into the decoder's scratch
    /// buffer.
    ///
    /// The result is overwritten by the next call.
    pub fn unescaped(&mut self, data: &[u8]) -> &[u8] {
        unescape_into(&mut self.scratch.value, data);
        &self.scratch.value
    }

    /// Decodes `true` or `false`.
    ///
    /// # Errors
    ///
    /// Fails on any other token.
    pub fn bool(&mut self) -> Result<bool, DecodeError> {
        self.check()?;
        match self.read_value() {
            b"true" => Ok(true),
            b"false" => Ok(false),
            _ => self.fail(DecodeError::InvalidBool),
        }
    }

    /// Decodes `1` or `0` as a boolean.
    ///
    /// # Errors
    ///
    /// Fails on any other token.
    pub fn int_bool(&mut self) -> Result<bool, DecodeError> {
        self.check()?;
        match self.read_value() {
            b"1" => Ok(true),
            b"0" => Ok(false),
            _ => self.fail(DecodeError::InvalidBool),
        }
    }

    /// Decodes a signed 64-bit integer.
    ///
    /// # Errors
    ///
    /// Fails on a missing token or one that is not a base-10 `i64`.
    pub fn i64(&mut self) -> Result<i64, DecodeError> {
        self.check()?;
        self.read_i64()
    }

    /// Decodes an unsigned 64-bit integer.
    ///
    /// # Errors
    ///
    /// Fails on a missing token, a leading sign, or a token that is not a
    /// base-10 `u64`.
    pub fn u64(&mut self) -> Result<u64, DecodeError> {
        self.check()?;
        self.read_u64()
    }

    /// Decodes a 64-bit float.
    ///
    /// # Errors
    ///
    /// Fails on a missing token or one that is not a float.
    pub fn f64(&mut self) -> Result<f64, DecodeError> {
        self.check()?;
        let token = self.read_value();
        if token.is_empty() {
            return self.fail(DecodeError::NoInput("float"));
        }
        self.parse(token)
    }

    /// Decodes a `"YYYYMMDDHHMMSS[.fff]Z"` timestamp.
    ///
    /// # Errors
    ///
    /// Fails if the value is not a string, contains escapes, or does not
    /// match the layout.
    pub fn timestamp(&mut self) -> Result<DateTime<Utc>, DecodeError> {
        self.check()?;
        let (raw, escaped) = self.read_string()?;
        match timestamp::parse(raw) {
            Some(t) if !escaped => Ok(t),
            _ => self.fail(DecodeError::InvalidTimestamp),
        }
    }

    /// Skips whitespace and returns the next byte, consuming it.
    fn next_token(&mut self) -> Option<u8> {
        while let Some(&b) = self.buf.get(self.ptr) {
            self.ptr += 1;
            if !matches!(b, b' ' | b'\n' | b'\r' | b'\t') {
                return Some(b);
            }
        }
        None
    }

    fn open(&mut self, delimiter: u8) -> Result<(), DecodeError> {
        if self.next_token() == Some(delimiter) {
            Ok(())
        } else {
            self.fail(DecodeError::MissingStartDelimiter(char::from(delimiter)))
        }
    }

    fn expect_colon(&mut self) -> Result<(), DecodeError> {
        if self.next_token() == Some(b':') {
            Ok(())
        } else {
            self.fail(DecodeError::MissingKeyDelimiter)
        }
    }

    /// Positions the cursor on the next element of a container, or past
    /// `close` when there is none. Returns whether an element follows.
    fn next_element(&mut self, close: u8, first: &mut bool) -> Result<bool, DecodeError> {
        match self.next_token() {
            Some(b) if b == close => Ok(false),
            None => self.fail(DecodeError::MissingEndDelimiter(char::from(close))),
            Some(_) if *first => {
                *first = false;
                self.ptr -= 1;
                Ok(true)
            }
            Some(b',') => Ok(true),
            Some(_) => self.fail(DecodeError::MissingFieldSeparator),
        }
    }

    /// Scans an unquoted token up to the next delimiter or whitespace.
    fn read_value(&mut self) -> &'a [u8] {
        if self.next_token().is_some() {
            self.ptr -= 1;
        }
        let buf = self.buf;
        let start = self.ptr;
        while let Some(&b) = buf.get(self.ptr) {
            if matches!(b, b',' | b'}' | b']' | b' ' | b'\n' | b'\r' | b'\t') {
                break;
            }
            self.ptr += 1;
        }
        &buf[start..self.ptr]
    }

    /// Scans a quoted string, returning its contents and whether it holds any
    /// backslash escape. The escaped byte is skipped, not interpreted.
    fn read_string(&mut self) -> Result<(&'a [u8], bool), DecodeError> {
        if self.next_token() != Some(b'"') {
            return self.fail(DecodeError::MissingStringDelimiter);
        }
        let buf = self.buf;
        let start = self.ptr;
        let mut escaped = false;
        while let Some(&b) = buf.get(self.ptr) {
            self.ptr += 1;
            match b {
                b'"' => return Ok((&buf[start..self.ptr - 1], escaped)),
                b'\\' => {
                    self.ptr = (self.ptr + 1).min(buf.len());
                    escaped = true;
                }
                _ => {}
            }
        }
        self.fail(DecodeError::IncompleteString)
    }

    pub(crate) fn read_i64(&mut self) -> Result<i64, DecodeError> {
        match self.read_value() {
            [] => self.fail(DecodeError::NoInput("integer")),
            &[d @ b'0'..=b'9'] => Ok(i64::from(d - b'0')),
            token => self.parse(token),
        }
    }

    pub(crate) fn read_u64(&mut self) -> Result<u64, DecodeError> {
        match self.read_value() {
            [] => self.fail(DecodeError::NoInput("unsigned integer")),
            &[d @ b'0'..=b'9'] => Ok(u64::from(d - b'0')),
            [b'+', ..] => self.fail(DecodeError::UnexpectedSign),
            token => self.parse(token),
        }
    }

    fn parse<T>(&mut self, token: &[u8]) -> Result<T, DecodeError>
    where
        T: FromStr,
        DecodeError: From<T::Err>,
    {
        let Ok(s) = token.to_str() else {
            return self.fail(DecodeError::InvalidUtf8("number"));
        };
        match s.parse() {
            Ok(v) => Ok(v),
            Err(err) => self.fail(DecodeError::from(err)),
        }
    }

    fn narrow<W, T: TryFrom<W>>(&mut self, v: W, ty: &'static str) -> Result<T, DecodeError> {
        T::try_from(v).or_else(|_| self.fail(DecodeError::OutOfRange(ty)))
    }

    fn owned(&mut self, raw: &[u8], escaped: bool) -> Result<String, DecodeError> {
        let bytes = if escaped { self.unescaped(raw) } else { raw };
        let owned = bytes.to_str().map(str::to_owned);
        owned.or_else(|_| self.fail(DecodeError::InvalidUtf8("string")))
    }

    fn check(&self) -> Result<(), DecodeError> {
        match &self.err {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Records `err` unless an earlier error is already stored, and returns
    /// the stored one.
    fn fail<T>(&mut self, err: DecodeError) -> Result<T, DecodeError> {
        if let Some(stored) = &self.err {
            return Err(stored.clone());
        }
        trace!(offset = self.ptr, error = %err, "decode failed");
        self.err = Some(err.clone());
        Err(err)
    }
}

macro_rules! narrow_readers {
    ($($(#[$note:meta])* $name:ident: $ty:ty => $wide:ident;)*) => {$(
        #[doc = concat!("Decodes a `", stringify!($ty), "`.")]
        $(#[$note])*
        ///
        /// # Errors
        ///
        /// Fails on a missing or malformed token, and on a value outside the
        /// type's range.
        pub fn $name(&mut self) -> Result<$ty, DecodeError> {
            self.check()?;
            let v = self.$wide()?;
            self.narrow(v, stringify!($ty))
        }
    )*};
}

impl Decoder<'_> {
    narrow_readers! {
        i8: i8 => read_i64;
        i16: i16 => read_i64;
        i32: i32 => read_i64;
        isize: isize => read_i64;
        u8: u8 => read_u64;
        u16: u16 => read_u64;
        ///
        /// Read as an unsigned integer like `u8` and `u16`, so a leading `-`
        /// is an integer error rather than a range error.
        u32: u32 => read_u64;
        usize: usize => read_u64;
    }
}

impl Drop for Decoder<'_> {
    fn drop(&mut self) {
        pool::give_decoder_scratch(mem::take(&mut self.scratch));
    }
}

/// Decodes escapes from `data` into `out`, growing it by size class.
fn unescape_into(out: &mut Vec<u8>, data: &[u8]) {
    out.clear();
    if data.len() > out.capacity() {
        out.reserve_exact(fix_buffer_size(data.len()));
    } else if out.capacity() == 0 {
        out.reserve_exact(DEFAULT_SCRATCH_CAPACITY);
    }

    let mut escape = false;
    for &b in data {
        if escape {
            out.push(match b {
                b'b' => 0x08,
                b'f' => 0x0c,
                b'n' => b'\n',
                b'r' => b'\r',
                b't' => b'\t',
                other => other,
            });
            escape = false;
        } else if b == b'\\' {
            escape = true;
        } else {
            out.push(b);
        }
    }
}
