//! Float formatting in the `printf`-style `%f`, `%e` and `%g` layouts.
//!
//! Exponents are signed and at least two digits wide (`1e+21`, `1.5e-07`).
//! `%g` picks the exponent form for decimal exponents below -4 or at or above
//! the precision. Non-finite values render as `NaN`, `+Inf` and `-Inf`.
//!
//! Digits come from the standard library's shortest round-trip (or exactly
//! rounded) formatting. For `%g` they are written into the output buffer,
//! laid out after themselves, and drained, so nothing is allocated beyond the
//! output buffer.
#![expect(clippy::cast_possible_truncation)]
#![expect(clippy::cast_possible_wrap)]
#![expect(clippy::cast_sign_loss)]

use core::fmt::{self, Write as _};

/// Float layout, one per `printf` verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatFormat {
    /// `'f'`: `-ddd.dddd`, never an exponent.
    Decimal,
    /// `'e'`: `-d.dddde±dd`.
    Exponent,
    /// `'g'`: [`Exponent`](Self::Exponent) for large or small exponents,
    /// [`Decimal`](Self::Decimal) otherwise.
    General,
}

/// Digits after the point, in either layout, past which every finite `f64`
/// has only zeros. Also keeps precisions within what `fmt` accepts.
const MAX_EXACT_DIGITS: usize = 1100;

struct Sink<'a>(&'a mut Vec<u8>);

impl fmt::Write for Sink<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

/// Appends `v` to `buf`.
///
/// `precision` is the number of digits after the decimal point for
/// [`FloatFormat::Decimal`] and [`FloatFormat::Exponent`], and the number of
/// significant digits for [`FloatFormat::General`]. `None` selects the
/// fewest digits that round-trip.
pub(crate) fn append(buf: &mut Vec<u8>, v: f64, format: FloatFormat, precision: Option<usize>) {
    if v.is_nan() {
        buf.extend_from_slice(b"NaN");
        return;
    }
    if v.is_infinite() {
        buf.extend_from_slice(if v > 0.0 { b"+Inf" } else { b"-Inf" });
        return;
    }
    if v.is_sign_negative() {
        buf.push(b'-');
    }
    let v = v.abs();
    match format {
        FloatFormat::Decimal => match precision {
            None => {
                let _ = write!(Sink(buf), "{v}");
            }
            Some(p) => {
                let shown = p.min(MAX_EXACT_DIGITS);
                let _ = write!(Sink(buf), "{v:.shown$}");
                push_zeros(buf, p - shown);
            }
        },
        FloatFormat::Exponent => {
            let start = buf.len();
            let shown = precision.map(|p| p.min(MAX_EXACT_DIGITS));
            let _ = match shown {
                None => write!(Sink(buf), "{v:e}"),
                Some(p) => write!(Sink(buf), "{v:.p$e}"),
            };
            if let Some((pos, exp)) = split_exponent(buf, start) {
                buf.truncate(pos);
                push_zeros(buf, precision.unwrap_or(0) - shown.unwrap_or(0));
                push_exponent(buf, exp);
            }
        }
        FloatFormat::General => general(buf, v, precision),
    }
}

/// Finds the `e` written by `{:e}` after `start` and parses the exponent.
fn split_exponent(buf: &[u8], start: usize) -> Option<(usize, i64)> {
    let pos = start + buf[start..].iter().rposition(|&b| b == b'e')?;
    let (neg, digits) = match &buf[pos + 1..] {
        [b'-', rest @ ..] => (true, rest),
        rest => (false, rest),
    };
    let exp = digits
        .iter()
        .fold(0i64, |acc, &b| acc * 10 + i64::from(b - b'0'));
    Some((pos, if neg { -exp } else { exp }))
}

fn general(buf: &mut Vec<u8>, v: f64, precision: Option<usize>) {
    let start = buf.len();
    let mut sink = Sink(buf);
    let _ = match precision {
        None => write!(sink, "{v:e}"),
        Some(p) => write!(sink, "{v:.prec$e}", prec = p.clamp(1, MAX_EXACT_DIGITS) - 1),
    };
    let Some((pos, exp)) = split_exponent(buf, start) else {
        return;
    };

    // Keep only the mantissa digits, without the point or trailing zeros.
    buf.truncate(pos);
    if let Some(dot) = buf[start..].iter().position(|&b| b == b'.') {
        buf.remove(start + dot);
    }
    while buf.len() > start && buf[buf.len() - 1] == b'0' {
        buf.pop();
    }
    let nd = buf.len() - start;
    let digits = Digits {
        start,
        nd,
        dp: if nd == 0 { 0 } else { exp + 1 },
    };

    let nd = nd as i64;
    let mut prec = match precision {
        None => nd,
        Some(p) => i64::try_from(p.max(1)).unwrap_or(i64::MAX),
    };
    let mut eprec = prec;
    if eprec > nd && nd >= digits.dp {
        eprec = nd;
    }
    if precision.is_none() {
        eprec = 6;
    }
    let x = digits.dp - 1;
    if x < -4 || x >= eprec {
        if prec > nd {
            prec = nd;
        }
        digits.exponent(buf, (prec - 1).max(0) as usize);
    } else {
        if prec > digits.dp {
            prec = nd;
        }
        digits.decimal(buf, (prec - digits.dp).max(0) as usize);
    }
    buf.drain(start..start + digits.nd);
}

/// Decimal digits parked at `buf[start..start + nd]`; the value is
/// `0.d1d2...dn * 10^dp`.
struct Digits {
    start: usize,
    nd: usize,
    dp: i64,
}

impl Digits {
    fn get(&self, buf: &[u8], i: i64) -> u8 {
        if i >= 0 && (i as usize) < self.nd {
            buf[self.start + i as usize]
        } else {
            b'0'
        }
    }

    fn exponent(&self, buf: &mut Vec<u8>, prec: usize) {
        let first = self.get(buf, 0);
        buf.push(first);
        if prec > 0 {
            buf.push(b'.');
            for i in 1..=prec {
                let d = self.get(buf, i as i64);
                buf.push(d);
            }
        }
        push_exponent(buf, if self.nd == 0 { 0 } else { self.dp - 1 });
    }

    fn decimal(&self, buf: &mut Vec<u8>, prec: usize) {
        if self.dp > 0 {
            for i in 0..self.dp {
                let d = self.get(buf, i);
                buf.push(d);
            }
        } else {
            buf.push(b'0');
        }
        if prec > 0 {
            buf.push(b'.');
            for i in 1..=prec {
                let d = self.get(buf, self.dp + i as i64 - 1);
                buf.push(d);
            }
        }
    }
}

fn push_zeros(buf: &mut Vec<u8>, n: usize) {
    buf.resize(buf.len() + n, b'0');
}

fn push_exponent(buf: &mut Vec<u8>, exp: i64) {
    buf.push(b'e');
    buf.push(if exp < 0 { b'-' } else { b'+' });
    let exp = exp.unsigned_abs();
    if exp >= 100 {
        buf.push(b'0' + (exp / 100 % 10) as u8);
    }
    buf.push(b'0' + (exp / 10 % 10) as u8);
    buf.push(b'0' + (exp % 10) as u8);
}
