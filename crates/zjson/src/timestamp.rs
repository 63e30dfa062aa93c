//! Compact UTC timestamps: `YYYYMMDDHHMMSS[.fff]Z`.
//!
//! Milliseconds are truncated, trailing zeros are trimmed, and the fraction is
//! omitted entirely for whole seconds, so `2000-01-01T00:00:00.500Z` encodes
//! as `20000101000000.5Z`. Parsing accepts any number of fraction digits;
//! digits past nanosecond precision are ignored.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};

/// Seconds from the Unix epoch to 1900-01-01T00:00:00Z.
const THRESHOLD_SECS: i64 = -2_208_988_800;

/// Whether `t` lies strictly after 1900-01-01T00:00:00Z.
pub(crate) fn is_after_threshold(t: &DateTime<Utc>) -> bool {
    (t.timestamp(), t.timestamp_subsec_nanos()) > (THRESHOLD_SECS, 0)
}

/// Appends the compact form of `t` to `buf`, without quotes.
pub(crate) fn append(buf: &mut Vec<u8>, t: &DateTime<Utc>) {
    let year = t.year();
    if year < 0 {
        buf.push(b'-');
    }
    push_padded(buf, year.unsigned_abs(), 4);
    push_padded(buf, t.month(), 2);
    push_padded(buf, t.day(), 2);
    push_padded(buf, t.hour(), 2);
    push_padded(buf, t.minute(), 2);
    push_padded(buf, t.second(), 2);

    // Leap seconds carry nanoseconds >= 1e9.
    let millis = (t.nanosecond() % 1_000_000_000) / 1_000_000;
    if millis > 0 {
        let digits = [
            digit(millis / 100),
            digit(millis / 10 % 10),
            digit(millis % 10),
        ];
        let mut len = digits.len();
        while digits[len - 1] == b'0' {
            len -= 1;
        }
        buf.push(b'.');
        buf.extend_from_slice(&digits[..len]);
    }
    buf.push(b'Z');
}

/// Parses the compact form; `None` if `src` does not match it exactly.
pub(crate) fn parse(src: &[u8]) -> Option<DateTime<Utc>> {
    let (head, rest) = src.split_at_checked(14)?;
    let year = i32::try_from(number(&head[0..4])?).ok()?;
    let month = number(&head[4..6])?;
    let day = number(&head[6..8])?;
    let hour = number(&head[8..10])?;
    let minute = number(&head[10..12])?;
    let second = number(&head[12..14])?;

    let (nanos, rest) = match rest {
        [b'.' | b',', frac @ ..] => fraction(frac)?,
        _ => (0, rest),
    };
    if rest != b"Z" {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_nano_opt(hour, minute, second, nanos)
        .map(|naive| naive.and_utc())
}

fn number(digits: &[u8]) -> Option<u32> {
    digits.iter().try_fold(0u32, |acc, &b| {
        b.is_ascii_digit().then(|| acc * 10 + u32::from(b - b'0'))
    })
}

fn fraction(src: &[u8]) -> Option<(u32, &[u8])> {
    let len = src.iter().take_while(|b| b.is_ascii_digit()).count();
    if len == 0 {
        return None;
    }
    let mut nanos = 0u32;
    for ix in 0..9 {
        let d = src[..len].get(ix).map_or(0, |b| u32::from(b - b'0'));
        nanos = nanos * 10 + d;
    }
    Some((nanos, &src[len..]))
}

fn push_padded(buf: &mut Vec<u8>, value: u32, width: usize) {
    let mut tmp = [b'0'; 10];
    let mut pos = tmp.len();
    let mut v = value;
    loop {
        pos -= 1;
        tmp[pos] = digit(v % 10);
        v /= 10;
        if v == 0 {
            break;
        }
    }
    let start = pos.min(tmp.len() - width);
    buf.extend_from_slice(&tmp[start..]);
}

#[allow(clippy::cast_possible_truncation)]
fn digit(v: u32) -> u8 {
    b'0' + (v % 10) as u8
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use rstest::rstest;

    use super::{append, is_after_threshold, parse};

    fn encode(t: &DateTime<Utc>) -> String {
        let mut buf = Vec::new();
        append(&mut buf, t);
        String::from_utf8(buf).unwrap()
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
            + chrono::Duration::milliseconds(i64::from(ms))
    }

    #[rstest]
    #[case(at(1970, 1, 1, 0, 0, 0, 0), "19700101000000Z")]
    #[case(at(1999, 12, 31, 23, 59, 59, 999), "19991231235959.999Z")]
    #[case(at(2000, 1, 1, 0, 0, 0, 0), "20000101000000Z")]
    #[case(at(2000, 1, 1, 0, 0, 0, 500), "20000101000000.5Z")]
    #[case(at(2021, 6, 7, 8, 9, 10, 120), "20210607080910.12Z")]
    #[case(at(812, 3, 4, 5, 6, 7, 8), "08120304050607.008Z")]
    fn formats(#[case] t: DateTime<Utc>, #[case] expected: &str) {
        assert_eq!(encode(&t), expected);
    }

    #[test]
    fn truncates_sub_millisecond_precision() {
        let t = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::microseconds(1_999);
        assert_eq!(encode(&t), "20000101000000.001Z");
    }

    #[rstest]
    #[case("19700101000000Z", at(1970, 1, 1, 0, 0, 0, 0))]
    #[case("19991231235959.999Z", at(1999, 12, 31, 23, 59, 59, 999))]
    #[case("20000101000000.5Z", at(2000, 1, 1, 0, 0, 0, 500))]
    #[case("20000101000000,25Z", at(2000, 1, 1, 0, 0, 0, 250))]
    fn parses(#[case] src: &str, #[case] expected: DateTime<Utc>) {
        assert_eq!(parse(src.as_bytes()), Some(expected));
    }

    #[test]
    fn parses_nanoseconds_and_ignores_excess_digits() {
        let t = parse(b"20000101000000.1234567891234Z").unwrap();
        assert_eq!(t.timestamp_subsec_nanos(), 123_456_789);
    }

    #[rstest]
    #[case("")]
    #[case("2000010100000Z")]
    #[case("20000101000000")]
    #[case("20000101000000.Z")]
    #[case("20000101000000ZZ")]
    #[case("2000-1-01000000Z")]
    #[case("20001301000000Z")]
    #[case("20000230000000Z")]
    #[case("20000101250000Z")]
    #[case("2000-01-01T00:00:00Z")]
    fn rejects(#[case] src: &str) {
        assert_eq!(parse(src.as_bytes()), None);
    }

    #[test]
    fn threshold_is_exclusive() {
        let threshold = Utc.with_ymd_and_hms(1900, 1, 1, 0, 0, 0).unwrap();
        assert!(!is_after_threshold(&threshold));
        assert!(is_after_threshold(
            &(threshold + chrono::Duration::milliseconds(1))
        ));
        assert!(!is_after_threshold(
            &Utc.with_ymd_and_hms(1899, 12, 31, 23, 59, 59).unwrap()
        ));
        assert!(is_after_threshold(&DateTime::from_timestamp(0, 0).unwrap()));
    }
}
