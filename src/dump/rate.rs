//! Allocation rate tokens such as `11mb/s`, `2361kb/s` or `1423b/s`.

use std::sync::LazyLock;

use regex::Regex;

pub const BYTES_PER_KB: f64 = 1024.0;
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Anything above this is an instrumentation glitch, not a real rate.
pub const MAX_RATE_BYTES: f64 = 10_000.0 * BYTES_PER_MB;

static RATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([\d.]+)\s*(mb|kb|b)/s").expect("rate pattern compiles")
});

/// Longest decimal prefix of a run of digits and dots, with an optional
/// leading `-`: `1.2.3` reads as 1.2, `5.` as 5, while `.` and `-` are not
/// numbers.
pub fn leading_decimal(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let digits = |from: usize| {
        from + bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };
    let start = usize::from(bytes.first() == Some(&b'-'));
    let mut end = digits(start);
    let mut seen_digit = end > start;
    if bytes.get(end) == Some(&b'.') {
        let fraction_end = digits(end + 1);
        seen_digit |= fraction_end > end + 1;
        end = fraction_end;
    }
    if !seen_digit {
        return None;
    }
    text[..end].parse().ok()
}

/// Outcome of reading one rate token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateReading {
    BytesPerSec(f64),
    /// No `<decimal><unit>/s` in the token.
    Unparsed,
    /// Parsed, but above [`MAX_RATE_BYTES`]. Holds the rejected value.
    Outlier(f64),
}

impl RateReading {
    pub fn parse(token: &str) -> RateReading {
        let Some(caps) = RATE_RE.captures(token.trim()) else {
            return RateReading::Unparsed;
        };
        let Some(value) = leading_decimal(&caps[1]) else {
            return RateReading::Unparsed;
        };
        let bytes = match caps[2].to_ascii_lowercase().as_str() {
            "mb" => value * BYTES_PER_MB,
            "kb" => value * BYTES_PER_KB,
            _ => value,
        };
        if bytes > MAX_RATE_BYTES {
            RateReading::Outlier(bytes)
        } else {
            RateReading::BytesPerSec(bytes)
        }
    }

    /// Normalized bytes/second; unparsed and outlier readings count as zero.
    pub fn bytes_per_sec(&self) -> f64 {
        match self {
            RateReading::BytesPerSec(bytes) => *bytes,
            RateReading::Unparsed | RateReading::Outlier(_) => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    macro_rules! rate_tests {
        ($($name:ident: $value:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let (token, expected) = $value;
                    let actual = RateReading::parse(token).bytes_per_sec();
                    assert!(
                        (actual - expected).abs() < EPSILON,
                        "{}: expected {}, got {}",
                        token,
                        expected,
                        actual
                    );
                }
            )*
        }
    }

    rate_tests! {
        megabytes: ("11mb/s", 11.0 * 1_048_576.0),
        kilobytes: ("2361kb/s", 2361.0 * 1024.0),
        bytes: ("1423b/s", 1423.0),
        garbage: ("garbage", 0.0),
        upper_case_unit: ("3MB/s", 3.0 * 1_048_576.0),
        mixed_case_unit: ("4Kb/s", 4.0 * 1024.0),
        space_before_unit: ("500 kb/s", 500.0 * 1024.0),
        fractional: ("1.5mb/s", 1.5 * 1_048_576.0),
        zero: ("0b/s", 0.0),
        missing_per_second: ("12mb", 0.0),
        unknown_unit: ("12gb/s", 0.0),
        just_over_limit: ("10001mb/s", 0.0),
        exactly_at_limit: ("10000mb/s", 10_000.0 * 1_048_576.0),
        extra_dot_ends_number: ("1.2.3mb/s", 1.2 * 1_048_576.0),
        trailing_dot: ("5.kb/s", 5.0 * 1024.0),
        leading_dot: (".5kb/s", 512.0),
        dots_only: ("..mb/s", 0.0),
    }

    macro_rules! leading_decimal_tests {
        ($($name:ident: $value:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let (text, expected): (&str, Option<f64>) = $value;
                    assert_eq!(leading_decimal(text), expected, "{}", text);
                }
            )*
        }
    }

    leading_decimal_tests! {
        decimal_whole: ("45.23", Some(45.23)),
        decimal_integer: ("7", Some(7.0)),
        decimal_second_dot: ("1.2.3", Some(1.2)),
        decimal_trailing_dot: ("5.", Some(5.0)),
        decimal_leading_dot: (".25", Some(0.25)),
        decimal_negative: ("-2.00", Some(-2.0)),
        decimal_sign_mid_run: ("1-2", Some(1.0)),
        decimal_dot_alone: (".", None),
        decimal_sign_alone: ("-", None),
        decimal_double_sign: ("--1", None),
        decimal_empty: ("", None),
    }

    #[test]
    fn outlier_keeps_rejected_value() {
        assert_eq!(
            RateReading::parse("20000mb/s"),
            RateReading::Outlier(20_000.0 * BYTES_PER_MB)
        );
        assert_eq!(RateReading::parse("20000mb/s").bytes_per_sec(), 0.0);
    }

    #[test]
    fn unparsed_token() {
        assert_eq!(RateReading::parse("n/a"), RateReading::Unparsed);
    }

    #[test]
    fn converts_back_to_megabytes() {
        for (token, mb) in [
            ("11mb/s", 11.0),
            ("2361kb/s", 2361.0 / 1024.0),
            ("1423b/s", 1423.0 / 1_048_576.0),
        ] {
            let bytes = RateReading::parse(token).bytes_per_sec();
            let delta = (bytes / BYTES_PER_MB - mb).abs();
            assert!(delta < 1e-12, "{}: {} MB/s off by {}", token, mb, delta);
        }
    }
}
