//! Turns ISO-8601 period tokens (`PT1H37M15S`) into clock strings (`1:37:15`).
//!
//! Days are folded into hours, years and weeks are shown as `Ny `/`Nw `
//! prefixes, months are accepted but never rendered.

use crate::error::{FeedError, FeedResult};
use regex::{Captures, Regex};
use std::sync::LazyLock;

// Anchored at both ends on purpose: a prefix match would quietly accept trailing text.
static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^P",
        r"(?:(?P<years>[0-9]+)Y)?",
        r"(?:(?P<months>[0-9]+)M)?",
        r"(?:(?P<weeks>[0-9]+)W)?",
        r"(?:(?P<days>[0-9]+)D)?",
        r"(?:T",
        r"(?:(?P<hours>[0-9]+)H)?",
        r"(?:(?P<minutes>[0-9]+)M)?",
        r"(?:(?P<seconds>[0-9]+)S)?",
        r")?$",
    ))
    .expect("duration pattern is valid")
});

/// Renders `token` as `[Ny ][Nw ]H:MM:SS`, or `MM:SS` when there is nothing
/// above the minute.
pub fn normalize(token: &str) -> FeedResult<String> {
    let caps = DURATION
        .captures(token)
        .ok_or_else(|| FeedError::DurationFormat(token.to_string()))?;

    let mut result = String::new();
    if let Some(years) = caps.name("years") {
        result.push_str(years.as_str());
        result.push_str("y ");
    }
    if let Some(weeks) = caps.name("weeks") {
        result.push_str(weeks.as_str());
        result.push_str("w ");
    }

    let hours = caps.name("hours").map(|m| m.as_str());
    match caps.name("days").map(|m| trim_zeros(m.as_str())) {
        Some(days) if days != "0" => {
            result.push_str(&add_decimal(&mul_decimal(days, 24), hours.unwrap_or("0")));
            result.push(':');
        }
        _ => {
            if let Some(hours) = hours {
                result.push_str(trim_zeros(hours));
                result.push(':');
            }
        }
    }

    result.push_str(&padded(&caps, "minutes"));
    result.push(':');
    result.push_str(&padded(&caps, "seconds"));

    Ok(result)
}

fn trim_zeros(digits: &str) -> &str {
    match digits.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    }
}

/// Component values are unbounded digit strings, so the day carry is
/// computed on decimal digits instead of a fixed-width integer.
fn mul_decimal(digits: &str, factor: u32) -> String {
    let mut out = Vec::with_capacity(digits.len() + 2);
    let mut carry = 0u32;
    for byte in digits.bytes().rev() {
        let value = u32::from(byte - b'0') * factor + carry;
        out.push(b'0' + (value % 10) as u8);
        carry = value / 10;
    }
    while carry > 0 {
        out.push(b'0' + (carry % 10) as u8);
        carry /= 10;
    }
    finish_decimal(out)
}

fn add_decimal(a: &str, b: &str) -> String {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut out = Vec::with_capacity(a.len().max(b.len()) + 1);
    let mut carry = 0u8;
    for i in 0..a.len().max(b.len()) {
        let digit = |s: &[u8]| if i < s.len() { s[s.len() - 1 - i] - b'0' } else { 0 };
        let value = digit(a) + digit(b) + carry;
        out.push(b'0' + value % 10);
        carry = value / 10;
    }
    if carry > 0 {
        out.push(b'0' + carry);
    }
    finish_decimal(out)
}

/// Reverses little-endian ASCII digits and drops leading zeros.
fn finish_decimal(mut reversed: Vec<u8>) -> String {
    reversed.reverse();
    let digits: String = reversed.into_iter().map(char::from).collect();
    trim_zeros(&digits).to_string()
}

/// Digits are kept as given; single digits get a leading zero.
fn padded(caps: &Captures<'_>, name: &str) -> String {
    match caps.name(name) {
        Some(m) => format!("{:0>2}", m.as_str()),
        None => "00".to_string(),
    }
}
