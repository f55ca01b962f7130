use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

pub const INVALID_PHONE_MESSAGE: &str =
    "Enter a valid BD number (11 digits, e.g. 01730285500 or +8801730285500)";

const COUNTRY_CODE: &str = "880";

/// Canonical local form: 01, an operator digit 3-9, then 8 digits.
static CANONICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^01[3-9]\d{8}$").expect("canonical phone pattern"));

/// Local form typed without the leading zero.
static WITHOUT_ZERO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1[3-9]\d{8}$").expect("short phone pattern"));

/// An 11-digit Bangladeshi mobile number in local format (`01XXXXXXXXX`).
///
/// The only way to obtain one is [`PhoneNumber::normalize`], so every value
/// downstream of the normalizer is already canonical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Accepts `01730285500`, `+8801730285500`, `8801730285500`,
    /// `01730-285500`, `1730285500` and similar free-text variants.
    /// Anything else yields `None`; this never panics.
    pub fn normalize(raw: &str) -> Option<Self> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

        match digits.len() {
            11 if CANONICAL.is_match(&digits) => Some(Self(digits)),
            10 if WITHOUT_ZERO.is_match(&digits) => Some(Self(format!("0{}", digits))),
            13 => digits
                .strip_prefix(COUNTRY_CODE)
                .filter(|rest| WITHOUT_ZERO.is_match(rest))
                .map(|rest| Self(format!("0{}", rest))),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn normalize(raw: &str) -> Option<PhoneNumber> {
    PhoneNumber::normalize(raw)
}

/// Live preview while the operator is still typing: stays quiet for the
/// first few keystrokes, then shows the canonical form once one exists.
pub fn preview(raw: &str) -> Option<PhoneNumber> {
    if raw.chars().count() < 4 {
        return None;
    }
    PhoneNumber::normalize(raw)
}
