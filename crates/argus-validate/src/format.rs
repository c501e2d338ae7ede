//! Regex-backed format validators.
//!
//! Besides being usable in clauses (`"integer"`, `"numeric"`, `"date"`,
//! `"regex: ^[a-z]+$"`), the integer, numeric and date validators pre-check
//! raw strings for the converters before any parsing happens.

use argus_core::{Arguments, Value};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use crate::validator::{message_override, Template, Validator};

fn integer_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-+]?[0-9]+$").expect("integer pattern is valid"))
}

fn numeric_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[-+]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][-+]?[0-9]+)?$").expect("numeric pattern is valid")
    })
}

fn date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})$").expect("date pattern is valid"))
}

/// Parses `YYYY-M-D` (one or two digit month and day) into a calendar date.
///
/// Returns `None` when the text does not match the pattern or names a day
/// that does not exist.
///
/// ```rust
/// use argus_validate::parse_date;
///
/// assert!(parse_date("2021-2-3").is_some());
/// assert!(parse_date("2021-02-30").is_none());
/// assert!(parse_date("21-02-03").is_none());
/// ```
#[must_use]
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let caps = date_regex().captures(text)?;
    let year = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let day = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Validates against a user-supplied regular expression.
///
/// Non-string values other than null fail; null passes.
#[derive(Debug, Clone)]
pub struct RegexValidator {
    regex: Regex,
    message: Template,
}

impl RegexValidator {
    /// Creates a validator for `regex`.
    #[must_use]
    pub fn new(regex: Regex) -> Self {
        Self {
            regex,
            message: "The {key} format is invalid.".into(),
        }
    }

    /// Returns true if `text` matches.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl Validator for RegexValidator {
    fn code(&self) -> &str {
        "regex"
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn is_valid(&self, value: &Value, _arguments: &Arguments) -> bool {
        match value {
            Value::Null => true,
            Value::Str(s) => self.is_match(s),
            _ => false,
        }
    }

    fn placeholders(&self) -> Vec<(&'static str, String)> {
        vec![("pattern", self.regex.as_str().to_string())]
    }
}

/// Checks that a value is an integer or an integer-formatted string.
#[derive(Debug, Clone)]
pub struct IntegerValidator {
    message: Template,
}

impl Default for IntegerValidator {
    fn default() -> Self {
        Self {
            message: "The {key} must be an integer.".into(),
        }
    }
}

impl IntegerValidator {
    /// Creates the validator with its default message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `text` is a well-formed integer.
    #[must_use]
    pub fn is_valid_str(&self, text: &str) -> bool {
        integer_regex().is_match(text)
    }
}

impl Validator for IntegerValidator {
    fn code(&self) -> &str {
        "integer"
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn is_valid(&self, value: &Value, _arguments: &Arguments) -> bool {
        match value {
            Value::Null | Value::Int(_) => true,
            Value::Str(s) => self.is_valid_str(s),
            _ => false,
        }
    }
}

/// Checks that a value is numeric, in decimal or exponential notation.
#[derive(Debug, Clone)]
pub struct NumericValidator {
    message: Template,
}

impl Default for NumericValidator {
    fn default() -> Self {
        Self {
            message: "The {key} must be a number.".into(),
        }
    }
}

impl NumericValidator {
    /// Creates the validator with its default message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `text` is a well-formed number.
    #[must_use]
    pub fn is_valid_str(&self, text: &str) -> bool {
        numeric_regex().is_match(text)
    }
}

impl Validator for NumericValidator {
    fn code(&self) -> &str {
        "numeric"
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn is_valid(&self, value: &Value, _arguments: &Arguments) -> bool {
        match value {
            Value::Null | Value::Int(_) | Value::Float(_) => true,
            Value::Str(s) => self.is_valid_str(s),
            _ => false,
        }
    }
}

/// Checks that a value is a real calendar date written as `YYYY-M-D`.
#[derive(Debug, Clone)]
pub struct DateValidator {
    message: Template,
}

impl Default for DateValidator {
    fn default() -> Self {
        Self {
            message: "The {key} must be a yyyy-MM-dd or yyyy-M-d.".into(),
        }
    }
}

impl DateValidator {
    /// Creates the validator with its default message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `text` matches the pattern and names an existing day.
    #[must_use]
    pub fn is_valid_str(&self, text: &str) -> bool {
        parse_date(text).is_some()
    }
}

impl Validator for DateValidator {
    fn code(&self) -> &str {
        "date"
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn is_valid(&self, value: &Value, _arguments: &Arguments) -> bool {
        match value {
            Value::Null | Value::Date(_) => true,
            Value::Str(s) => self.is_valid_str(s),
            _ => false,
        }
    }
}

message_override!(RegexValidator, IntegerValidator, NumericValidator, DateValidator);
