//! Built-in validators.
//!
//! Every validator except [`Required`] lets a null value through, so that an
//! optional parameter can still carry constraints for when it is supplied.

use argus_core::{Arguments, Value};
use regex::Regex;
use std::sync::OnceLock;

use crate::validator::{message_override, Template, Validator};

/// Fails if the value is absent, null, `""`, `[]` or `{}`.
#[derive(Debug, Clone)]
pub struct Required {
    message: Template,
}

impl Default for Required {
    fn default() -> Self {
        Self {
            message: "The {key} field is required.".into(),
        }
    }
}

impl Required {
    /// Creates the validator with its default message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Validator for Required {
    fn code(&self) -> &str {
        "required"
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn is_valid(&self, value: &Value, _arguments: &Arguments) -> bool {
        !value.is_empty()
    }
}

/// Fails unless the value's text form is one of the allowed literals.
///
/// For lists, every element must be allowed.
#[derive(Debug, Clone)]
pub struct In {
    choices: Vec<String>,
    message: Template,
}

impl In {
    /// Creates the validator for `choices`.
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
            message: "The {key} must be one of: {values}.".into(),
        }
    }

    fn contains(&self, value: &Value) -> bool {
        let text = value.to_string();
        self.choices.iter().any(|c| *c == text)
    }
}

impl Validator for In {
    fn code(&self) -> &str {
        "in"
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn is_valid(&self, value: &Value, _arguments: &Arguments) -> bool {
        match value {
            Value::Null => true,
            Value::List(items) => items.iter().all(|item| self.contains(item)),
            other => self.contains(other),
        }
    }

    fn placeholders(&self) -> Vec<(&'static str, String)> {
        vec![("values", self.choices.join(", "))]
    }
}

/// Fails if the value's text form is one of the forbidden literals.
#[derive(Debug, Clone)]
pub struct NotIn {
    choices: Vec<String>,
    message: Template,
}

impl NotIn {
    /// Creates the validator for `choices`.
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
            message: "The {key} must not be one of: {values}.".into(),
        }
    }

    fn contains(&self, value: &Value) -> bool {
        let text = value.to_string();
        self.choices.iter().any(|c| *c == text)
    }
}

impl Validator for NotIn {
    fn code(&self) -> &str {
        "not_in"
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn is_valid(&self, value: &Value, _arguments: &Arguments) -> bool {
        match value {
            Value::Null => true,
            Value::List(items) => !items.iter().any(|item| self.contains(item)),
            other => !self.contains(other),
        }
    }

    fn placeholders(&self) -> Vec<(&'static str, String)> {
        vec![("values", self.choices.join(", "))]
    }
}

/// Measures a value for size comparisons.
///
/// Numbers compare by value, strings by character count, lists and maps by
/// element count, files by byte length.
fn size_of(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        Value::Str(s) => Some(s.chars().count() as f64),
        Value::List(items) => Some(items.len() as f64),
        Value::Map(map) => Some(map.len() as f64),
        Value::File(file) => Some(file.len() as f64),
        _ => None,
    }
}

/// Lower bound on a value's size.
#[derive(Debug, Clone)]
pub struct Min {
    min: f64,
    message: Template,
}

impl Min {
    /// Creates the validator with lower bound `min`.
    #[must_use]
    pub fn new(min: f64) -> Self {
        Self {
            min,
            message: "The {key} must be at least {min}.".into(),
        }
    }
}

impl Validator for Min {
    fn code(&self) -> &str {
        "min"
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn is_valid(&self, value: &Value, _arguments: &Arguments) -> bool {
        value.is_null() || size_of(value).is_some_and(|size| size >= self.min)
    }

    fn placeholders(&self) -> Vec<(&'static str, String)> {
        vec![("min", self.min.to_string())]
    }
}

/// Upper bound on a value's size.
#[derive(Debug, Clone)]
pub struct Max {
    max: f64,
    message: Template,
}

impl Max {
    /// Creates the validator with upper bound `max`.
    #[must_use]
    pub fn new(max: f64) -> Self {
        Self {
            max,
            message: "The {key} may not be greater than {max}.".into(),
        }
    }
}

impl Validator for Max {
    fn code(&self) -> &str {
        "max"
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn is_valid(&self, value: &Value, _arguments: &Arguments) -> bool {
        value.is_null() || size_of(value).is_some_and(|size| size <= self.max)
    }

    fn placeholders(&self) -> Vec<(&'static str, String)> {
        vec![("max", self.max.to_string())]
    }
}

/// Inclusive range on a value's size.
#[derive(Debug, Clone)]
pub struct Between {
    min: f64,
    max: f64,
    message: Template,
}

impl Between {
    /// Creates the validator for `min..=max`.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            message: "The {key} must be between {min} and {max}.".into(),
        }
    }
}

impl Validator for Between {
    fn code(&self) -> &str {
        "between"
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn is_valid(&self, value: &Value, _arguments: &Arguments) -> bool {
        value.is_null()
            || size_of(value).is_some_and(|size| (self.min..=self.max).contains(&size))
    }

    fn placeholders(&self) -> Vec<(&'static str, String)> {
        vec![("min", self.min.to_string()), ("max", self.max.to_string())]
    }
}

/// Length bounds on the text form of a value (or element count of a list).
#[derive(Debug, Clone)]
pub struct Length {
    min: usize,
    max: usize,
    message: Template,
}

impl Length {
    /// Requires exactly `len` characters.
    #[must_use]
    pub fn exact(len: usize) -> Self {
        Self {
            min: len,
            max: len,
            message: "The {key} must be {min} characters long.".into(),
        }
    }

    /// Requires between `min` and `max` characters.
    #[must_use]
    pub fn range(min: usize, max: usize) -> Self {
        Self {
            min,
            max,
            message: "The {key} must be between {min} and {max} characters long.".into(),
        }
    }
}

impl Validator for Length {
    fn code(&self) -> &str {
        "length"
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn is_valid(&self, value: &Value, _arguments: &Arguments) -> bool {
        let len = match value {
            Value::Null => return true,
            Value::List(items) => items.len(),
            other => other.to_string().chars().count(),
        };
        (self.min..=self.max).contains(&len)
    }

    fn placeholders(&self) -> Vec<(&'static str, String)> {
        vec![("min", self.min.to_string()), ("max", self.max.to_string())]
    }
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid"))
}

/// Checks that a string looks like an email address.
#[derive(Debug, Clone)]
pub struct Email {
    message: Template,
}

impl Default for Email {
    fn default() -> Self {
        Self {
            message: "The {key} must be a valid email address.".into(),
        }
    }
}

impl Email {
    /// Creates the validator with its default message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Validator for Email {
    fn code(&self) -> &str {
        "email"
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn is_valid(&self, value: &Value, _arguments: &Arguments) -> bool {
        match value {
            Value::Null => true,
            Value::Str(s) => email_regex().is_match(s),
            _ => false,
        }
    }
}

/// Requires the value to equal another argument.
#[derive(Debug, Clone)]
pub struct Same {
    other: String,
    message: Template,
}

impl Same {
    /// Compares against the argument stored under `other`.
    #[must_use]
    pub fn new(other: impl Into<String>) -> Self {
        Self {
            other: other.into(),
            message: "The {key} and {other} must match.".into(),
        }
    }
}

impl Validator for Same {
    fn code(&self) -> &str {
        "same"
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn is_valid(&self, value: &Value, arguments: &Arguments) -> bool {
        value.is_null() || arguments.get(&self.other) == Some(value)
    }

    fn placeholders(&self) -> Vec<(&'static str, String)> {
        vec![("other", self.other.clone())]
    }
}

/// Requires the value to differ from another argument.
#[derive(Debug, Clone)]
pub struct Different {
    other: String,
    message: Template,
}

impl Different {
    /// Compares against the argument stored under `other`.
    #[must_use]
    pub fn new(other: impl Into<String>) -> Self {
        Self {
            other: other.into(),
            message: "The {key} and {other} must be different.".into(),
        }
    }
}

impl Validator for Different {
    fn code(&self) -> &str {
        "different"
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn is_valid(&self, value: &Value, arguments: &Arguments) -> bool {
        value.is_null() || arguments.get(&self.other) != Some(value)
    }

    fn placeholders(&self) -> Vec<(&'static str, String)> {
        vec![("other", self.other.clone())]
    }
}

message_override!(Required, In, NotIn, Min, Max, Between, Length, Email, Same, Different);

#[cfg(test)]
mod tests {
    use super::*;

    fn args<const N: usize>(pairs: [(&str, Value); N]) -> Arguments {
        pairs.into_iter().collect()
    }

    #[test]
    fn test_required() {
        let v = Required::new();
        let empty = Arguments::new();

        assert!(v.validate("a", &empty, "a").is_err());
        assert!(v.validate("a", &args([("a", Value::Null)]), "a").is_err());
        assert!(v.validate("a", &args([("a", "".into())]), "a").is_err());
        assert!(v.validate("a", &args([("a", Value::List(vec![]))]), "a").is_err());
        assert!(v.validate("a", &args([("a", "x".into())]), "a").is_ok());
        assert!(v.validate("a", &args([("a", Value::Int(0))]), "a").is_ok());
        assert!(v.validate("a", &args([("a", Value::Bool(false))]), "a").is_ok());
    }

    #[test]
    fn test_required_message_uses_verbose_name() {
        let err = Required::new()
            .validate("b", &Arguments::new(), "Batch size")
            .unwrap_err();
        assert_eq!(err.message(), "The Batch size field is required.");
        assert_eq!(err.code(), "required");
    }

    #[test]
    fn test_in() {
        let v = In::new(["a", "b"]);

        assert!(v.validate("x", &args([("x", "a".into())]), "x").is_ok());
        assert!(v.validate("x", &args([("x", "c".into())]), "x").is_err());
        assert!(v.validate("x", &args([("x", Value::Null)]), "x").is_ok());
        assert!(v
            .validate("x", &args([("x", Value::list(["a", "b"]))]), "x")
            .is_ok());
        assert!(v
            .validate("x", &args([("x", Value::list(["a", "z"]))]), "x")
            .is_err());
    }

    #[test]
    fn test_in_matches_numbers_by_text() {
        let v = In::new(["1", "2"]);
        assert!(v.validate("n", &args([("n", Value::Int(2))]), "n").is_ok());
        assert!(v.validate("n", &args([("n", Value::Int(3))]), "n").is_err());
    }

    #[test]
    fn test_in_message_lists_values() {
        let err = In::new(["a", "b"])
            .validate("x", &args([("x", "c".into())]), "Mode")
            .unwrap_err();
        assert_eq!(err.message(), "The Mode must be one of: a, b.");
    }

    #[test]
    fn test_not_in() {
        let v = NotIn::new(["root"]);
        assert!(v.validate("u", &args([("u", "root".into())]), "u").is_err());
        assert!(v.validate("u", &args([("u", "alice".into())]), "u").is_ok());
    }

    #[test]
    fn test_min_max_between_sizes() {
        let a = Arguments::new();
        assert!(Min::new(3.0).is_valid(&Value::Int(3), &a));
        assert!(!Min::new(3.0).is_valid(&Value::Int(2), &a));
        assert!(Min::new(3.0).is_valid(&Value::from("abc"), &a));
        assert!(!Max::new(2.0).is_valid(&Value::list([1, 2, 3]), &a));
        assert!(Max::new(2.5).is_valid(&Value::Float(2.5), &a));
        assert!(Between::new(1.0, 5.0).is_valid(&Value::Int(5), &a));
        assert!(!Between::new(1.0, 5.0).is_valid(&Value::Int(6), &a));
        assert!(!Min::new(1.0).is_valid(&Value::Bool(true), &a));
        assert!(Min::new(1.0).is_valid(&Value::Null, &a));
    }

    #[test]
    fn test_length() {
        let a = Arguments::new();
        assert!(Length::exact(4).is_valid(&Value::from("abcd"), &a));
        assert!(!Length::exact(4).is_valid(&Value::from("abc"), &a));
        assert!(Length::range(1, 3).is_valid(&Value::Int(123), &a));
        assert!(Length::range(1, 2).is_valid(&Value::list([1, 2]), &a));
    }

    #[test]
    fn test_email() {
        let a = Arguments::new();
        assert!(Email::new().is_valid(&Value::from("a@b.io"), &a));
        assert!(!Email::new().is_valid(&Value::from("a@b"), &a));
        assert!(!Email::new().is_valid(&Value::from("a b@c.io"), &a));
    }

    #[test]
    fn test_same_and_different_cross_field() {
        let map = args([("password", "s3cret".into()), ("confirm", "s3cret".into())]);
        assert!(Same::new("password").validate("confirm", &map, "confirm").is_ok());
        assert!(Different::new("password")
            .validate("confirm", &map, "confirm")
            .is_err());

        let map = args([("password", "s3cret".into()), ("confirm", "other".into())]);
        let err = Same::new("password")
            .validate("confirm", &map, "Confirmation")
            .unwrap_err();
        assert_eq!(err.message(), "The Confirmation and password must match.");
    }
}
