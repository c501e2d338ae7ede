//! The converter trait and the built-in converters.

use argus_core::{Arguments, ConversionError, Value};
use argus_validate::{parse_date, DateValidator, IntegerValidator, NumericValidator, Validator};
use std::fmt;

/// Turns a raw looked-up value into a typed one.
///
/// Converters are stateless. They receive the parameter's source key only to
/// name it in failures.
///
/// # Example
///
/// ```rust
/// use argus_convert::Converter;
/// use argus_core::{ConversionError, Value};
///
/// #[derive(Debug)]
/// struct Upper;
///
/// impl Converter for Upper {
///     fn convert(&self, _key: &str, raw: Value) -> Result<Value, ConversionError> {
///         Ok(match raw {
///             Value::Str(s) => Value::Str(s.to_uppercase()),
///             other => other,
///         })
///     }
///
///     fn aliases(&self) -> &'static [&'static str] {
///         &["upper"]
///     }
/// }
///
/// assert_eq!(Upper.convert("k", "abc".into()).unwrap(), Value::from("ABC"));
/// ```
pub trait Converter: Send + Sync + fmt::Debug {
    /// Converts `raw`, the value looked up for `key`.
    fn convert(&self, key: &str, raw: Value) -> Result<Value, ConversionError>;

    /// Names this converter is installed under.
    ///
    /// When empty, [`ConverterRegistry::install`](crate::ConverterRegistry::install)
    /// falls back to the type name.
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }
}

/// Runs a format validator over `raw` and turns its failure into a
/// conversion error.
fn precheck(validator: &dyn Validator, key: &str, raw: &Value) -> Result<(), ConversionError> {
    if validator.is_valid(raw, &Arguments::new()) {
        Ok(())
    } else {
        Err(ConversionError::new(
            key,
            validator.failure(key, key).message(),
        ))
    }
}

/// Passes strings through and stringifies everything else except null.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringConverter;

impl Converter for StringConverter {
    fn convert(&self, _key: &str, raw: Value) -> Result<Value, ConversionError> {
        Ok(match raw {
            Value::Null => Value::Null,
            Value::Str(s) => Value::Str(s),
            other => Value::Str(other.to_string()),
        })
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["string", "str"]
    }
}

/// Converts integer-formatted strings to [`Value::Int`].
#[derive(Debug, Clone, Default)]
pub struct IntegerConverter {
    format: IntegerValidator,
}

impl Converter for IntegerConverter {
    fn convert(&self, key: &str, raw: Value) -> Result<Value, ConversionError> {
        match raw {
            Value::Null => Ok(Value::Null),
            Value::Int(i) => Ok(Value::Int(i)),
            Value::Str(ref s) => {
                precheck(&self.format, key, &raw)?;
                s.parse::<i64>()
                    .map(Value::Int)
                    .map_err(|e| ConversionError::new(key, format!("The {key} is out of range: {e}.")))
            }
            other => Err(ConversionError::new(
                key,
                format!("The {key} must be an integer, got {}.", other.type_name()),
            )),
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["integer", "int"]
    }
}

/// Converts numbers and numeric strings to [`Value::Float`].
#[derive(Debug, Clone, Default)]
pub struct FloatConverter {
    format: NumericValidator,
}

impl Converter for FloatConverter {
    fn convert(&self, key: &str, raw: Value) -> Result<Value, ConversionError> {
        match raw {
            Value::Null => Ok(Value::Null),
            Value::Int(i) => Ok(Value::Float(i as f64)),
            Value::Float(f) => Ok(Value::Float(f)),
            Value::Str(ref s) => {
                precheck(&self.format, key, &raw)?;
                s.parse::<f64>()
                    .map(Value::Float)
                    .map_err(|e| ConversionError::new(key, format!("The {key} is not a number: {e}.")))
            }
            other => Err(ConversionError::new(
                key,
                format!("The {key} must be a number, got {}.", other.type_name()),
            )),
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["float"]
    }
}

/// Maps a small set of falsy values to `false` and everything else to `true`.
///
/// The false set is null, `false`, `"false"`, `"False"`, `0` and `"0"`.
/// Note that `""` is true.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanConverter;

impl BooleanConverter {
    /// Returns the truth value of `raw`.
    #[must_use]
    pub fn truth(raw: &Value) -> bool {
        match raw {
            Value::Null | Value::Bool(false) | Value::Int(0) => false,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !matches!(s.as_str(), "false" | "False" | "0"),
            _ => true,
        }
    }
}

impl Converter for BooleanConverter {
    fn convert(&self, _key: &str, raw: Value) -> Result<Value, ConversionError> {
        Ok(Value::Bool(Self::truth(&raw)))
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["boolean", "bool"]
    }
}

/// Passes uploaded files (or anything else) through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileConverter;

impl Converter for FileConverter {
    fn convert(&self, _key: &str, raw: Value) -> Result<Value, ConversionError> {
        Ok(raw)
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["file"]
    }
}

/// Converts `YYYY-M-D` strings to [`Value::Date`], rejecting impossible days.
#[derive(Debug, Clone, Default)]
pub struct DateConverter {
    format: DateValidator,
}

impl Converter for DateConverter {
    fn convert(&self, key: &str, raw: Value) -> Result<Value, ConversionError> {
        match raw {
            Value::Null => Ok(Value::Null),
            Value::Date(d) => Ok(Value::Date(d)),
            Value::Str(ref s) => {
                precheck(&self.format, key, &raw)?;
                parse_date(s).map(Value::Date).ok_or_else(|| {
                    ConversionError::new(key, self.format.failure(key, key).message())
                })
            }
            other => Err(ConversionError::new(
                key,
                format!("The {key} must be a date, got {}.", other.type_name()),
            )),
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["date"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_string_converter() {
        let c = StringConverter;
        assert_eq!(c.convert("a", Value::Null).unwrap(), Value::Null);
        assert_eq!(c.convert("a", "x".into()).unwrap(), Value::from("x"));
        assert_eq!(c.convert("a", Value::Int(12)).unwrap(), Value::from("12"));
        assert_eq!(c.convert("a", Value::Bool(true)).unwrap(), Value::from("true"));
        assert_eq!(c.convert("a", Value::Float(1.0)).unwrap(), Value::from("1.0"));
    }

    #[test]
    fn test_integer_converter() {
        let c = IntegerConverter::default();
        assert_eq!(c.convert("a", "10".into()).unwrap(), Value::Int(10));
        assert_eq!(c.convert("a", "-3".into()).unwrap(), Value::Int(-3));
        assert_eq!(c.convert("a", Value::Int(4)).unwrap(), Value::Int(4));
        assert_eq!(c.convert("a", Value::Null).unwrap(), Value::Null);

        let err = c.convert("a", "abc".into()).unwrap_err();
        assert_eq!(err.key(), "a");
        assert_eq!(err.reason(), "The a must be an integer.");

        assert!(c.convert("a", "1.5".into()).is_err());
        assert!(c.convert("a", Value::Float(1.0)).is_err());
    }

    #[test]
    fn test_integer_converter_rejects_non_ascii_digits() {
        let err = IntegerConverter::default()
            .convert("n", "\u{661}\u{662}".into())
            .unwrap_err();
        assert_eq!(err.reason(), "The n must be an integer.");
    }

    #[test]
    fn test_integer_overflow_fails() {
        let c = IntegerConverter::default();
        assert!(c.convert("a", "99999999999999999999".into()).is_err());
    }

    #[test]
    fn test_float_converter() {
        let c = FloatConverter::default();
        assert_eq!(c.convert("f", "3.1415".into()).unwrap(), Value::Float(3.1415));
        assert_eq!(c.convert("f", "1.1e-1".into()).unwrap(), Value::Float(0.11));
        assert_eq!(c.convert("f", Value::Int(2)).unwrap(), Value::Float(2.0));

        let err = c.convert("f", "abc".into()).unwrap_err();
        assert_eq!(err.reason(), "The f must be a number.");
    }

    #[test]
    fn test_boolean_converter() {
        let c = BooleanConverter;
        for falsy in [
            Value::Null,
            Value::Bool(false),
            "false".into(),
            "False".into(),
            Value::Int(0),
            "0".into(),
            Value::Float(0.0),
        ] {
            assert_eq!(c.convert("b", falsy.clone()).unwrap(), Value::Bool(false), "{falsy:?}");
        }
        for truthy in [
            Value::Bool(true),
            "true".into(),
            "".into(),
            "no".into(),
            "1".into(),
            Value::Int(1),
            Value::Int(2),
            Value::Float(1.0),
        ] {
            assert_eq!(c.convert("b", truthy.clone()).unwrap(), Value::Bool(true), "{truthy:?}");
        }
    }

    #[test]
    fn test_file_converter_is_identity() {
        let file = argus_core::UploadedFile::new(
            Some("avatar".into()),
            Some("me.png".into()),
            Some("image/png".into()),
            bytes::Bytes::from_static(b"png"),
        );
        let raw = Value::File(file);
        assert_eq!(FileConverter.convert("avatar", raw.clone()).unwrap(), raw);
    }

    #[test]
    fn test_date_converter() {
        let c = DateConverter::default();
        assert_eq!(
            c.convert("d", "2021-2-3".into()).unwrap(),
            Value::Date(NaiveDate::from_ymd_opt(2021, 2, 3).unwrap())
        );

        let err = c.convert("d", "2021-02-30".into()).unwrap_err();
        assert_eq!(err.reason(), "The d must be a yyyy-MM-dd or yyyy-M-d.");
        assert!(c.convert("d", "yesterday".into()).is_err());
        assert_eq!(c.convert("d", Value::Null).unwrap(), Value::Null);
    }
}
