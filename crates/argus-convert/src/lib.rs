//! # Argus Convert
//!
//! Type converters for the Argus parameter pipeline.
//!
//! A parameter names its target type with an alias (`kind = "int"`); the
//! [`ConverterRegistry`] resolves the alias to a [`Converter`] that turns the
//! raw looked-up [`Value`](argus_core::Value) into a typed one.
//!
//! | Converter | Aliases | Result |
//! |-----------|---------|--------|
//! | [`StringConverter`] | `string`, `str` | text (fallback for unknown aliases) |
//! | [`IntegerConverter`] | `integer`, `int` | `Value::Int` |
//! | [`FloatConverter`] | `float` | `Value::Float` |
//! | [`BooleanConverter`] | `boolean`, `bool` | `Value::Bool` |
//! | [`FileConverter`] | `file` | unchanged |
//! | [`DateConverter`] | `date` | `Value::Date` |
//!
//! Registration is explicit: [`ConverterRegistry::with_builtins`] installs
//! the table above, and custom converters are added with
//! [`ConverterRegistry::install`] or [`ConverterRegistry::register`].

#![doc(html_root_url = "https://docs.rs/argus-convert/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod converter;
mod registry;

pub use converter::{
    BooleanConverter, Converter, DateConverter, FileConverter, FloatConverter, IntegerConverter,
    StringConverter,
};
pub use registry::{ConverterRegistry, SharedConverter};

#[cfg(test)]
mod proptests {
    use super::*;
    use argus_core::Value;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn boolean_false_only_for_false_set(s in "\\PC{0,8}") {
            let expected = !matches!(s.as_str(), "false" | "False" | "0");
            prop_assert_eq!(BooleanConverter::truth(&Value::from(s)), expected);
        }

        #[test]
        fn boolean_integers_false_only_for_zero(i in any::<i64>()) {
            prop_assert_eq!(BooleanConverter::truth(&Value::Int(i)), i != 0);
        }

        #[test]
        fn integer_converter_accepts_any_i64_string(i in any::<i64>()) {
            let converted = IntegerConverter::default().convert("n", i.to_string().into());
            prop_assert_eq!(converted.ok(), Some(Value::Int(i)));
        }
    }
}
