//! # Argus Validate
//!
//! Validator framework for the Argus parameter pipeline.
//!
//! Validators are configured predicates over the converted argument map.
//! Parameters declare them either as instances or as a compact clause
//! string resolved through the [`ValidatorRegistry`]:
//!
//! ```text
//! required|in: draft, published|length: 1, 64
//! ```
//!
//! ## Built-in validators
//!
//! | Name | Arguments | Passes when |
//! |------|-----------|-------------|
//! | `required` | - | value is present and non-empty |
//! | `in` | `a, b, ...` | value (or every list element) is one of the choices |
//! | `not_in` | `a, b, ...` | value is none of the choices |
//! | `min` / `max` | `n` | size is within the bound |
//! | `between` | `min, max` | size is within both bounds |
//! | `length` | `n` or `min, max` | text or list length matches |
//! | `regex` | `pattern` | text matches the pattern |
//! | `email` | - | text looks like an address |
//! | `same` / `different` | `other` | value equals / differs from another argument |
//! | `integer` / `numeric` / `date` | - | text is well-formed for the type |
//!
//! Absent values pass every validator except `required`.
//!
//! ## Example
//!
//! ```rust
//! use argus_core::Arguments;
//! use argus_validate::ValidatorRegistry;
//!
//! let validators = ValidatorRegistry::global().get_validators("required|in: a, b");
//! let args: Arguments = [("status", "c")].into_iter().collect();
//!
//! let failure = validators
//!     .iter()
//!     .find_map(|v| v.validate("status", &args, "Status").err())
//!     .unwrap();
//! assert_eq!(failure.code(), "in");
//! assert_eq!(failure.message(), "The Status must be one of: a, b.");
//! ```

#![doc(html_root_url = "https://docs.rs/argus-validate/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod builtin;
mod format;
mod registry;
mod validator;

pub use builtin::{Between, Different, Email, In, Length, Max, Min, NotIn, Required, Same};
pub use format::{parse_date, DateValidator, IntegerValidator, NumericValidator, RegexValidator};
pub use registry::{
    Clause, SharedValidator, SpecError, ValidatorFactory, ValidatorRegistry, ValidatorSpec,
    ARGUMENT_MARKER, CLAUSE_DELIMITER,
};
pub use validator::{render_message, Validator, KEY_PLACEHOLDER};

#[cfg(test)]
mod proptests {
    use super::*;
    use argus_core::{Arguments, Value};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn integer_strings_always_pass_integer(n in any::<i64>()) {
            prop_assert!(IntegerValidator::new().is_valid_str(&n.to_string()));
        }

        #[test]
        fn between_agrees_with_min_and_max(x in -1000i64..1000, lo in -500i64..0, hi in 0i64..500) {
            let args = Arguments::new();
            let value = Value::Int(x);
            let between = Between::new(lo as f64, hi as f64).is_valid(&value, &args);
            let both = Min::new(lo as f64).is_valid(&value, &args)
                && Max::new(hi as f64).is_valid(&value, &args);
            prop_assert_eq!(between, both);
        }

        #[test]
        fn lenient_parse_never_panics(spec in "[a-z_:, |0-9]{0,40}") {
            let _ = ValidatorRegistry::global().get_validators(&spec);
        }
    }
}
