//! Core validator trait.
//!
//! The [`Validator`] trait is the contract every configured check implements.

use argus_core::{Arguments, ValidationFailure, Value};
use std::borrow::Cow;
use std::fmt;

/// Placeholder substituted with the parameter's verbose name.
pub const KEY_PLACEHOLDER: &str = "{key}";

/// A configured predicate over the converted argument map.
///
/// Validators see the whole [`Arguments`] map, not just their own value, so a
/// validator attached to one parameter may compare it with another. They
/// never modify the map.
///
/// # Implementing `Validator`
///
/// ```rust
/// use argus_core::{Arguments, Value};
/// use argus_validate::Validator;
///
/// #[derive(Debug)]
/// struct Even;
///
/// impl Validator for Even {
///     fn code(&self) -> &str {
///         "even"
///     }
///
///     fn message(&self) -> &str {
///         "The {key} must be even."
///     }
///
///     fn is_valid(&self, value: &Value, _arguments: &Arguments) -> bool {
///         value.as_i64().map_or(true, |i| i % 2 == 0)
///     }
/// }
///
/// let args: Arguments = [("n", 3)].into_iter().collect();
/// let err = Even.validate("n", &args, "Number").unwrap_err();
/// assert_eq!(err.message(), "The Number must be even.");
/// ```
pub trait Validator: Send + Sync + fmt::Debug {
    /// Machine-readable code of this validator.
    fn code(&self) -> &str;

    /// Message template; `{key}` is replaced by the verbose name.
    fn message(&self) -> &str;

    /// Checks the value stored under the validated key.
    ///
    /// `value` is [`Value::Null`] when the key is absent.
    fn is_valid(&self, value: &Value, arguments: &Arguments) -> bool;

    /// Extra `{name}` placeholders available to the message template.
    fn placeholders(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Builds the failure for `key`, rendering the message with `verbose_name`.
    fn failure(&self, key: &str, verbose_name: &str) -> ValidationFailure {
        let message = render_message(self.message(), verbose_name, &self.placeholders());
        ValidationFailure::new(self.code(), key, message)
    }

    /// Validates the value under `key` in `arguments`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationFailure`] whose message names `verbose_name`.
    fn validate(
        &self,
        key: &str,
        arguments: &Arguments,
        verbose_name: &str,
    ) -> Result<(), ValidationFailure> {
        let value = arguments.get(key).unwrap_or(&Value::Null);
        if self.is_valid(value, arguments) {
            Ok(())
        } else {
            Err(self.failure(key, verbose_name))
        }
    }
}

/// Renders a message template.
///
/// `{key}` becomes `verbose_name`; each `(name, value)` pair replaces `{name}`.
///
/// ```rust
/// use argus_validate::render_message;
///
/// let msg = render_message("The {key} must be at least {min}.", "age", &[("min", "18".into())]);
/// assert_eq!(msg, "The age must be at least 18.");
/// ```
pub fn render_message(
    template: &str,
    verbose_name: &str,
    placeholders: &[(&'static str, String)],
) -> String {
    let mut message = template.replace(KEY_PLACEHOLDER, verbose_name);
    for (name, value) in placeholders {
        message = message.replace(&format!("{{{name}}}"), value);
    }
    message
}

/// Message template storage shared by the built-in validators.
pub(crate) type Template = Cow<'static, str>;

/// Adds a `with_message` override to a validator struct with a `message` field.
macro_rules! message_override {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $ty {
                /// Replaces the message template.
                #[must_use]
                pub fn with_message(mut self, message: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                    self.message = message.into();
                    self
                }
            }
        )*
    };
}

pub(crate) use message_override;
