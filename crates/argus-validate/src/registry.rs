//! Validator registry and clause grammar.
//!
//! A validator specification is a `|`-separated list of clauses. Each clause
//! is a validator name, optionally followed by `:` and a comma-separated
//! argument list:
//!
//! ```text
//! required|in: draft, published|length: 1, 64
//! ```
//!
//! A `|` inside parentheses or a character class belongs to the clause, so
//! `regex: ^(red|blue)$` stays one clause. Top-level alternation in a
//! pattern has to be wrapped in a group.
//!
//! Specifications are parsed once, when a parameter is declared, into
//! [`Clause`]s and then into configured validator instances.

use parking_lot::RwLock;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::{debug, warn};

use crate::builtin::{Between, Different, Email, In, Length, Max, Min, NotIn, Required, Same};
use crate::format::{DateValidator, IntegerValidator, NumericValidator, RegexValidator};
use crate::Validator;

/// Delimiter between clauses.
pub const CLAUSE_DELIMITER: char = '|';

/// Delimiter between a clause name and its arguments.
pub const ARGUMENT_MARKER: char = ':';

/// A shared, configured validator.
pub type SharedValidator = Arc<dyn Validator>;

/// Builds a configured validator from clause arguments.
pub type ValidatorFactory =
    Arc<dyn Fn(&[String]) -> Result<SharedValidator, SpecError> + Send + Sync>;

/// Errors raised while parsing or resolving a validator specification.
#[derive(Debug, Error)]
pub enum SpecError {
    /// A clause has no validator name.
    #[error("empty validator name in clause '{clause}'")]
    EmptyName {
        /// The offending clause.
        clause: String,
    },

    /// No validator is registered under this name.
    #[error("unknown validator '{name}'")]
    UnknownValidator {
        /// The unknown name.
        name: String,
    },

    /// The clause has the wrong number of arguments.
    #[error("validator '{name}' expects {expected}, got {actual} argument(s)")]
    ArgumentCount {
        /// Validator name.
        name: String,
        /// Description of the expected arguments.
        expected: &'static str,
        /// Number of arguments supplied.
        actual: usize,
    },

    /// An argument could not be interpreted.
    #[error("invalid argument '{argument}' for validator '{name}': {reason}")]
    InvalidArgument {
        /// Validator name.
        name: String,
        /// The offending argument.
        argument: String,
        /// Why it is invalid.
        reason: String,
    },

    /// A `regex` clause carries an invalid pattern.
    #[error("invalid pattern for validator '{name}'")]
    InvalidPattern {
        /// Validator name.
        name: String,
        /// The regex compilation error.
        #[source]
        source: regex::Error,
    },
}

impl SpecError {
    fn argument_count(name: &str, expected: &'static str, actual: usize) -> Self {
        Self::ArgumentCount {
            name: name.to_string(),
            expected,
            actual,
        }
    }

    fn invalid_argument(name: &str, argument: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.to_string(),
            argument: argument.to_string(),
            reason: reason.into(),
        }
    }
}

/// One parsed clause of a validator specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    /// Validator name.
    pub name: String,
    /// Trimmed arguments.
    pub args: Vec<String>,
}

impl Clause {
    /// Parses a single clause such as `in: a, b`.
    pub fn parse(text: &str) -> Result<Self, SpecError> {
        let (name, args) = match text.split_once(ARGUMENT_MARKER) {
            Some((name, rest)) => {
                let args = rest
                    .split(',')
                    .map(str::trim)
                    .filter(|arg| !arg.is_empty())
                    .map(String::from)
                    .collect();
                (name.trim(), args)
            }
            None => (text.trim(), Vec::new()),
        };

        if name.is_empty() {
            return Err(SpecError::EmptyName {
                clause: text.to_string(),
            });
        }

        Ok(Self {
            name: name.to_string(),
            args,
        })
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}: {}", self.name, self.args.join(", "))
        }
    }
}

/// A parsed validator specification: clauses in declaration order.
///
/// # Example
///
/// ```rust
/// use argus_validate::ValidatorSpec;
///
/// let spec: ValidatorSpec = "required|in: a, b".parse().unwrap();
/// assert_eq!(spec.clauses().len(), 2);
/// assert_eq!(spec.clauses()[1].args, vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidatorSpec {
    clauses: Vec<Clause>,
}

impl ValidatorSpec {
    /// Returns the parsed clauses.
    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }
}

impl FromStr for ValidatorSpec {
    type Err = SpecError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let clauses = split_clauses(spec)
            .into_iter()
            .map(Clause::parse)
            .collect::<Result<_, _>>()?;
        Ok(Self { clauses })
    }
}

/// Registry mapping validator names to factories.
///
/// The built-in validators are installed by [`ValidatorRegistry::with_builtins`];
/// [`ValidatorRegistry::global`] is the process-wide instance the pipeline
/// uses by default.
///
/// # Example
///
/// ```rust
/// use argus_core::Arguments;
/// use argus_validate::ValidatorRegistry;
///
/// let registry = ValidatorRegistry::with_builtins();
/// let validators = registry.get_validators("required|max: 3");
/// assert_eq!(validators.len(), 2);
///
/// let args: Arguments = [("tags", vec!["a", "b", "c", "d"])].into_iter().collect();
/// assert!(validators[1].validate("tags", &args, "tags").is_err());
/// ```
pub struct ValidatorRegistry {
    factories: RwLock<HashMap<String, ValidatorFactory>>,
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.factories.read().keys().cloned().collect();
        names.sort();
        f.debug_struct("ValidatorRegistry")
            .field("validators", &names)
            .finish()
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl ValidatorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a registry with every built-in validator installed.
    #[must_use]
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register_builtins();
        registry
    }

    /// Returns the process-wide registry.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<ValidatorRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::with_builtins)
    }

    /// Registers `factory` under `name`, replacing any previous entry.
    pub fn register<F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn(&[String]) -> Result<SharedValidator, SpecError> + Send + Sync + 'static,
    {
        self.factories.write().insert(name.into(), Arc::new(factory));
    }

    /// Returns true if a validator is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.read().contains_key(name)
    }

    /// Builds the validator for one clause.
    pub fn build(&self, clause: &Clause) -> Result<SharedValidator, SpecError> {
        let factory = self
            .factories
            .read()
            .get(&clause.name)
            .cloned()
            .ok_or_else(|| SpecError::UnknownValidator {
                name: clause.name.clone(),
            })?;
        factory(&clause.args)
    }

    /// Parses `spec` and builds every clause, failing on the first error.
    pub fn get_validators_strict(&self, spec: &str) -> Result<Vec<SharedValidator>, SpecError> {
        let spec: ValidatorSpec = spec.parse()?;
        spec.clauses().iter().map(|clause| self.build(clause)).collect()
    }

    /// Parses `spec` leniently.
    ///
    /// Clauses that do not resolve (unknown names, bad arguments) are skipped
    /// with a warning; the remaining validators are returned in order.
    pub fn get_validators(&self, spec: &str) -> Vec<SharedValidator> {
        let mut validators = Vec::new();
        for text in split_clauses(spec) {
            match Clause::parse(text).and_then(|clause| self.build(&clause)) {
                Ok(validator) => validators.push(validator),
                Err(error) => {
                    warn!(clause = text.trim(), %error, "skipping unresolved validator clause");
                }
            }
        }
        debug!(spec, count = validators.len(), "validator specification parsed");
        validators
    }

    fn register_builtins(&self) {
        self.register("required", |args| {
            no_args("required", args)?;
            Ok(Arc::new(Required::new()) as SharedValidator)
        });
        self.register("in", |args| {
            at_least_one("in", args)?;
            Ok(Arc::new(In::new(args.iter().cloned())) as SharedValidator)
        });
        self.register("not_in", |args| {
            at_least_one("not_in", args)?;
            Ok(Arc::new(NotIn::new(args.iter().cloned())) as SharedValidator)
        });
        self.register("min", |args| {
            let [min] = exactly::<1>("min", args)?;
            Ok(Arc::new(Min::new(number("min", min)?)) as SharedValidator)
        });
        self.register("max", |args| {
            let [max] = exactly::<1>("max", args)?;
            Ok(Arc::new(Max::new(number("max", max)?)) as SharedValidator)
        });
        self.register("between", |args| {
            let [min, max] = exactly::<2>("between", args)?;
            let (min, max) = (number("between", min)?, number("between", max)?);
            if min > max {
                return Err(SpecError::invalid_argument(
                    "between",
                    &format!("{min}, {max}"),
                    "lower bound exceeds upper bound",
                ));
            }
            Ok(Arc::new(Between::new(min, max)) as SharedValidator)
        });
        self.register("length", |args| match args {
            [len] => Ok(Arc::new(Length::exact(count("length", len)?)) as SharedValidator),
            [min, max] => {
                let (min, max) = (count("length", min)?, count("length", max)?);
                if min > max {
                    return Err(SpecError::invalid_argument(
                        "length",
                        &format!("{min}, {max}"),
                        "lower bound exceeds upper bound",
                    ));
                }
                Ok(Arc::new(Length::range(min, max)) as SharedValidator)
            }
            _ => Err(SpecError::argument_count("length", "1 or 2", args.len())),
        });
        self.register("regex", |args| {
            // Patterns may contain commas, so rejoin what the clause split.
            at_least_one("regex", args)?;
            let pattern = args.join(",");
            let regex = Regex::new(&pattern).map_err(|source| SpecError::InvalidPattern {
                name: "regex".to_string(),
                source,
            })?;
            Ok(Arc::new(RegexValidator::new(regex)) as SharedValidator)
        });
        self.register("email", |args| {
            no_args("email", args)?;
            Ok(Arc::new(Email::new()) as SharedValidator)
        });
        self.register("same", |args| {
            let [other] = exactly::<1>("same", args)?;
            Ok(Arc::new(Same::new(other.clone())) as SharedValidator)
        });
        self.register("different", |args| {
            let [other] = exactly::<1>("different", args)?;
            Ok(Arc::new(Different::new(other.clone())) as SharedValidator)
        });
        self.register("integer", |args| {
            no_args("integer", args)?;
            Ok(Arc::new(IntegerValidator::new()) as SharedValidator)
        });
        self.register("numeric", |args| {
            no_args("numeric", args)?;
            Ok(Arc::new(NumericValidator::new()) as SharedValidator)
        });
        self.register("date", |args| {
            no_args("date", args)?;
            Ok(Arc::new(DateValidator::new()) as SharedValidator)
        });
    }
}

/// Splits on top-level delimiters, skipping blank clauses.
///
/// Delimiters escaped with a backslash, nested in `(...)` or inside `[...]` are
/// part of the clause.
fn split_clauses(spec: &str) -> Vec<&str> {
    let mut clauses = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut in_class = false;
    let mut chars = spec.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '(' if !in_class => depth += 1,
            ')' if !in_class => depth = depth.saturating_sub(1),
            CLAUSE_DELIMITER if depth == 0 && !in_class => {
                clauses.push(&spec[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    clauses.push(&spec[start..]);
    clauses.retain(|clause| !clause.trim().is_empty());
    clauses
}

fn no_args(name: &str, args: &[String]) -> Result<(), SpecError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(SpecError::argument_count(name, "no arguments", args.len()))
    }
}

fn at_least_one(name: &str, args: &[String]) -> Result<(), SpecError> {
    if args.is_empty() {
        Err(SpecError::argument_count(name, "at least 1", 0))
    } else {
        Ok(())
    }
}

fn exactly<'a, const N: usize>(
    name: &str,
    args: &'a [String],
) -> Result<&'a [String; N], SpecError> {
    args.try_into().map_err(|_| {
        let expected = match N {
            1 => "1",
            2 => "2",
            _ => "a fixed number of",
        };
        SpecError::argument_count(name, expected, args.len())
    })
}

fn number(name: &str, arg: &str) -> Result<f64, SpecError> {
    arg.parse()
        .map_err(|_| SpecError::invalid_argument(name, arg, "expected a number"))
}

fn count(name: &str, arg: &str) -> Result<usize, SpecError> {
    arg.parse()
        .map_err(|_| SpecError::invalid_argument(name, arg, "expected a non-negative integer"))
}
