//! Parameter declarations.
//!
//! A [`ParamBuilder`] states where a parameter comes from, what type it
//! converts to, and which rules it must satisfy. Building it resolves the name
//! defaults and yields an immutable [`ParamDescriptor`]. Validator clauses are
//! parsed as soon as they are declared.

use std::sync::Arc;

use argus_core::Value;
use argus_extract::{lookup, Lookup, SharedLookup};
use argus_validate::{SharedValidator, SpecError, Validator, ValidatorRegistry};

/// Compiled declaration of one handler parameter.
///
/// # Example
///
/// ```rust
/// use argus::{body, Value};
///
/// let age = body("age")
///     .kind("int")
///     .default(0)
///     .verbose_name("Age")
///     .validators("required|min: 0")
///     .build();
///
/// assert_eq!(age.related_name(), "age");
/// assert_eq!(age.verbose_name(), "Age");
/// assert_eq!(age.default(), &Value::Int(0));
/// assert_eq!(age.validators().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ParamDescriptor {
    name: String,
    related_name: String,
    verbose_name: String,
    default: Value,
    kind: String,
    lookup: SharedLookup,
    many: bool,
    separator: Option<String>,
    validators: Vec<SharedValidator>,
}

impl ParamDescriptor {
    /// Starts a string query parameter declaration.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ParamBuilder {
        ParamBuilder::new(name)
    }

    /// Source key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key the value is stored under in the handler arguments.
    pub fn related_name(&self) -> &str {
        &self.related_name
    }

    /// Name used in error messages.
    pub fn verbose_name(&self) -> &str {
        &self.verbose_name
    }

    /// Value used when the source has none; [`Value::Null`] when unset.
    pub fn default(&self) -> &Value {
        &self.default
    }

    /// Converter alias.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Lookup strategy.
    pub fn lookup(&self) -> &dyn Lookup {
        self.lookup.as_ref()
    }

    /// Whether the parameter is a list.
    pub fn many(&self) -> bool {
        self.many
    }

    /// Separator declared on this parameter, if any.
    pub fn separator(&self) -> Option<&str> {
        self.separator.as_deref()
    }

    /// Validators in declaration order.
    pub fn validators(&self) -> &[SharedValidator] {
        &self.validators
    }
}

/// Builder for [`ParamDescriptor`].
#[derive(Debug, Clone)]
pub struct ParamBuilder {
    name: String,
    related_name: Option<String>,
    verbose_name: Option<String>,
    default: Value,
    kind: String,
    lookup: SharedLookup,
    many: bool,
    separator: Option<String>,
    validators: Vec<SharedValidator>,
}

impl ParamBuilder {
    /// Declares a string parameter read from the query string.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            related_name: None,
            verbose_name: None,
            default: Value::Null,
            kind: "string".to_string(),
            lookup: Arc::new(lookup::Query),
            many: false,
            separator: None,
            validators: Vec::new(),
        }
    }

    /// Sets the key the value is stored under; defaults to the name.
    #[must_use]
    pub fn related_name(mut self, related_name: impl Into<String>) -> Self {
        self.related_name = Some(related_name.into());
        self
    }

    /// Sets the name used in error messages; defaults to the name.
    #[must_use]
    pub fn verbose_name(mut self, verbose_name: impl Into<String>) -> Self {
        self.verbose_name = Some(verbose_name.into());
        self
    }

    /// Sets the value used when the source has none.
    #[must_use]
    pub fn default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    /// Sets the converter alias (`int`, `float`, `bool`, `date`, ...).
    #[must_use]
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Sets the lookup strategy.
    #[must_use]
    pub fn lookup(mut self, lookup: impl Lookup + 'static) -> Self {
        self.lookup = Arc::new(lookup);
        self
    }

    /// Sets an already shared lookup strategy.
    #[must_use]
    pub fn shared_lookup(mut self, lookup: SharedLookup) -> Self {
        self.lookup = lookup;
        self
    }

    /// Marks the parameter as a list.
    #[must_use]
    pub fn many(mut self, many: bool) -> Self {
        self.many = many;
        self
    }

    /// Sets the separator used to split a `many` string value.
    #[must_use]
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Appends the validators of a clause string such as `required|in: a, b`.
    ///
    /// Unknown validator names are skipped with a warning. Use
    /// [`try_validators`](Self::try_validators) to reject them.
    #[must_use]
    pub fn validators(mut self, spec: &str) -> Self {
        self.validators
            .extend(ValidatorRegistry::global().get_validators(spec));
        self
    }

    /// Appends the validators of a clause string, failing on the first bad clause.
    pub fn try_validators(self, spec: &str) -> Result<Self, SpecError> {
        self.try_validators_with(ValidatorRegistry::global(), spec)
    }

    /// Like [`try_validators`](Self::try_validators) with an explicit registry.
    pub fn try_validators_with(
        mut self,
        registry: &ValidatorRegistry,
        spec: &str,
    ) -> Result<Self, SpecError> {
        self.validators.extend(registry.get_validators_strict(spec)?);
        Ok(self)
    }

    /// Appends a pre-built validator.
    #[must_use]
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Resolves the name defaults and freezes the declaration.
    #[must_use]
    pub fn build(self) -> ParamDescriptor {
        let related_name = self.related_name.unwrap_or_else(|| self.name.clone());
        let verbose_name = self.verbose_name.unwrap_or_else(|| self.name.clone());
        ParamDescriptor {
            name: self.name,
            related_name,
            verbose_name,
            default: self.default,
            kind: self.kind,
            lookup: self.lookup,
            many: self.many,
            separator: self.separator,
            validators: self.validators,
        }
    }
}

impl From<ParamBuilder> for ParamDescriptor {
    fn from(builder: ParamBuilder) -> Self {
        builder.build()
    }
}

/// Declares a query parameter. Same as [`query`].
#[must_use]
pub fn param(name: impl Into<String>) -> ParamBuilder {
    ParamBuilder::new(name)
}

/// Declares a query parameter.
#[must_use]
pub fn query(name: impl Into<String>) -> ParamBuilder {
    ParamBuilder::new(name)
}

/// Declares a body parameter (form field or JSON member).
#[must_use]
pub fn body(name: impl Into<String>) -> ParamBuilder {
    ParamBuilder::new(name).lookup(lookup::Body)
}

/// Declares a parameter read from the body, falling back to the query string.
#[must_use]
pub fn body_or_query(name: impl Into<String>) -> ParamBuilder {
    ParamBuilder::new(name).lookup(lookup::BodyOrQuery)
}

/// Declares a header parameter.
#[must_use]
pub fn header(name: impl Into<String>) -> ParamBuilder {
    ParamBuilder::new(name).lookup(lookup::Header)
}

/// Declares an uploaded file parameter.
#[must_use]
pub fn file(name: impl Into<String>) -> ParamBuilder {
    ParamBuilder::new(name).lookup(lookup::File).kind("file")
}

/// Declares a parameter resolved by the router.
#[must_use]
pub fn route(name: impl Into<String>) -> ParamBuilder {
    ParamBuilder::new(name).lookup(lookup::Route)
}
