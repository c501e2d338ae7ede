//! Compiled parameter pipeline.
//!
//! A [`Pipeline`] runs every declared parameter through one pass:
//!
//! ```text
//! lookup → (split when many) → convert → insert under related name
//!                                              ↓
//!                         validate all parameters, in declaration order
//! ```
//!
//! Per-call caches live in a [`CallScope`] owned by a single
//! [`extract`](Pipeline::extract) call and dropped on every exit path. The
//! pipeline itself never changes after it is built and can be shared freely.

use std::sync::Arc;

use argus_config::{ArgusConfig, EndpointConfig, PipelineConfig};
use argus_convert::{Converter, ConverterRegistry};
use argus_core::{Arguments, ConversionError, ParamError, Value};
use argus_extract::{builtin_lookup, CallScope, ExtractionContext, DEFAULT_MAX_BODY_SIZE};
use argus_telemetry::{record_extraction, record_rejection, Outcome};
use tracing::debug;

use crate::descriptor::{ParamBuilder, ParamDescriptor};
use crate::endpoint::{Endpoint, Handler};
use crate::error::DeclarationError;

/// Separator used by `many` parameters that declare none.
pub const DEFAULT_SEPARATOR: &str = ",";

const UNNAMED: &str = "unnamed";

/// Immutable, shareable parameter pipeline of one endpoint.
///
/// # Example
///
/// ```rust
/// use argus::{query, Arguments, ExtractionContextBuilder, Pipeline, Value};
/// use http::Uri;
///
/// let pipeline = Pipeline::builder()
///     .param(query("page").kind("int").default(1))
///     .param(query("tags").many(true))
///     .build();
///
/// let ctx = ExtractionContextBuilder::new()
///     .uri(Uri::from_static("/posts?tags=rust,go"))
///     .build();
/// let args = pipeline.extract(&ctx, Arguments::new()).unwrap();
///
/// assert_eq!(args.get("page"), Some(&Value::Int(1)));
/// assert_eq!(args.get("tags"), Some(&Value::list(["rust", "go"])));
/// ```
#[derive(Debug)]
pub struct Pipeline {
    name: String,
    params: Vec<ParamDescriptor>,
    separator: String,
    max_body_size: usize,
    converters: Option<Arc<ConverterRegistry>>,
}

impl Pipeline {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Builds a pipeline from declarative parameter tables.
    ///
    /// With `strict_validators` set, unknown validator names are rejected
    /// instead of skipped.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError`] for an unknown lookup, a default that does
    /// not convert to the declared type, or an invalid validator clause in
    /// strict mode.
    pub fn from_declarations(
        endpoint: &EndpointConfig,
        settings: &PipelineConfig,
    ) -> Result<Self, DeclarationError> {
        Ok(PipelineBuilder::from_declarations(endpoint, settings)?.build())
    }

    /// Builds the pipeline of the named endpoint in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError::UnknownEndpoint`] when the endpoint is not
    /// declared, otherwise as [`from_declarations`](Self::from_declarations).
    pub fn from_config(config: &ArgusConfig, endpoint: &str) -> Result<Self, DeclarationError> {
        let declarations =
            config
                .endpoint(endpoint)
                .ok_or_else(|| DeclarationError::UnknownEndpoint {
                    endpoint: endpoint.to_string(),
                })?;
        Ok(PipelineBuilder::from_declarations(declarations, &config.pipeline)?
            .name(endpoint)
            .build())
    }

    /// Endpoint name used in logs and metrics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameters, in declaration order.
    pub fn params(&self) -> &[ParamDescriptor] {
        &self.params
    }

    /// Separator for `many` parameters that declare none.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Largest raw body the body lookup parses.
    pub fn max_body_size(&self) -> usize {
        self.max_body_size
    }

    /// Resolves, converts and validates every parameter.
    ///
    /// `args` are the arguments already known for this call (usually route
    /// parameters); the result holds them plus one entry per declared
    /// parameter, keyed by its related name.
    ///
    /// # Errors
    ///
    /// Returns the first failure: a lookup or conversion error during
    /// extraction, otherwise the first validation failure.
    pub fn extract(
        &self,
        ctx: &ExtractionContext,
        args: Arguments,
    ) -> Result<Arguments, ParamError> {
        let result = self.run(ctx, args);
        match &result {
            Ok(_) => record_extraction(&self.name, Outcome::Accepted),
            Err(error) => {
                let kind = rejection_kind(error);
                let code = error.validator_code().unwrap_or_else(|| error.error_code());
                debug!(
                    endpoint = %self.name,
                    field = error.field().unwrap_or_default(),
                    kind,
                    code,
                    %error,
                    "parameter rejected"
                );
                record_extraction(&self.name, Outcome::Rejected);
                record_rejection(kind, code);
            }
        }
        result
    }

    fn run(&self, ctx: &ExtractionContext, args: Arguments) -> Result<Arguments, ParamError> {
        let mut resolved = Vec::with_capacity(self.params.len());
        {
            let mut scope = CallScope::new(ctx, &args).with_max_body_size(self.max_body_size);
            for param in &self.params {
                resolved.push(self.resolve(&mut scope, param)?);
            }
        }

        let mut args = args;
        for (param, value) in self.params.iter().zip(resolved) {
            args.insert(param.related_name(), value);
        }

        for param in &self.params {
            for validator in param.validators() {
                validator
                    .validate(param.related_name(), &args, param.verbose_name())
                    .map_err(|failure| ParamError::validation(param.related_name(), failure))?;
            }
        }

        Ok(args)
    }

    fn resolve(
        &self,
        scope: &mut CallScope<'_>,
        param: &ParamDescriptor,
    ) -> Result<Value, ParamError> {
        let raw = param.lookup().lookup(scope, param.name(), param.default())?;
        let converter = self.converters().get(param.kind());
        let separator = param.separator().unwrap_or(&self.separator);
        coerce(converter.as_ref(), param.name(), raw, param.many(), separator)
            .map_err(|source| ParamError::conversion(param.name(), param.verbose_name(), source))
    }

    fn converters(&self) -> &ConverterRegistry {
        self.converters
            .as_deref()
            .unwrap_or_else(|| ConverterRegistry::global())
    }

    /// Binds this pipeline to a handler.
    #[must_use]
    pub fn handler<H: Handler>(self, handler: H) -> Endpoint<H> {
        Endpoint::new(self, handler)
    }
}

/// Builder for [`Pipeline`].
///
/// Parameters keep the order they are declared in.
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    name: Option<String>,
    params: Vec<ParamDescriptor>,
    separator: Option<String>,
    max_body_size: Option<usize>,
    converters: Option<Arc<ConverterRegistry>>,
}

impl PipelineBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a builder from declarative parameter tables.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::from_declarations`].
    pub fn from_declarations(
        endpoint: &EndpointConfig,
        settings: &PipelineConfig,
    ) -> Result<Self, DeclarationError> {
        let registry = ConverterRegistry::global();
        let mut builder = Self::new()
            .separator(settings.default_separator.clone())
            .max_body_size(settings.max_body_size);

        for decl in &endpoint.params {
            let lookup =
                builtin_lookup(&decl.lookup).ok_or_else(|| DeclarationError::UnknownLookup {
                    param: decl.name.clone(),
                    lookup: decl.lookup.clone(),
                })?;

            let mut param = ParamBuilder::new(decl.name.clone())
                .shared_lookup(lookup)
                .kind(decl.kind.clone())
                .many(decl.many);
            if let Some(related_name) = &decl.related_name {
                param = param.related_name(related_name.clone());
            }
            if let Some(verbose_name) = &decl.verbose_name {
                param = param.verbose_name(verbose_name.clone());
            }
            if let Some(separator) = &decl.separator {
                param = param.separator(separator.clone());
            }

            if let Some(default) = &decl.default {
                let default = Value::from(default.clone());
                let separator = decl
                    .separator
                    .as_deref()
                    .unwrap_or(&settings.default_separator);
                coerce(
                    registry.get(&decl.kind).as_ref(),
                    &decl.name,
                    default.clone(),
                    decl.many,
                    separator,
                )
                .map_err(|e| DeclarationError::InvalidDefault {
                    param: decl.name.clone(),
                    reason: e.reason().to_string(),
                })?;
                param = param.default(default);
            }

            if let Some(spec) = &decl.validators {
                param = if settings.strict_validators {
                    param
                        .try_validators(spec)
                        .map_err(|source| DeclarationError::Validators {
                            param: decl.name.clone(),
                            source,
                        })?
                } else {
                    param.validators(spec)
                };
            }

            builder = builder.param(param);
        }

        Ok(builder)
    }

    /// Sets the endpoint name used in logs and metrics.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, param: impl Into<ParamDescriptor>) -> Self {
        self.params.push(param.into());
        self
    }

    /// Sets the separator for `many` parameters that declare none.
    #[must_use]
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Sets the largest raw body the body lookup parses.
    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = Some(size);
        self
    }

    /// Uses `registry` instead of the process-wide converter registry.
    #[must_use]
    pub fn converters(mut self, registry: Arc<ConverterRegistry>) -> Self {
        self.converters = Some(registry);
        self
    }

    /// Compiles the pipeline.
    #[must_use]
    pub fn build(self) -> Pipeline {
        let pipeline = Pipeline {
            name: self.name.unwrap_or_else(|| UNNAMED.to_string()),
            params: self.params,
            separator: self
                .separator
                .unwrap_or_else(|| DEFAULT_SEPARATOR.to_string()),
            max_body_size: self.max_body_size.unwrap_or(DEFAULT_MAX_BODY_SIZE),
            converters: self.converters,
        };
        debug!(
            endpoint = %pipeline.name,
            params = pipeline.params.len(),
            "parameter pipeline compiled"
        );
        pipeline
    }

    /// Compiles the pipeline and binds it to a handler.
    #[must_use]
    pub fn handler<H: Handler>(self, handler: H) -> Endpoint<H> {
        self.build().handler(handler)
    }
}

/// Applies cardinality and conversion to one raw value.
///
/// For `many` parameters a string is split on `separator`, `Null` becomes an
/// empty list, a list is kept, and any other value becomes a one-element list.
fn coerce(
    converter: &dyn Converter,
    key: &str,
    raw: Value,
    many: bool,
    separator: &str,
) -> Result<Value, ConversionError> {
    if !many {
        return converter.convert(key, raw);
    }

    let items = match raw {
        Value::Str(text) => text
            .split(separator)
            .map(|part| Value::Str(part.to_string()))
            .collect(),
        Value::Null => Vec::new(),
        Value::List(items) => items,
        other => vec![other],
    };

    items
        .into_iter()
        .map(|item| converter.convert(key, item))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::List)
}

fn rejection_kind(error: &ParamError) -> &'static str {
    match error {
        ParamError::Conversion { .. } => "conversion",
        ParamError::Validation { .. } => "validation",
        ParamError::Extraction(_) => "extraction",
        ParamError::Lookup { .. } => "lookup",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{body, query};
    use argus_config::ParamDecl;
    use argus_convert::{IntegerConverter, StringConverter};
    use argus_extract::ExtractionContextBuilder;
    use http::Uri;

    fn ctx(uri: &'static str) -> ExtractionContext {
        ExtractionContextBuilder::new()
            .uri(Uri::from_static(uri))
            .build()
    }

    #[test]
    fn test_coerce_scalar() {
        let value = coerce(&IntegerConverter::default(), "a", "7".into(), false, ",").unwrap();
        assert_eq!(value, Value::Int(7));
    }

    #[test]
    fn test_coerce_many_shapes() {
        let ints = IntegerConverter::default();
        assert_eq!(
            coerce(&ints, "a", "1|2".into(), true, "|").unwrap(),
            Value::list([1, 2])
        );
        assert_eq!(
            coerce(&ints, "a", Value::Null, true, ",").unwrap(),
            Value::List(Vec::new())
        );
        assert_eq!(
            coerce(&ints, "a", Value::list(["3"]), true, ",").unwrap(),
            Value::list([3])
        );
        assert_eq!(
            coerce(&ints, "a", Value::Int(4), true, ",").unwrap(),
            Value::list([4])
        );
    }

    #[test]
    fn test_coerce_many_reports_bad_element() {
        let err = coerce(&IntegerConverter::default(), "ids", "1,x".into(), true, ",").unwrap_err();
        assert_eq!(err.key(), "ids");
    }

    #[test]
    fn test_coerce_many_keeps_empty_segments() {
        let value = coerce(&StringConverter, "a", "a,,b".into(), true, ",").unwrap();
        assert_eq!(value, Value::list(["a", "", "b"]));
    }

    #[test]
    fn test_builder_defaults() {
        let pipeline = Pipeline::builder().build();
        assert_eq!(pipeline.name(), "unnamed");
        assert_eq!(pipeline.separator(), ",");
        assert_eq!(pipeline.max_body_size(), DEFAULT_MAX_BODY_SIZE);
        assert!(pipeline.params().is_empty());
    }

    #[test]
    fn test_declaration_order_preserved() {
        let pipeline = Pipeline::builder()
            .param(query("b"))
            .param(body("a"))
            .param(query("c"))
            .build();
        let names: Vec<_> = pipeline.params().iter().map(ParamDescriptor::name).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn test_validation_sees_all_converted_values() {
        let pipeline = Pipeline::builder()
            .param(query("password_confirm").validators("same: password"))
            .param(query("password"))
            .build();

        let ok = pipeline.extract(&ctx("/?password=x&password_confirm=x"), Arguments::new());
        assert!(ok.is_ok());

        let err = pipeline
            .extract(&ctx("/?password=x&password_confirm=y"), Arguments::new())
            .unwrap_err();
        assert_eq!(err.validator_code(), Some("same"));
    }

    #[test]
    fn test_conversion_error_carries_label() {
        let pipeline = Pipeline::builder()
            .param(query("a").kind("int").verbose_name("Amount"))
            .build();
        let err = pipeline.extract(&ctx("/?a=x"), Arguments::new()).unwrap_err();
        assert!(err.is_conversion());
        assert_eq!(err.field(), Some("a"));
        assert!(err.to_string().starts_with("type conversion failed for Amount"));
    }

    #[test]
    fn test_custom_converter_registry() {
        let registry = Arc::new(ConverterRegistry::new());
        registry.register(["int"], Arc::new(StringConverter));
        let pipeline = Pipeline::builder()
            .param(query("a").kind("int"))
            .converters(registry)
            .build();
        let args = pipeline.extract(&ctx("/?a=5"), Arguments::new()).unwrap();
        assert_eq!(args.get("a"), Some(&Value::from("5")));
    }

    #[test]
    fn test_from_declarations_invalid_default() {
        let mut decl = ParamDecl::new("page");
        decl.kind = "int".into();
        decl.default = Some(serde_json::json!("first"));
        let endpoint = EndpointConfig { params: vec![decl] };

        let err = Pipeline::from_declarations(&endpoint, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, DeclarationError::InvalidDefault { ref param, .. } if param == "page"));
    }

    #[test]
    fn test_from_declarations_unknown_lookup() {
        let mut decl = ParamDecl::new("sid");
        decl.lookup = "cookie".into();
        let endpoint = EndpointConfig { params: vec![decl] };

        let err = Pipeline::from_declarations(&endpoint, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, DeclarationError::UnknownLookup { .. }));
    }

    #[test]
    fn test_from_declarations_strict_validators() {
        let mut decl = ParamDecl::new("q");
        decl.validators = Some("required|no_such_rule".into());
        let endpoint = EndpointConfig { params: vec![decl] };

        let lenient = Pipeline::from_declarations(&endpoint, &PipelineConfig::default()).unwrap();
        assert_eq!(lenient.params()[0].validators().len(), 1);

        let strict = PipelineConfig {
            strict_validators: true,
            ..PipelineConfig::default()
        };
        let err = Pipeline::from_declarations(&endpoint, &strict).unwrap_err();
        assert!(matches!(err, DeclarationError::Validators { .. }));
    }

    #[test]
    fn test_from_config_unknown_endpoint() {
        let err = Pipeline::from_config(&ArgusConfig::default(), "missing").unwrap_err();
        assert!(matches!(err, DeclarationError::UnknownEndpoint { .. }));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use argus_convert::{IntegerConverter, StringConverter};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn split_then_join_is_identity(parts in prop::collection::vec("[a-z0-9]{0,6}", 1..8)) {
            let joined = parts.join("|");
            let value = coerce(&StringConverter, "k", Value::from(joined), true, "|").unwrap();
            prop_assert_eq!(value, Value::list(parts));
        }

        #[test]
        fn many_integers_keep_order(numbers in prop::collection::vec(any::<i64>(), 1..8)) {
            let joined = numbers.iter().map(ToString::to_string).collect::<Vec<_>>().join(";");
            let value = coerce(&IntegerConverter::default(), "k", Value::from(joined), true, ";").unwrap();
            prop_assert_eq!(value, Value::list(numbers));
        }
    }
}
