//! Per-call cache and request view.

use argus_core::{Arguments, ExtractionError, Value};
use indexmap::IndexMap;

use crate::context::ExtractionContext;

/// Default limit for a JSON body read by the body lookup (1 MiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Everything a lookup may read during one pipeline call.
///
/// A scope is created at the start of a call and dropped when the call ends,
/// whatever its outcome. Parsed body fields, uploaded files and headers are
/// computed at most once per scope and never outlive it.
///
/// # Example
///
/// ```rust
/// use argus_core::{Arguments, Value};
/// use argus_extract::{CallScope, ExtractionContextBuilder};
/// use http::Method;
///
/// let ctx = ExtractionContextBuilder::new()
///     .method(Method::POST)
///     .json(&serde_json::json!({"n": 3}))
///     .build();
/// let route_args = Arguments::new();
/// let mut scope = CallScope::new(&ctx, &route_args);
///
/// assert_eq!(scope.body_fields().unwrap().get("n"), Some(&Value::Int(3)));
/// ```
#[derive(Debug)]
pub struct CallScope<'a> {
    ctx: &'a ExtractionContext,
    route_args: &'a Arguments,
    max_body_size: usize,
    body: Option<IndexMap<String, Value>>,
    files: Option<IndexMap<String, Value>>,
    headers: Option<IndexMap<String, Value>>,
}

impl<'a> CallScope<'a> {
    /// Creates a scope over `ctx` with the router's `route_args`.
    #[must_use]
    pub fn new(ctx: &'a ExtractionContext, route_args: &'a Arguments) -> Self {
        Self {
            ctx,
            route_args,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            body: None,
            files: None,
            headers: None,
        }
    }

    /// Sets the largest raw body the body lookup will parse.
    #[must_use]
    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    /// Returns the request context.
    #[must_use]
    pub fn context(&self) -> &'a ExtractionContext {
        self.ctx
    }

    /// Returns the route arguments resolved by the router.
    #[must_use]
    pub fn route_args(&self) -> &'a Arguments {
        self.route_args
    }

    /// Returns the request's body fields, parsing them on first use.
    ///
    /// Structured body fields win when present; their first value is
    /// decoded as UTF-8. Otherwise the raw body must be empty or a JSON
    /// object.
    ///
    /// # Errors
    ///
    /// Fails if the body exceeds the size limit, a field is not UTF-8, or
    /// the raw body is not a JSON object.
    pub fn body_fields(&mut self) -> Result<&IndexMap<String, Value>, ExtractionError> {
        if self.body.is_none() {
            let parsed = self.parse_body()?;
            self.body = Some(parsed);
        }
        Ok(self.body.get_or_insert_with(IndexMap::new))
    }

    /// Returns uploaded files keyed by field name, building them on first use.
    ///
    /// A single upload is a [`Value::File`]; several are a [`Value::List`].
    pub fn files(&mut self) -> &IndexMap<String, Value> {
        let ctx = self.ctx;
        self.files.get_or_insert_with(|| {
            ctx.files()
                .iter()
                .map(|(name, files)| {
                    let value = match files.as_slice() {
                        [file] => Value::File(file.clone()),
                        many => Value::List(many.iter().cloned().map(Value::File).collect()),
                    };
                    (name.clone(), value)
                })
                .collect()
        })
    }

    /// Returns the request headers with lowercase names, building them on
    /// first use. Repeated headers are joined with `,`.
    pub fn headers(&mut self) -> &IndexMap<String, Value> {
        let ctx = self.ctx;
        self.headers.get_or_insert_with(|| {
            let mut headers: IndexMap<String, Value> = IndexMap::new();
            for name in ctx.headers().keys() {
                let joined = ctx
                    .headers()
                    .get_all(name)
                    .iter()
                    .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                    .collect::<Vec<_>>()
                    .join(",");
                headers.insert(name.as_str().to_owned(), Value::Str(joined));
            }
            headers
        })
    }

    /// Returns one header by case-insensitive name.
    pub fn header(&mut self, name: &str) -> Option<&Value> {
        let name = name.to_ascii_lowercase();
        self.headers().get(&name)
    }

    /// Returns true if the body fields have been parsed in this scope.
    #[must_use]
    pub fn is_body_cached(&self) -> bool {
        self.body.is_some()
    }

    fn parse_body(&self) -> Result<IndexMap<String, Value>, ExtractionError> {
        let fields = self.ctx.body_arguments();
        if !fields.is_empty() {
            return fields
                .iter()
                .filter_map(|(name, values)| values.first().map(|first| (name, first)))
                .map(|(name, first)| -> Result<(String, Value), ExtractionError> {
                    let text = std::str::from_utf8(first).map_err(|e| {
                        ExtractionError::malformed_body(format!(
                            "field '{name}' is not valid UTF-8: {e}"
                        ))
                    })?;
                    Ok((name.clone(), Value::from(text)))
                })
                .collect();
        }

        let body = self.ctx.body();
        if body.len() > self.max_body_size {
            return Err(ExtractionError::payload_too_large(self.max_body_size, body.len()));
        }
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(IndexMap::new());
        }

        let json: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| ExtractionError::malformed_body(e.to_string()))?;
        match json {
            serde_json::Value::Object(map) => Ok(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()),
            other => Err(ExtractionError::malformed_body(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
