//! Lookup strategies.
//!
//! A [`Lookup`] decides where a parameter's raw value comes from. The
//! built-in strategies read the query string, body, files, headers or route
//! arguments; [`lookup_fn`] wraps a closure for anything else.

use argus_core::{ParamError, Value};
use std::fmt;
use std::sync::Arc;

use crate::scope::CallScope;

/// Reads the raw value of one parameter from a call scope.
///
/// # Implementing `Lookup`
///
/// ```rust
/// use argus_core::{ParamError, Value};
/// use argus_extract::{CallScope, Lookup};
///
/// // Reads a value from the request path's last segment.
/// #[derive(Debug)]
/// struct LastSegment;
///
/// impl Lookup for LastSegment {
///     fn lookup(
///         &self,
///         scope: &mut CallScope<'_>,
///         _key: &str,
///         default: &Value,
///     ) -> Result<Value, ParamError> {
///         Ok(scope
///             .context()
///             .path()
///             .rsplit('/')
///             .next()
///             .filter(|s| !s.is_empty())
///             .map_or_else(|| default.clone(), Value::from))
///     }
/// }
/// ```
pub trait Lookup: Send + Sync + fmt::Debug {
    /// Returns the raw value for `key`, or `default` when it is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying request data cannot be read.
    fn lookup(
        &self,
        scope: &mut CallScope<'_>,
        key: &str,
        default: &Value,
    ) -> Result<Value, ParamError>;
}

/// A shared lookup strategy.
pub type SharedLookup = Arc<dyn Lookup>;

/// Last value of the key in the query string.
#[derive(Debug, Clone, Copy, Default)]
pub struct Query;

impl Lookup for Query {
    fn lookup(
        &self,
        scope: &mut CallScope<'_>,
        key: &str,
        default: &Value,
    ) -> Result<Value, ParamError> {
        Ok(scope
            .context()
            .query_argument(key)
            .map_or_else(|| default.clone(), Value::from))
    }
}

/// Body field: form fields when present, otherwise a JSON object body.
#[derive(Debug, Clone, Copy, Default)]
pub struct Body;

impl Lookup for Body {
    fn lookup(
        &self,
        scope: &mut CallScope<'_>,
        key: &str,
        default: &Value,
    ) -> Result<Value, ParamError> {
        Ok(scope
            .body_fields()?
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.clone()))
    }
}

/// Uploaded file(s) under the form field name.
#[derive(Debug, Clone, Copy, Default)]
pub struct File;

impl Lookup for File {
    fn lookup(
        &self,
        scope: &mut CallScope<'_>,
        key: &str,
        default: &Value,
    ) -> Result<Value, ParamError> {
        Ok(scope
            .files()
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.clone()))
    }
}

/// Request header, matched case-insensitively.
#[derive(Debug, Clone, Copy, Default)]
pub struct Header;

impl Lookup for Header {
    fn lookup(
        &self,
        scope: &mut CallScope<'_>,
        key: &str,
        default: &Value,
    ) -> Result<Value, ParamError> {
        Ok(scope.header(key).cloned().unwrap_or_else(|| default.clone()))
    }
}

/// Body first; when the body has no value, the query string.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyOrQuery;

impl Lookup for BodyOrQuery {
    fn lookup(
        &self,
        scope: &mut CallScope<'_>,
        key: &str,
        default: &Value,
    ) -> Result<Value, ParamError> {
        match Body.lookup(scope, key, &Value::Null)? {
            Value::Null => Query.lookup(scope, key, default),
            value => Ok(value),
        }
    }
}

/// Argument already resolved by the router.
#[derive(Debug, Clone, Copy, Default)]
pub struct Route;

impl Lookup for Route {
    fn lookup(
        &self,
        scope: &mut CallScope<'_>,
        key: &str,
        default: &Value,
    ) -> Result<Value, ParamError> {
        Ok(scope
            .route_args()
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.clone()))
    }
}

/// A lookup backed by a closure. Built with [`lookup_fn`].
pub struct LookupFn<F> {
    name: &'static str,
    f: F,
}

impl<F> fmt::Debug for LookupFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupFn").field("name", &self.name).finish()
    }
}

impl<F> Lookup for LookupFn<F>
where
    F: Fn(&mut CallScope<'_>, &str, &Value) -> Result<Value, ParamError> + Send + Sync,
{
    fn lookup(
        &self,
        scope: &mut CallScope<'_>,
        key: &str,
        default: &Value,
    ) -> Result<Value, ParamError> {
        (self.f)(scope, key, default)
    }
}

/// Wraps a closure as a named lookup strategy.
///
/// ```rust
/// use argus_core::{Arguments, Value};
/// use argus_extract::{lookup_fn, CallScope, ExtractionContextBuilder, Lookup};
///
/// let method = lookup_fn("method", |scope, _key, _default| {
///     Ok(Value::from(scope.context().method().as_str()))
/// });
///
/// let ctx = ExtractionContextBuilder::new().build();
/// let args = Arguments::new();
/// let mut scope = CallScope::new(&ctx, &args);
/// assert_eq!(method.lookup(&mut scope, "m", &Value::Null).unwrap(), Value::from("GET"));
/// ```
pub fn lookup_fn<F>(name: &'static str, f: F) -> LookupFn<F>
where
    F: Fn(&mut CallScope<'_>, &str, &Value) -> Result<Value, ParamError> + Send + Sync,
{
    LookupFn { name, f }
}

/// Resolves a built-in strategy by its configuration name.
///
/// Known names: `query`, `body`, `file`, `header`, `body_or_query`, `route`.
#[must_use]
pub fn builtin_lookup(name: &str) -> Option<SharedLookup> {
    let lookup: SharedLookup = match name {
        "query" => Arc::new(Query),
        "body" => Arc::new(Body),
        "file" => Arc::new(File),
        "header" => Arc::new(Header),
        "body_or_query" => Arc::new(BodyOrQuery),
        "route" => Arc::new(Route),
        _ => return None,
    };
    Some(lookup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExtractionContextBuilder;
    use argus_core::Arguments;
    use http::{Method, Uri};

    fn run(lookup: &dyn Lookup, ctx: &crate::ExtractionContext, key: &str, default: Value) -> Value {
        let args: Arguments = [("id", "7")].into_iter().collect();
        let mut scope = CallScope::new(ctx, &args);
        lookup.lookup(&mut scope, key, &default).unwrap()
    }

    #[test]
    fn test_query_lookup() {
        let ctx = ExtractionContextBuilder::new()
            .uri(Uri::from_static("/?a=1&a=2"))
            .build();

        assert_eq!(run(&Query, &ctx, "a", Value::Null), Value::from("2"));
        assert_eq!(run(&Query, &ctx, "b", Value::Int(0)), Value::Int(0));
    }

    #[test]
    fn test_body_lookup_json_and_default() {
        let ctx = ExtractionContextBuilder::new()
            .method(Method::POST)
            .json(&serde_json::json!({"n": 5, "tags": ["a"]}))
            .build();

        assert_eq!(run(&Body, &ctx, "n", Value::Null), Value::Int(5));
        assert_eq!(run(&Body, &ctx, "tags", Value::Null), Value::list(["a"]));
        assert_eq!(run(&Body, &ctx, "missing", Value::Int(0)), Value::Int(0));
    }

    #[test]
    fn test_body_lookup_propagates_extraction_error() {
        let ctx = ExtractionContextBuilder::new()
            .method(Method::POST)
            .json(&serde_json::json!("scalar"))
            .build();
        let args = Arguments::new();
        let mut scope = CallScope::new(&ctx, &args);

        let err = Body.lookup(&mut scope, "n", &Value::Null).unwrap_err();
        assert!(matches!(err, ParamError::Extraction(_)));
    }

    #[test]
    fn test_body_or_query_precedence() {
        let ctx = ExtractionContextBuilder::new()
            .method(Method::POST)
            .uri(Uri::from_static("/?a=query&b=query"))
            .form(&[("a", "body")])
            .build();

        assert_eq!(run(&BodyOrQuery, &ctx, "a", Value::Null), Value::from("body"));
        assert_eq!(run(&BodyOrQuery, &ctx, "b", Value::Null), Value::from("query"));
        assert_eq!(run(&BodyOrQuery, &ctx, "c", Value::from("d")), Value::from("d"));
    }

    #[test]
    fn test_header_and_route_lookup() {
        let ctx = ExtractionContextBuilder::new()
            .header("x-api-key", "k1")
            .build();

        assert_eq!(run(&Header, &ctx, "X-Api-Key", Value::Null), Value::from("k1"));
        assert_eq!(run(&Route, &ctx, "id", Value::Null), Value::from("7"));
        assert_eq!(run(&Route, &ctx, "slug", Value::Null), Value::Null);
    }

    #[test]
    fn test_builtin_lookup_names() {
        for name in ["query", "body", "file", "header", "body_or_query", "route"] {
            assert!(builtin_lookup(name).is_some(), "{name}");
        }
        assert!(builtin_lookup("cookie").is_none());
    }
}
