//! Handlers and the endpoints that wrap them.
//!
//! An [`Endpoint`] binds a [`Pipeline`] to a [`Handler`]. Each call runs the
//! pipeline and hands the enriched [`Arguments`] to the handler. Pipeline
//! failures come back as [`ParamError`]; whatever the handler returns,
//! including its own errors, is passed through untouched.

use std::future::Future;
use std::sync::Arc;

use argus_core::{Arguments, ParamError};
use argus_extract::ExtractionContext;
use tracing::trace;

use crate::pipeline::Pipeline;

/// A function that receives the extracted arguments.
///
/// Implemented for every `Fn(Arguments) -> impl Future` closure, so async
/// closures and functions can be used directly.
///
/// # Example
///
/// ```rust
/// use argus::{Arguments, Handler};
///
/// struct Greeter;
///
/// impl Handler for Greeter {
///     type Output = String;
///
///     async fn handle(&self, args: Arguments) -> String {
///         let name = args.get("name").and_then(|v| v.as_str()).unwrap_or("world");
///         format!("Hello, {name}!")
///     }
/// }
/// ```
pub trait Handler: Send + Sync + 'static {
    /// What the handler returns.
    type Output: Send;

    /// Handles one call.
    fn handle(&self, args: Arguments) -> impl Future<Output = Self::Output> + Send;
}

impl<F, Fut> Handler for F
where
    F: Fn(Arguments) -> Fut + Send + Sync + 'static,
    Fut: Future + Send,
    Fut::Output: Send,
{
    type Output = Fut::Output;

    fn handle(&self, args: Arguments) -> impl Future<Output = Self::Output> + Send {
        self(args)
    }
}

/// A pipeline bound to its handler.
///
/// # Example
///
/// ```rust
/// use argus::{query, Arguments, ExtractionContextBuilder, Pipeline};
/// use http::Uri;
///
/// # tokio_test::block_on(async {
/// let endpoint = Pipeline::builder()
///     .param(query("a"))
///     .handler(|args: Arguments| async move { args.get("a").cloned() });
///
/// let ctx = ExtractionContextBuilder::new()
///     .uri(Uri::from_static("/?a=1"))
///     .build();
/// let out = endpoint.call(Some(&ctx), Arguments::new()).await.unwrap();
/// assert_eq!(out, Some("1".into()));
/// # });
/// ```
#[derive(Debug)]
pub struct Endpoint<H> {
    pipeline: Arc<Pipeline>,
    handler: H,
}

impl<H: Handler> Endpoint<H> {
    /// Binds `pipeline` to `handler`.
    #[must_use]
    pub fn new(pipeline: impl Into<Arc<Pipeline>>, handler: H) -> Self {
        Self {
            pipeline: pipeline.into(),
            handler,
        }
    }

    /// The compiled pipeline.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// The wrapped handler.
    pub fn inner(&self) -> &H {
        &self.handler
    }

    /// Runs the pipeline, then the handler.
    ///
    /// Without a request context the pipeline is skipped and the handler
    /// receives `args` unchanged.
    ///
    /// # Errors
    ///
    /// Returns a [`ParamError`] when a parameter is rejected; the handler is
    /// not called in that case.
    pub async fn call(
        &self,
        ctx: Option<&ExtractionContext>,
        args: Arguments,
    ) -> Result<H::Output, ParamError> {
        let Some(ctx) = ctx else {
            trace!(endpoint = %self.pipeline.name(), "no request context, skipping parameter pipeline");
            return Ok(self.handler.handle(args).await);
        };

        let args = self.pipeline.extract(ctx, args)?;
        Ok(self.handler.handle(args).await)
    }

    /// Calls the endpoint with the context's path parameters as initial arguments.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn dispatch(&self, ctx: &ExtractionContext) -> Result<H::Output, ParamError> {
        let args: Arguments = ctx.path_params().iter().collect();
        self.call(Some(ctx), args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{query, route};
    use argus_core::Value;
    use argus_extract::ExtractionContextBuilder;
    use http::Uri;

    struct Echo;

    impl Handler for Echo {
        type Output = Arguments;

        async fn handle(&self, args: Arguments) -> Arguments {
            args
        }
    }

    #[tokio::test]
    async fn test_handler_struct() {
        let endpoint = Pipeline::builder().param(query("a")).handler(Echo);
        let ctx = ExtractionContextBuilder::new()
            .uri(Uri::from_static("/?a=x"))
            .build();

        let args = endpoint.call(Some(&ctx), Arguments::new()).await.unwrap();
        assert_eq!(args.get("a"), Some(&Value::from("x")));
    }

    #[tokio::test]
    async fn test_call_without_context_bypasses_pipeline() {
        let endpoint = Pipeline::builder()
            .param(query("a").validators("required"))
            .handler(Echo);
        let args: Arguments = [("b", 1)].into_iter().collect();

        let out = endpoint.call(None, args).await.unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.get("b"), Some(&Value::Int(1)));
        assert!(out.get("a").is_none());
    }

    #[tokio::test]
    async fn test_rejection_skips_handler() {
        let endpoint = Pipeline::builder()
            .param(query("a").validators("required"))
            .handler(|_args: Arguments| async { panic!("handler must not run") });
        let ctx = ExtractionContextBuilder::new().build();

        let err = endpoint.call(Some(&ctx), Arguments::new()).await.unwrap_err();
        assert_eq!(err.validator_code(), Some("required"));
    }

    #[tokio::test]
    async fn test_dispatch_seeds_route_arguments() {
        let endpoint = Pipeline::builder()
            .param(route("id").kind("int"))
            .handler(Echo);
        let ctx = ExtractionContextBuilder::new()
            .uri(Uri::from_static("/users/42"))
            .path_param("id", "42")
            .build();

        let args = endpoint.dispatch(&ctx).await.unwrap();
        assert_eq!(args.get("id"), Some(&Value::Int(42)));
    }

    #[tokio::test]
    async fn test_handler_errors_pass_through() {
        let endpoint = Pipeline::builder()
            .handler(|_args: Arguments| async { Err::<(), _>("business failure") });
        let ctx = ExtractionContextBuilder::new().build();

        let result = endpoint.call(Some(&ctx), Arguments::new()).await;
        assert!(matches!(result, Ok(Err("business failure"))));
    }
}
