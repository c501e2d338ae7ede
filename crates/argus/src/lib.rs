//! # Argus
//!
//! **Declarative request parameter pipeline**
//!
//! Endpoints declare their parameters (where each comes from, its type,
//! default, cardinality and validation rules) and Argus extracts, converts and
//! validates them before the handler runs.
//!
//! ## Quick Start
//!
//! ```rust
//! use argus::prelude::*;
//! use http::Uri;
//!
//! # tokio_test::block_on(async {
//! let list_posts = Pipeline::builder()
//!     .name("list_posts")
//!     .param(query("page").kind("int").default(1).validators("min: 1"))
//!     .param(query("tags").many(true).separator("|").validators("in: rust, go"))
//!     .handler(|args: Arguments| async move { args });
//!
//! let ctx = ExtractionContextBuilder::new()
//!     .uri(Uri::from_static("/posts?tags=rust%7Cgo"))
//!     .build();
//!
//! let args = list_posts.call(Some(&ctx), Arguments::new()).await.unwrap();
//! assert_eq!(args.get("page"), Some(&Value::Int(1)));
//! assert_eq!(args.get("tags"), Some(&Value::list(["rust", "go"])));
//! # });
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Endpoint::call(ctx, args)
//!     │
//!     ├─ for each parameter: Lookup → split (many) → Converter
//!     ├─ for each parameter: Validators
//!     └─ Handler::handle(enriched args)
//! ```
//!
//! | Crate | Concern |
//! |-------|---------|
//! | [`core`] | `Value`, `Arguments`, errors |
//! | [`validate`] | validators and the clause grammar |
//! | [`convert`] | converters and their registry |
//! | [`extract`] | request context, multipart, lookups |
//! | [`config`] | TOML/JSON configuration |
//! | [`telemetry`] | logging and metrics |

#![doc(html_root_url = "https://docs.rs/argus/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod descriptor;
mod endpoint;
mod error;
mod pipeline;

// Re-export member crates
pub use argus_config as config;
pub use argus_convert as convert;
pub use argus_core as core;
pub use argus_extract as extract;
pub use argus_telemetry as telemetry;
pub use argus_validate as validate;

pub use argus_config::{ArgusConfig, ConfigLoader};
pub use argus_convert::{Converter, ConverterRegistry};
pub use argus_core::{
    Arguments, ConversionError, ExtractionError, ParamError, UploadedFile, ValidationFailure,
    Value,
};
pub use argus_extract::{
    lookup_fn, read_multipart, CallScope, ExtractionContext, ExtractionContextBuilder, Lookup,
    MultipartConfig, PathParams,
};
pub use argus_validate::{SpecError, Validator, ValidatorRegistry};

pub use descriptor::{
    body, body_or_query, file, header, param, query, route, ParamBuilder, ParamDescriptor,
};
pub use endpoint::{Endpoint, Handler};
pub use error::DeclarationError;
pub use pipeline::{Pipeline, PipelineBuilder, DEFAULT_SEPARATOR};

/// Initializes logging and describes the pipeline metrics from `config`.
///
/// # Errors
///
/// Returns an error if the log filter is invalid or a global subscriber is
/// already installed.
pub fn init(config: &ArgusConfig) -> telemetry::TelemetryResult<()> {
    telemetry::metrics::describe_metrics();
    telemetry::init_logging(&config.logging.to_log_config())
}

/// Prelude module for convenient imports.
///
/// ```rust
/// use argus::prelude::*;
///
/// let pipeline = Pipeline::builder().param(body("name").validators("required")).build();
/// assert_eq!(pipeline.params().len(), 1);
/// ```
pub mod prelude {
    pub use crate::{
        body, body_or_query, file, header, param, query, route, Arguments, Endpoint,
        ExtractionContext, ExtractionContextBuilder, Handler, ParamError, Pipeline, Value,
    };
}
