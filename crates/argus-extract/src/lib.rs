//! # Argus Extract
//!
//! Raw request access for the Argus parameter pipeline.
//!
//! This crate provides:
//!
//! - [`ExtractionContext`]: read-only view of one request (query, headers,
//!   body fields, files, path parameters)
//! - [`read_multipart`]: `multipart/form-data` reader built on `multer`
//! - [`CallScope`]: per-call cache that lookups read through
//! - [`Lookup`]: where a parameter's raw value comes from
//!
//! ## Lookup strategies
//!
//! | Strategy | Config name | Reads |
//! |----------|-------------|-------|
//! | [`lookup::Query`] | `query` | last value of the query key |
//! | [`lookup::Body`] | `body` | form field or JSON object member |
//! | [`lookup::File`] | `file` | uploaded file(s) |
//! | [`lookup::Header`] | `header` | header, case-insensitive |
//! | [`lookup::BodyOrQuery`] | `body_or_query` | body, then query |
//! | [`lookup::Route`] | `route` | router-resolved argument |
//!
//! ## Example
//!
//! ```rust
//! use argus_core::{Arguments, Value};
//! use argus_extract::{lookup, CallScope, ExtractionContextBuilder, Lookup};
//! use http::Uri;
//!
//! let ctx = ExtractionContextBuilder::new()
//!     .uri(Uri::from_static("/search?q=rust"))
//!     .build();
//! let route_args = Arguments::new();
//! let mut scope = CallScope::new(&ctx, &route_args);
//!
//! let q = lookup::Query.lookup(&mut scope, "q", &Value::Null).unwrap();
//! assert_eq!(q, Value::from("rust"));
//! ```

#![doc(html_root_url = "https://docs.rs/argus-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
pub mod lookup;
mod multipart;
mod params;
mod scope;

pub use context::{BodyArguments, ExtractionContext, ExtractionContextBuilder, Files};
pub use lookup::{builtin_lookup, lookup_fn, Lookup, LookupFn, SharedLookup};
pub use multipart::{
    is_multipart, read_multipart, MultipartConfig, MultipartForm, DEFAULT_MAX_FIELD_SIZE,
    DEFAULT_MAX_BODY_SIZE as DEFAULT_MAX_MULTIPART_SIZE,
};
pub use params::PathParams;
pub use scope::{CallScope, DEFAULT_MAX_BODY_SIZE};
