//! # Argus Core
//!
//! Core types shared by every crate of the Argus parameter pipeline.
//!
//! - [`Value`] - Dynamic value carried from raw request data to handler arguments
//! - [`Arguments`] - Ordered keyword-argument map handed to handlers and validators
//! - [`UploadedFile`] - File handle produced by multipart parsing
//! - [`ParamError`] - Failure type returned when a parameter is rejected
//! - [`ExtractionError`] - Failure reading raw request data (body, multipart)
//!
//! ## Example
//!
//! ```rust
//! use argus_core::{Arguments, Value};
//!
//! let mut args = Arguments::new();
//! args.insert("page", 2);
//! args.insert("tags", vec!["a", "b"]);
//!
//! assert_eq!(args.get("page").and_then(Value::as_i64), Some(2));
//! assert_eq!(args.get("tags").and_then(Value::as_list).map(<[Value]>::len), Some(2));
//! ```

#![doc(html_root_url = "https://docs.rs/argus-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod arguments;
mod error;
mod extraction;
mod file;
mod value;

pub use arguments::Arguments;
pub use error::{ConversionError, ParamError, ParamResult, ValidationFailure};
pub use extraction::ExtractionError;
pub use file::UploadedFile;
pub use value::Value;
