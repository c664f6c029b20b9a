//! # pantry-error
//!
//! Unified error handling for pantry.
//!
//! ## Design
//!
//! - **ErrorKind**: what went wrong (e.g. `InvalidRequest`, `BackendUnreachable`)
//! - **ErrorStatus**: whether trying again could help (Permanent, Temporary, Persistent)
//! - **Error Context**: key/value pairs that locate the failure
//! - **Error Source**: the wrapped underlying error, never leaked as a raw type
//!
//! ## Usage
//!
//! ```rust
//! use pantry_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::BackendFailed, "model 'llama3.2' not found")
//!         .with_operation("ollama::complete")
//!         .with_context("status", "404")
//!         .with_context("model", "llama3.2"))
//! }
//! ```
//!
//! ## Principles
//!
//! - Library functions return `Result<T, pantry_error::Error>`
//! - External errors are wrapped with `set_source(err)`
//! - An error is handled once; callers further up only append context

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

/// Result type alias using the pantry Error
pub type Result<T> = std::result::Result<T, Error>;
