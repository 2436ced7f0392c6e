//! Diagnostic system for the Tern front end.
//!
//! A [`Message`] is an ordered list of [`Section`]s: error, warning and note
//! texts interleaved with `Code` sections that point at source spans. Spans
//! are stored, never materialized text; [`render`] re-reads the
//! [`SourceMap`](tern_ir::SourceMap) at display time.
//!
//! # Error Guarantees
//!
//! [`ErrorGuaranteed`] is type-level proof that at least one error was
//! reported. It can only be obtained from a [`Diagnostics`] sink that holds an
//! error.

mod error_code;
mod message;
pub mod render;
mod sink;
pub mod span_utils;

pub use error_code::ErrorCode;
pub use message::{Message, Section, Severity};
pub use render::ColorMode;
pub use sink::{Diagnostics, ErrorGuaranteed};
