//! Error types and result aliases for erafmt.
//!
//! Structural problems in ERA basic code are reported as
//! [`Diagnostic`](crate::diagnostic::Diagnostic) values, not errors. This
//! alias covers I/O, encoding and configuration failures.

use anyhow::Result as AnyhowResult;

pub type Result<T> = AnyhowResult<T>;
