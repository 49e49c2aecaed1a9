//! CSV bulk import of master data.
//!
//! Declarative schemas, a pure-logic row validator, and the export /
//! template helpers for the reverse direction. No database or network
//! access; callers supply the existing-records snapshot and submit the
//! validated records themselves.

pub mod export;
pub mod parser;
pub mod pipeline;
pub mod rules;
pub mod schema;
pub mod validator;
