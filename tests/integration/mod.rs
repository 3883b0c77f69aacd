//! Integration tests for querybook.
//!
//! Cover the built-in example catalogs end to end and drive the binary.

pub mod builtin_test;
pub mod cli_test;
pub mod lint_test;
