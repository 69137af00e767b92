//! Integration tests module
//!
//! Tests are organized by workflow.

pub mod scenarios;
