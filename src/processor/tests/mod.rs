//! Integration tests for the processor module
//!
//! Tests the complete batch pipeline against temporary directories of
//! coordinate CSV files.

pub mod error_handling;
