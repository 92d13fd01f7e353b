//! Plugin implementations for different diagram types
//!
//! Each plugin implements the core traits for its input language. Regular
//! expressions are currently the only one.

pub mod regex;

pub use regex::*;
