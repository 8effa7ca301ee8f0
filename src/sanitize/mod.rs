//! Character normalization for file and directory names.

mod sanitizer;

pub use sanitizer::sanitize;
