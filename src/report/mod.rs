//! CSV table output.

pub mod writer;

pub use writer::*;
