// rewrite/src/ui/mod.rs
//! Terminal output helpers.

pub mod output_format;
