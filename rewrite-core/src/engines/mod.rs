// rewrite-core/src/engines/mod.rs
//! This module contains substitution engine implementations.
//!
//! Each engine is a separate file within this directory and implements the
//! `SubstitutionEngine` trait. `template` is the `%`-escaped template language
//! used by default.

pub mod template;
