// rewrite/src/lib.rs
//! # Rewrite CLI Application
//!
//! This crate provides the command-line front end for the `rewrite-core`
//! engine: load a YAML rule configuration, then rewrite arguments or stdin
//! lines with one of its contexts.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;

pub use commands::run;
