//! # chos-common
//!
//! Shared error definitions, configuration models, and constants used
//! across the chos workspace.
//!
//! This crate is the leaf of the dependency graph. It performs no kernel
//! calls; everything that touches the mount table lives in `chos-core`.

pub mod config;
pub mod constants;
pub mod error;
