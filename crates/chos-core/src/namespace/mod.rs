//! Linux namespace management.
//!
//! chos only ever isolates the mount table; every other namespace is
//! shared with the caller's session.

pub mod mount;
