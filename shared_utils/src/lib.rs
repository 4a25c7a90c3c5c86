//! Small helpers shared by the workspace crates.

#![deny(missing_docs)]

pub mod env;
