//! VEX controller.
//!
//! [`VexCtl`] strings the library's operations together the way the CLI
//! uses them. Each step goes through a [`VexImplementation`], so any one of
//! them can be replaced in tests.

mod facade;
mod implementation;

pub use facade::VexCtl;
pub use implementation::{DefaultImplementation, VexImplementation};
