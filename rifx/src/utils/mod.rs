//! Supporting infrastructure.
//!
//! Provides the random-access byte stream the scanners run over and the
//! error types shared by the crate.

pub mod errors;
pub mod stream;
