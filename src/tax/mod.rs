//! Tax calculation engines

pub mod vat;

pub use vat::*;
