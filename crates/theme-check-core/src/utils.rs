//! Helpers shared by the analyzer and checks.

pub mod disable;

#[doc(inline)]
pub use disable::{parse_directive, Directive, DisabledRanges};
