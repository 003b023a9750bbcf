//! Stateless checks behind the literal detectors.

pub mod strings;
pub mod values;

pub use strings::{Cast, CastParser, PatternMatcher};
