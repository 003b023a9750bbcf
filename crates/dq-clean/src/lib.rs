//! Cleaning of data-quality detections.
//!
//! A [`Strategy`] rewrites the rows or cells a [`Detection`] flagged. Cells
//! that were not flagged are never changed.

pub mod accessor;
pub mod cleaner;
pub mod ops;
pub mod strategy;

use polars::prelude::DataFrame;

use dq_detect::Detection;
use dq_model::Result;

pub use accessor::{Frame, FrameMut};
pub use cleaner::Cleaner;
pub use strategy::{ReplaceFn, Replacement, Strategy};

/// Returns a copy of `data` cleaned with `strategy`.
pub fn clean(strategy: &Strategy, detection: &Detection, data: &DataFrame) -> Result<DataFrame> {
    Cleaner::new(strategy, detection).clean(data)
}

pub fn clean_in_place(strategy: &Strategy, detection: &Detection, data: &mut DataFrame) -> Result<()> {
    Cleaner::new(strategy, detection).clean_in_place(data)
}
