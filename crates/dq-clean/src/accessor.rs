//! Detection and cleaning entry points over a borrowed frame.

use polars::prelude::DataFrame;

use dq_detect::{Detection, Detector};
use dq_model::Result;

use crate::cleaner::Cleaner;
use crate::strategy::Strategy;

/// Read-only view of a frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    data: &'a DataFrame,
}

impl<'a> Frame<'a> {
    pub fn new(data: &'a DataFrame) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &'a DataFrame {
        self.data
    }

    /// Configures and fits `method` on this frame, then applies it.
    pub fn detect(&self, method: &str, options: serde_json::Value) -> Result<Detection> {
        dq_detect::detect(method, self.data, options)
    }

    /// Applies an already fitted detector without re-estimating it.
    pub fn detect_with(&self, detector: &Detector) -> Result<Detection> {
        dq_detect::replay(detector, self.data)
    }

    pub fn clean(&self, strategy: &Strategy, detection: &Detection) -> Result<DataFrame> {
        Cleaner::new(strategy, detection).clean(self.data)
    }
}

/// Mutable view of a frame, for in-place cleaning.
#[derive(Debug)]
pub struct FrameMut<'a> {
    data: &'a mut DataFrame,
}

impl<'a> FrameMut<'a> {
    pub fn new(data: &'a mut DataFrame) -> Self {
        Self { data }
    }

    pub fn as_frame(&self) -> Frame<'_> {
        Frame::new(self.data)
    }

    pub fn detect(&self, method: &str, options: serde_json::Value) -> Result<Detection> {
        self.as_frame().detect(method, options)
    }

    pub fn clean_in_place(&mut self, strategy: &Strategy, detection: &Detection) -> Result<()> {
        Cleaner::new(strategy, detection).clean_in_place(self.data)
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::*;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_detect_then_clean() {
        let df = df!("x" => [1.0, 5.0, -6.0, 100.0, 10.0]).unwrap();
        let frame = Frame::new(&df);
        let detection = frame.detect("bounded", json!({"lower": 0, "upper": 10})).unwrap();
        let cleaned = frame.clean(&Strategy::ToNa, &detection).unwrap();
        assert_eq!(cleaned.column("x").unwrap().null_count(), 2);
        assert_eq!(frame.data().column("x").unwrap().null_count(), 0);
    }

    #[test]
    fn test_clean_in_place_mutates() {
        let mut df = df!("x" => [1.0, 5.0, -6.0, 100.0, 10.0]).unwrap();
        let mut frame = FrameMut::new(&mut df);
        let detection = frame.detect("bounded", json!({"lower": 0, "upper": 10})).unwrap();
        frame.clean_in_place(&Strategy::Drop, &detection).unwrap();
        assert_eq!(df.height(), 3);
    }
}
