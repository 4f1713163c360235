//! Threshold rules: a comparison operator plus a scalar cutoff.
//!
//! A rule never touches the stack; it only changes what a dock displays. The
//! thresholded image is 1.0 where the predicate holds and 0.0 elsewhere
//! (NaN compares false, so it displays as 0.0).

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThresholdOp {
    Greater,
    Less,
    GreaterOrEqual,
    LessOrEqual,
    Equal,
}

impl ThresholdOp {
    pub const ALL: [ThresholdOp; 5] = [
        ThresholdOp::Greater,
        ThresholdOp::Less,
        ThresholdOp::GreaterOrEqual,
        ThresholdOp::LessOrEqual,
        ThresholdOp::Equal,
    ];

    pub fn description(self) -> &'static str {
        match self {
            ThresholdOp::Greater => "Greater than",
            ThresholdOp::Less => "Less than",
            ThresholdOp::GreaterOrEqual => "Greater or equal to",
            ThresholdOp::LessOrEqual => "Less or equal to",
            ThresholdOp::Equal => "Equal to",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ThresholdOp::Greater => ">",
            ThresholdOp::Less => "<",
            ThresholdOp::GreaterOrEqual => ">=",
            ThresholdOp::LessOrEqual => "<=",
            ThresholdOp::Equal => "==",
        }
    }

    #[inline]
    pub fn holds(self, value: f32, cutoff: f32) -> bool {
        match self {
            ThresholdOp::Greater => value > cutoff,
            ThresholdOp::Less => value < cutoff,
            ThresholdOp::GreaterOrEqual => value >= cutoff,
            ThresholdOp::LessOrEqual => value <= cutoff,
            ThresholdOp::Equal => value == cutoff,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub op: ThresholdOp,
    pub cutoff: f32,
}

impl ThresholdRule {
    pub fn new(op: ThresholdOp, cutoff: f32) -> Self {
        Self { op, cutoff }
    }

    /// Display value of a single sample under this rule.
    #[inline]
    pub fn apply_value(&self, value: f32) -> f32 {
        if self.op.holds(value, self.cutoff) { 1.0 } else { 0.0 }
    }

    pub fn apply(&self, frame: ArrayView2<'_, f32>) -> Array2<f32> {
        frame.mapv(|v| self.apply_value(v))
    }

    /// Label shown next to the cutoff control.
    pub fn label(&self) -> String {
        format!("Highlight values {}", self.op.description().to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn operators_compare_against_cutoff() {
        let cases = [
            (ThresholdOp::Greater, [0.0, 0.0, 1.0]),
            (ThresholdOp::Less, [1.0, 0.0, 0.0]),
            (ThresholdOp::GreaterOrEqual, [0.0, 1.0, 1.0]),
            (ThresholdOp::LessOrEqual, [1.0, 1.0, 0.0]),
            (ThresholdOp::Equal, [0.0, 1.0, 0.0]),
        ];
        for (op, expected) in cases {
            let rule = ThresholdRule::new(op, 2.0);
            let got = [1.0, 2.0, 3.0].map(|v| rule.apply_value(v));
            assert_eq!(got, expected, "operator {}", op.symbol());
        }
    }

    #[test]
    fn nan_never_passes() {
        for op in ThresholdOp::ALL {
            assert_eq!(ThresholdRule::new(op, 0.0).apply_value(f32::NAN), 0.0);
        }
    }

    #[test]
    fn applies_per_frame() {
        let frame = array![[1.0f32, 5.0], [3.0, -2.0]];
        let out = ThresholdRule::new(ThresholdOp::Greater, 2.0).apply(frame.view());
        assert_eq!(out, array![[0.0, 1.0], [1.0, 0.0]]);
        // source untouched
        assert_eq!(frame[(0, 1)], 5.0);
    }

    #[test]
    fn label_uses_description() {
        let rule = ThresholdRule::new(ThresholdOp::GreaterOrEqual, 1.0);
        assert_eq!(rule.label(), "Highlight values greater or equal to");
    }
}
