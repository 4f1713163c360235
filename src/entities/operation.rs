//! Binary operations that derive a new stack from two originals.

use ndarray::Zip;
use serde::{Deserialize, Serialize};

use crate::entities::stack::Stack;
use crate::error::{Result, ViewerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Difference,
    Division,
    Sum,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 3] = [BinaryOp::Difference, BinaryOp::Division, BinaryOp::Sum];

    pub fn description(self) -> &'static str {
        match self {
            BinaryOp::Difference => "Difference",
            BinaryOp::Division => "Division",
            BinaryOp::Sum => "Sum",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Difference => "-",
            BinaryOp::Division => "/",
            BinaryOp::Sum => "+",
        }
    }

    #[inline]
    pub fn apply(self, a: f32, b: f32) -> f32 {
        match self {
            BinaryOp::Difference => a - b,
            BinaryOp::Division => a / b,
            BinaryOp::Sum => a + b,
        }
    }

    /// Title of the stack derived from `a_title <op> b_title`.
    pub fn derived_title(self, a_title: &str, b_title: &str) -> String {
        format!("{} {} {}", a_title, self.symbol(), b_title)
    }

    /// Elementwise evaluation. Shapes must match; any NaN or infinity in the
    /// result rejects the whole operation.
    pub fn evaluate(self, a_title: &str, a: &Stack, b_title: &str, b: &Stack) -> Result<Stack> {
        if a.shape() != b.shape() {
            return Err(ViewerError::ShapeMismatch {
                expected: a.shape(),
                found: b.shape(),
            });
        }

        let result = Zip::from(a.data())
            .and(b.data())
            .map_collect(|&x, &y| self.apply(x, y));

        let non_finite = result.iter().filter(|v| !v.is_finite()).count();
        if non_finite > 0 {
            return Err(ViewerError::NonFiniteResult {
                title: self.derived_title(a_title, b_title),
                count: non_finite,
            });
        }
        Ok(Stack::from(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn filled(v: f32) -> Stack {
        Stack::from(Array3::from_elem((2, 2, 3), v))
    }

    #[test]
    fn titles_are_reproducible() {
        assert_eq!(BinaryOp::Difference.derived_title("A", "B"), "A - B");
        assert_eq!(BinaryOp::Division.derived_title("A", "B"), "A / B");
        assert_eq!(BinaryOp::Sum.derived_title("Random A", "Random B"), "Random A + Random B");
    }

    #[test]
    fn evaluates_elementwise() {
        let out = BinaryOp::Difference
            .evaluate("a", &filled(5.0), "b", &filled(2.0))
            .unwrap();
        assert!(out.data().iter().all(|&v| v == 3.0));
        let out = BinaryOp::Division
            .evaluate("a", &filled(5.0), "b", &filled(2.0))
            .unwrap();
        assert!(out.data().iter().all(|&v| v == 2.5));
    }

    #[test]
    fn division_by_zero_is_rejected() {
        let mut b = Array3::from_elem((2, 2, 3), 1.0f32);
        b[(1, 0, 2)] = 0.0;
        let err = BinaryOp::Division
            .evaluate("A", &filled(1.0), "B", &Stack::from(b))
            .unwrap_err();
        match err {
            ViewerError::NonFiniteResult { title, count } => {
                assert_eq!(title, "A / B");
                assert_eq!(count, 1);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn nan_input_is_rejected() {
        let mut a = Array3::from_elem((2, 2, 3), 1.0f32);
        a[(0, 0, 0)] = f32::NAN;
        assert!(
            BinaryOp::Sum
                .evaluate("A", &Stack::from(a), "B", &filled(1.0))
                .is_err()
        );
    }

    #[test]
    fn mismatched_shapes_are_rejected() {
        let other = Stack::from(Array3::from_elem((1, 2, 3), 1.0f32));
        assert!(matches!(
            BinaryOp::Sum.evaluate("A", &filled(1.0), "B", &other),
            Err(ViewerError::ShapeMismatch { .. })
        ));
    }
}
