//! Immutable 3-D array buffer shared between docks.
//!
//! A `Stack` is a `(frame, row, column)` array of `f32`. Cloning a stack is
//! cheap: duplicated docks hold the same `Arc` buffer, and the statistics
//! used for colour defaults are computed once per buffer.

use std::fmt;
use std::sync::Arc;

use ndarray::{Array3, ArrayD, ArrayView2, Ix3};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewerError};

/// `(frames, height, width)` of a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StackShape {
    pub frames: usize,
    pub height: usize,
    pub width: usize,
}

impl StackShape {
    pub fn new(frames: usize, height: usize, width: usize) -> Self {
        Self { frames, height, width }
    }

    /// Shape of a `(time, y, x)` array without taking it; other ranks are rejected.
    pub fn of(array: &ArrayD<f32>) -> Result<Self> {
        match *array.shape() {
            [frames, height, width] => Ok(Self { frames, height, width }),
            _ => Err(ViewerError::NotThreeDimensional {
                ndim: array.ndim(),
                shape: array.shape().to_vec(),
            }),
        }
    }

    pub fn as_array(&self) -> [usize; 3] {
        [self.frames, self.height, self.width]
    }

    /// Number of values in one frame.
    pub fn frame_len(&self) -> usize {
        self.height * self.width
    }

    pub fn len(&self) -> usize {
        self.frames * self.frame_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for StackShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.frames, self.height, self.width)
    }
}

/// NaN-ignoring summary of a stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackStats {
    pub min: f32,
    pub max: f32,
    pub p1: f32,
    pub p50: f32,
    pub p99: f32,
}

impl StackStats {
    /// Fallback when every value is NaN (or the stack is empty).
    const EMPTY: StackStats = StackStats {
        min: 0.0,
        max: 1.0,
        p1: 0.0,
        p50: 0.5,
        p99: 1.0,
    };

    fn compute(data: &Array3<f32>) -> Self {
        let mut values: Vec<f32> = data.iter().copied().filter(|v| !v.is_nan()).collect();
        if values.is_empty() {
            return Self::EMPTY;
        }
        values.sort_unstable_by(f32::total_cmp);
        Self {
            min: values[0],
            max: values[values.len() - 1],
            p1: percentile_sorted(&values, 1.0),
            p50: percentile_sorted(&values, 50.0),
            p99: percentile_sorted(&values, 99.0),
        }
    }
}

/// Linear-interpolation percentile of an already sorted, NaN-free slice.
pub fn percentile_sorted(sorted: &[f32], q: f64) -> f32 {
    match sorted.len() {
        0 => f32::NAN,
        1 => sorted[0],
        n => {
            let rank = (q.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            let frac = rank - lo as f64;
            let (a, b) = (sorted[lo] as f64, sorted[hi] as f64);
            if lo == hi || a == b {
                sorted[lo]
            } else {
                (a + (b - a) * frac) as f32
            }
        }
    }
}

#[derive(Clone)]
pub struct Stack {
    data: Arc<Array3<f32>>,
    stats: Arc<OnceCell<StackStats>>,
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("shape", &self.shape())
            .field("shared", &Arc::strong_count(&self.data))
            .finish()
    }
}

impl Stack {
    /// Build a stack from a dynamically-shaped array; anything other than
    /// exactly three dimensions is rejected.
    pub fn new(array: ArrayD<f32>) -> Result<Self> {
        let ndim = array.ndim();
        let shape = array.shape().to_vec();
        let array = array
            .into_dimensionality::<Ix3>()
            .map_err(|_| ViewerError::NotThreeDimensional { ndim, shape })?;
        Ok(Self::from_array3(array))
    }

    pub fn from_array3(array: Array3<f32>) -> Self {
        Self {
            data: Arc::new(array),
            stats: Arc::new(OnceCell::new()),
        }
    }

    pub fn shape(&self) -> StackShape {
        let (frames, height, width) = self.data.dim();
        StackShape { frames, height, width }
    }

    pub fn data(&self) -> &Array3<f32> {
        &self.data
    }

    /// True when both stacks view the very same buffer.
    pub fn shares_buffer_with(&self, other: &Stack) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// One `(row, column)` slice. Out-of-range frames clamp to the last one.
    pub fn frame(&self, index: usize) -> ArrayView2<'_, f32> {
        let last = self.shape().frames.saturating_sub(1);
        self.data.index_axis(ndarray::Axis(0), index.min(last))
    }

    /// Stored sample, or `None` outside the stack.
    pub fn sample(&self, frame: usize, y: i64, x: i64) -> Option<f32> {
        if y < 0 || x < 0 {
            return None;
        }
        self.data.get((frame, y as usize, x as usize)).copied()
    }

    /// Value lookup that never fails: anything out of bounds is NaN.
    pub fn value_at(&self, frame: usize, y: i64, x: i64) -> f32 {
        self.sample(frame, y, x).unwrap_or(f32::NAN)
    }

    pub fn stats(&self) -> StackStats {
        *self.stats.get_or_init(|| StackStats::compute(&self.data))
    }

    /// `(min, max)` ignoring NaN.
    pub fn bounds(&self) -> (f32, f32) {
        let stats = self.stats();
        (stats.min, stats.max)
    }

    /// Step for spin controls: a hundredth of the data range.
    pub fn step_size(&self) -> f32 {
        let (min, max) = self.bounds();
        let range = max - min;
        if range.is_finite() && range > 0.0 {
            range / 100.0
        } else {
            1.0
        }
    }
}

impl From<Array3<f32>> for Stack {
    fn from(array: Array3<f32>) -> Self {
        Stack::from_array3(array)
    }
}

impl TryFrom<ArrayD<f32>> for Stack {
    type Error = ViewerError;

    fn try_from(array: ArrayD<f32>) -> Result<Self> {
        Stack::new(array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array, IxDyn};

    fn ramp(frames: usize, height: usize, width: usize) -> Stack {
        let n = frames * height * width;
        let data = Array::from_iter((0..n).map(|v| v as f32))
            .into_shape_with_order((frames, height, width))
            .unwrap();
        Stack::from(data)
    }

    #[test]
    fn rejects_non_3d() {
        let flat = ArrayD::<f32>::zeros(IxDyn(&[4, 5]));
        match Stack::new(flat) {
            Err(ViewerError::NotThreeDimensional { ndim, shape }) => {
                assert_eq!(ndim, 2);
                assert_eq!(shape, vec![4, 5]);
            }
            other => panic!("expected NotThreeDimensional, got {:?}", other),
        }
        let four = ArrayD::<f32>::zeros(IxDyn(&[1, 2, 3, 4]));
        assert!(Stack::new(four).is_err());
    }

    #[test]
    fn shape_of_borrowed_array() {
        let arr = ArrayD::<f32>::zeros(IxDyn(&[2, 3, 4]));
        assert_eq!(StackShape::of(&arr).unwrap(), StackShape::new(2, 3, 4));
        let flat = ArrayD::<f32>::zeros(IxDyn(&[6, 4]));
        assert!(matches!(
            StackShape::of(&flat),
            Err(ViewerError::NotThreeDimensional { ndim: 2, .. })
        ));
    }

    #[test]
    fn accepts_3d_dynamic() {
        let arr = ArrayD::<f32>::zeros(IxDyn(&[2, 3, 4]));
        let stack = Stack::new(arr).unwrap();
        assert_eq!(stack.shape(), StackShape::new(2, 3, 4));
        assert_eq!(stack.shape().frame_len(), 12);
    }

    #[test]
    fn value_lookup_out_of_bounds_is_nan() {
        let stack = ramp(2, 3, 4);
        assert_eq!(stack.value_at(1, 0, 0), 12.0);
        assert_eq!(stack.value_at(0, 2, 3), 11.0);
        assert!(stack.value_at(0, 3, 0).is_nan());
        assert!(stack.value_at(0, 0, 4).is_nan());
        assert!(stack.value_at(0, -1, 0).is_nan());
        assert!(stack.value_at(5, 0, 0).is_nan());
        assert_eq!(stack.sample(0, 2, 3), Some(11.0));
        assert_eq!(stack.sample(0, -1, 0), None);
    }

    #[test]
    fn stats_ignore_nan() {
        let mut data = Array3::<f32>::zeros((1, 1, 5));
        for (i, v) in [1.0, f32::NAN, 3.0, 5.0, 2.0].into_iter().enumerate() {
            data[(0, 0, i)] = v;
        }
        let stats = Stack::from(data).stats();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        // sorted [1, 2, 3, 5]: median between 2 and 3
        assert_relative_eq!(stats.p50, 2.5);
    }

    #[test]
    fn all_nan_falls_back() {
        let data = Array3::<f32>::from_elem((1, 2, 2), f32::NAN);
        let stack = Stack::from(data);
        assert_eq!(stack.bounds(), (0.0, 1.0));
        assert_relative_eq!(stack.step_size(), 0.01);
    }

    #[test]
    fn percentile_interpolates() {
        let sorted: Vec<f32> = (0..=100).map(|v| v as f32).collect();
        assert_relative_eq!(percentile_sorted(&sorted, 1.0), 1.0);
        assert_relative_eq!(percentile_sorted(&sorted, 99.0), 99.0);
        assert_relative_eq!(percentile_sorted(&[0.0, 10.0], 25.0), 2.5);
        assert!(percentile_sorted(&[], 50.0).is_nan());
    }

    #[test]
    fn clones_share_buffer_and_stats() {
        let a = ramp(1, 2, 2);
        let b = a.clone();
        assert!(a.shares_buffer_with(&b));
        assert_eq!(a.stats(), b.stats());
        let c = ramp(1, 2, 2);
        assert!(!a.shares_buffer_with(&c));
    }

    #[test]
    fn flat_stack_step_is_one() {
        let stack = Stack::from(Array3::<f32>::from_elem((1, 2, 2), 7.0));
        assert_eq!(stack.step_size(), 1.0);
    }
}
