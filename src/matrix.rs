//! Rectangular weight storage.
//!
//! A `Matrix` is a flat row-major buffer with explicit `(rows, cols)`. Weight
//! matrices use `rows = source layer size` and `cols = target layer size`, so
//! `get(s, t)` is the weight from source neuron `s` to target neuron `t`.

#[cfg(feature = "serde")]
use serde::Serialize;

#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Zero-filled `rows x cols` matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build a matrix by evaluating `f(row, col)` for every cell.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self { rows, cols, data }
    }

    /// Build from nested rows. Returns `None` if the rows are ragged.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Option<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            if row.len() != cols {
                return None;
            }
            data.extend_from_slice(row);
        }
        Some(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.index(row, col).map(|i| self.data[i])
    }

    /// Overwrite one cell. Returns `false` (and changes nothing) when out of bounds.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> bool {
        match self.index(row, col) {
            Some(i) => {
                self.data[i] = value;
                true
            }
            None => false,
        }
    }

    /// One row as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()`. Use [`Matrix::get`] for a checked read.
    #[inline]
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Mutable view of one row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()`.
    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let start = row * self.cols;
        &mut self.data[start..start + self.cols]
    }

    /// Row-major backing buffer.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Copy into nested rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows).map(|r| self.row(r).to_vec()).collect()
    }

    /// Resize to `rows x cols`.
    ///
    /// Cells whose `(row, col)` exists in both shapes keep their value; every
    /// other cell is filled by calling `fill()` in row-major order.
    pub fn resized(&self, rows: usize, cols: usize, mut fill: impl FnMut() -> f64) -> Self {
        Self::from_fn(rows, cols, |r, c| match self.get(r, c) {
            Some(v) => v,
            None => fill(),
        })
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_is_row_major() {
        let m = Matrix::from_rows(&[[0.6, -0.1], [-0.3, 0.4]]).unwrap();
        assert_eq!((m.rows(), m.cols()), (2, 2));
        assert_eq!(m.as_slice(), &[0.6, -0.1, -0.3, 0.4]);
        assert_eq!(m.get(1, 0), Some(-0.3));
        assert_eq!(m.row(0), &[0.6, -0.1]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(Matrix::from_rows(&rows).is_none());
    }

    #[test]
    fn out_of_bounds_access_is_none_and_set_is_ignored() {
        let mut m = Matrix::zeros(2, 3);
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.get(0, 3), None);
        let before = m.clone();
        assert!(!m.set(5, 5, 1.0));
        assert_eq!(m, before);
        assert!(m.set(1, 2, 4.0));
        assert_eq!(m.get(1, 2), Some(4.0));
    }

    #[test]
    fn resize_keeps_overlap_and_fills_the_rest() {
        let m = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let grown = m.resized(3, 3, || 9.0);
        assert_eq!(
            grown.to_rows(),
            vec![
                vec![1.0, 2.0, 9.0],
                vec![3.0, 4.0, 9.0],
                vec![9.0, 9.0, 9.0]
            ]
        );

        let shrunk = grown.resized(2, 2, || unreachable!("no new cells"));
        assert_eq!(shrunk, m);
    }
}
