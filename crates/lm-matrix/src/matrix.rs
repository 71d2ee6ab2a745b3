use std::fmt;
use std::ops::{Index, IndexMut};

use crate::error::{MatrixError, Result};
use crate::scalar::Scalar;
use crate::storage::Buffer;

/// A dense, column-major matrix that either owns its storage or borrows it.
///
/// Element `(row, col)` lives at flat offset `col * rows + row`, so every
/// column is a contiguous run of `rows` elements. Shape preconditions of the
/// mutating operations are only checked in debug builds; the `try_*`
/// variants check them always and report a [`MatrixError`] instead.
#[derive(Debug)]
pub struct Matrix<'a, T> {
    rows: usize,
    cols: usize,
    buffer: Buffer<'a, T>,
}

impl<'a, T> Matrix<'a, T> {
    /// Create an empty 0x0 owning matrix.
    pub fn new() -> Self {
        Matrix {
            rows: 0,
            cols: 0,
            buffer: Buffer::default(),
        }
    }

    /// Wrap an external column-major buffer without copying it.
    ///
    /// The matrix does not own `data`; writes go straight through to it.
    ///
    /// # Panics
    /// Panics if `data.len() != rows * cols`.
    pub fn wrap(rows: usize, cols: usize, data: &'a mut [T]) -> Self {
        assert_eq!(
            data.len(),
            rows * cols,
            "buffer length {} does not match {}x{} matrix",
            data.len(),
            rows,
            cols
        );
        Matrix {
            rows,
            cols,
            buffer: Buffer::Borrowed(data),
        }
    }

    /// Checked form of [`Matrix::wrap`].
    pub fn try_wrap(rows: usize, cols: usize, data: &'a mut [T]) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(MatrixError::BufferLength {
                expected: rows * cols,
                got: data.len(),
            });
        }
        Ok(Self::wrap(rows, cols, data))
    }

    /// Take ownership of a column-major vector without copying it.
    ///
    /// # Panics
    /// Panics if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Self {
        assert_eq!(
            data.len(),
            rows * cols,
            "buffer length {} does not match {}x{} matrix",
            data.len(),
            rows,
            cols
        );
        Matrix {
            rows,
            cols,
            buffer: Buffer::Owned(data),
        }
    }

    /// Checked form of [`Matrix::from_vec`].
    pub fn try_from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(MatrixError::BufferLength {
                expected: rows * cols,
                got: data.len(),
            });
        }
        Ok(Self::from_vec(rows, cols, data))
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of elements (`rows * cols`).
    pub fn size(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Returns true if this matrix releases its buffer when dropped.
    pub fn is_owner(&self) -> bool {
        self.buffer.is_owned()
    }

    /// The whole buffer in column-major order.
    pub fn as_slice(&self) -> &[T] {
        self.buffer.as_slice()
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.buffer.as_mut_slice()
    }

    // The only place the column-major addressing rule is spelled out.
    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        col * self.rows + row
    }

    /// Returns the element at `(row, col)`, or `None` if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.as_slice().get(self.offset(row, col))
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        if row < self.rows && col < self.cols {
            let off = self.offset(row, col);
            self.as_mut_slice().get_mut(off)
        } else {
            None
        }
    }

    /// Returns the element at `(row, col)` without any bounds checking.
    ///
    /// # Safety
    /// `row < self.rows()` and `col < self.cols()` must hold.
    #[inline]
    pub unsafe fn get_unchecked(&self, row: usize, col: usize) -> &T {
        let off = self.offset(row, col);
        // SAFETY: the caller guarantees the index lies inside the matrix,
        // and the buffer always holds rows * cols elements.
        unsafe { self.as_slice().get_unchecked(off) }
    }

    /// Mutable form of [`Matrix::get_unchecked`].
    ///
    /// # Safety
    /// `row < self.rows()` and `col < self.cols()` must hold.
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, row: usize, col: usize) -> &mut T {
        let off = self.offset(row, col);
        // SAFETY: see `get_unchecked`.
        unsafe { self.as_mut_slice().get_unchecked_mut(off) }
    }

    /// Contiguous view of column `i`.
    pub fn get_col(&self, i: usize) -> &[T] {
        let start = self.offset(0, i);
        &self.as_slice()[start..start + self.rows]
    }

    /// Mutable contiguous view of column `i`.
    pub fn get_col_mut(&mut self, i: usize) -> &mut [T] {
        let start = self.offset(0, i);
        let rows = self.rows;
        &mut self.as_mut_slice()[start..start + rows]
    }

    /// Checked form of [`Matrix::get_col`].
    pub fn try_get_col(&self, i: usize) -> Result<&[T]> {
        if i >= self.cols {
            return Err(MatrixError::IndexOutOfBounds {
                row: 0,
                col: i,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.get_col(i))
    }

    /// Move the contents out, leaving this matrix empty and non-owning.
    pub fn take(&mut self) -> Matrix<'a, T> {
        std::mem::replace(
            self,
            Matrix {
                rows: 0,
                cols: 0,
                buffer: Buffer::detached(),
            },
        )
    }

    /// Move-assign: release the current buffer if owned, then take over the
    /// buffer, shape and ownership of `other`, which is left empty and
    /// non-owning.
    pub fn move_from(&mut self, other: &mut Matrix<'a, T>) {
        *self = other.take();
    }

    /// Swap element `(i, j)` with `(j, i)` for every `i > j`.
    ///
    /// Only meaningful for square matrices.
    pub fn transpose_in_place(&mut self) {
        debug_assert!(
            self.is_square(),
            "transpose_in_place on {}x{} matrix",
            self.rows,
            self.cols
        );
        for j in 0..self.cols {
            for i in j + 1..self.rows {
                let a = self.offset(i, j);
                let b = self.offset(j, i);
                self.as_mut_slice().swap(a, b);
            }
        }
    }

    pub fn try_transpose_in_place(&mut self) -> Result<()> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }
        self.transpose_in_place();
        Ok(())
    }
}

impl<T: Clone> Matrix<'_, T> {
    /// Build an owning matrix from elements listed row by row.
    ///
    /// # Panics
    /// Panics if `data.len() != rows * cols`.
    pub fn from_row_major(rows: usize, cols: usize, data: &[T]) -> Matrix<'static, T> {
        assert_eq!(
            data.len(),
            rows * cols,
            "buffer length {} does not match {}x{} matrix",
            data.len(),
            rows,
            cols
        );
        let col_major = (0..cols)
            .flat_map(|c| (0..rows).map(move |r| data[r * cols + c].clone()))
            .collect();
        Matrix::from_vec(rows, cols, col_major)
    }

    /// Detach from any borrowed storage, copying it if necessary.
    pub fn into_owned(self) -> Matrix<'static, T> {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            buffer: Buffer::Owned(self.buffer.into_owned()),
        }
    }

    /// Copy-assign: take the shape and contents of `other`.
    ///
    /// The target always ends up owning. A borrowing target gets a fresh
    /// buffer and leaves the memory it wrapped untouched.
    pub fn assign(&mut self, other: &Matrix<'_, T>) {
        match &mut self.buffer {
            Buffer::Owned(v) if v.len() == other.size() => {
                v.clone_from_slice(other.as_slice());
            }
            buf => {
                if !buf.is_owned() {
                    tracing::debug!(
                        rows = other.rows,
                        cols = other.cols,
                        "copy-assign converts borrowed matrix to owned"
                    );
                }
                *buf = Buffer::Owned(other.as_slice().to_vec());
            }
        }
        self.rows = other.rows;
        self.cols = other.cols;
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: T) {
        self.as_mut_slice().fill(value);
    }

    /// Bulk-copy `size()` elements from `data`, in column-major order.
    pub fn set(&mut self, data: &[T]) {
        let n = self.size();
        self.as_mut_slice().clone_from_slice(&data[..n]);
    }

    pub fn set_row(&mut self, i: usize, value: T) {
        for col in 0..self.cols {
            let off = self.offset(i, col);
            self.as_mut_slice()[off] = value.clone();
        }
    }

    pub fn set_col(&mut self, i: usize, value: T) {
        self.get_col_mut(i).fill(value);
    }

    /// Copy `rows()` elements from `data` into column `i`.
    pub fn set_col_from(&mut self, i: usize, data: &[T]) {
        let rows = self.rows;
        self.get_col_mut(i).clone_from_slice(&data[..rows]);
    }

    /// Copy all of `block` into the region whose top-left corner is
    /// `(row_off, col_off)`.
    ///
    /// The region must fit inside this matrix; this is only checked in
    /// debug builds (see [`Matrix::try_set_block`]).
    pub fn set_block(&mut self, row_off: usize, col_off: usize, block: &Matrix<'_, T>) {
        debug_assert!(
            row_off + block.rows <= self.rows && col_off + block.cols <= self.cols,
            "{}x{} block at ({}, {}) overflows {}x{} matrix",
            block.rows,
            block.cols,
            row_off,
            col_off,
            self.rows,
            self.cols
        );
        for col in 0..block.cols {
            let start = self.offset(row_off, col_off + col);
            self.as_mut_slice()[start..start + block.rows].clone_from_slice(block.get_col(col));
        }
    }

    pub fn try_set_block(
        &mut self,
        row_off: usize,
        col_off: usize,
        block: &Matrix<'_, T>,
    ) -> Result<()> {
        if row_off + block.rows > self.rows || col_off + block.cols > self.cols {
            return Err(MatrixError::BlockOutOfBounds {
                row_off,
                col_off,
                block_rows: block.rows,
                block_cols: block.cols,
                rows: self.rows,
                cols: self.cols,
            });
        }
        self.set_block(row_off, col_off, block);
        Ok(())
    }
}

impl<T: Scalar> Matrix<'_, T> {
    /// Allocate an owning `rows x cols` matrix of zeros.
    pub fn with_shape(rows: usize, cols: usize) -> Self {
        Matrix {
            rows,
            cols,
            buffer: Buffer::Owned(vec![T::zero(); rows * cols]),
        }
    }

    /// Change the shape to `rows x cols`.
    ///
    /// If the element count is unchanged the buffer, including its contents
    /// and ownership, is kept and simply read under the new shape. Otherwise
    /// the old buffer is released (if owned) and replaced by a new owned,
    /// zeroed one.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        if rows * cols != self.size() {
            tracing::trace!(
                from_rows = self.rows,
                from_cols = self.cols,
                rows,
                cols,
                owned = self.is_owner(),
                "reallocating matrix buffer"
            );
            self.buffer = Buffer::Owned(vec![T::zero(); rows * cols]);
        }
        self.rows = rows;
        self.cols = cols;
    }

    /// Write ones on the diagonal and zeros elsewhere.
    ///
    /// The matrix must be square; see [`Matrix::try_set_identity`].
    pub fn set_identity(&mut self) {
        debug_assert!(
            self.is_square(),
            "set_identity on {}x{} matrix",
            self.rows,
            self.cols
        );
        for col in 0..self.cols {
            for row in 0..self.rows {
                let off = self.offset(row, col);
                self.as_mut_slice()[off] = if row == col { T::one() } else { T::zero() };
            }
        }
    }

    pub fn try_set_identity(&mut self) -> Result<()> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }
        self.set_identity();
        Ok(())
    }

    pub fn scale_row(&mut self, i: usize, value: T) {
        for col in 0..self.cols {
            let off = self.offset(i, col);
            self.as_mut_slice()[off] *= value;
        }
    }

    pub fn scale_col(&mut self, i: usize, value: T) {
        for x in self.get_col_mut(i) {
            *x *= value;
        }
    }

    /// Elementwise `self += other`.
    ///
    /// Only the element counts must agree; this is checked in debug builds.
    pub fn add(&mut self, other: &Matrix<'_, T>) {
        debug_assert_eq!(self.size(), other.size(), "add: element count mismatch");
        for (x, &y) in self.as_mut_slice().iter_mut().zip(other.as_slice()) {
            *x += y;
        }
    }

    pub fn try_add(&mut self, other: &Matrix<'_, T>) -> Result<()> {
        if self.size() != other.size() {
            return Err(MatrixError::ShapeMismatch {
                expected: (self.rows, self.cols),
                got: (other.rows, other.cols),
            });
        }
        self.add(other);
        Ok(())
    }
}

impl<T> Default for Matrix<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Matrix<'_, T> {
    /// Deep copy into a new owning matrix, whatever the source's ownership.
    fn clone(&self) -> Self {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            buffer: Buffer::Owned(self.as_slice().to_vec()),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign(source);
    }
}

impl<T: PartialEq> PartialEq<Matrix<'_, T>> for Matrix<'_, T> {
    /// Shape and contents; ownership is ignored.
    fn eq(&self, other: &Matrix<'_, T>) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.as_slice() == other.as_slice()
    }
}

impl<T> Index<(usize, usize)> for Matrix<'_, T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        &self.as_slice()[self.offset(row, col)]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<'_, T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        let off = self.offset(row, col);
        &mut self.as_mut_slice()[off]
    }
}

impl<T: fmt::Display> fmt::Display for Matrix<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            if row > 0 {
                writeln!(f)?;
            }
            write!(f, "[")?;
            for col in 0..self.cols {
                if col > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self[(row, col)])?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}
