use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error("buffer length mismatch: expected {expected} elements, got {got}")]
    BufferLength { expected: usize, got: usize },
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },
    #[error("operation requires a square matrix, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("index ({row}, {col}) out of bounds for {rows}x{cols} matrix")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("{block_rows}x{block_cols} block at ({row_off}, {col_off}) does not fit in {rows}x{cols} matrix")]
    BlockOutOfBounds {
        row_off: usize,
        col_off: usize,
        block_rows: usize,
        block_cols: usize,
        rows: usize,
        cols: usize,
    },
    #[error("multiply dimension mismatch: [{m}x{k}] * [{k2}x{n}]")]
    MultiplyMismatch {
        m: usize,
        k: usize,
        k2: usize,
        n: usize,
    },
}

pub type Result<T> = std::result::Result<T, MatrixError>;
