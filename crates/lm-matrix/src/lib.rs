//! `lm-matrix` - Column-major dense matrix and matrix product for benchmark kernels.
//!
//! This crate provides:
//! - A `Matrix` type that either owns its buffer or borrows an external one
//! - Resize/copy/move operations that keep ownership consistent
//! - Row, column, block and identity mutators
//! - A generic `multiply` over mixed element types
//! - A `Scalar` capability for element types (including `half::f16`)

pub mod error;
pub mod matrix;
pub mod multiply;
pub mod scalar;
pub mod storage;

// Re-export primary types at the crate root for convenience.
pub use error::{MatrixError, Result};
pub use matrix::Matrix;
pub use multiply::{multiply, try_multiply};
pub use scalar::Scalar;
pub use storage::Buffer;
