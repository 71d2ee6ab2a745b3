use std::ops::{Add, AddAssign, Mul, MulAssign};

use num_traits::{One, Zero};

/// Numeric capability required of matrix elements.
///
/// Anything with additive and multiplicative identities and the four
/// arithmetic operators below qualifies, so plain floats and integers work
/// alongside extended scalars such as `half::f16` (with the `f16` feature).
pub trait Scalar:
    Copy + Zero + One + Add<Output = Self> + Mul<Output = Self> + AddAssign + MulAssign
{
}

impl<T> Scalar for T where
    T: Copy + Zero + One + Add<Output = T> + Mul<Output = T> + AddAssign + MulAssign
{
}
