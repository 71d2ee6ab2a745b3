use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;
use crate::scalar::Scalar;

/// Matrix product: `out = lhs * rhs`.
///
/// `lhs` is `[m x k]`, `rhs` is `[k x n]`; `out` is resized to `[m x n]`
/// under the usual [`Matrix::resize`] rule, so a scratch matrix with `m * n`
/// elements is reused as-is. Operands are widened into the output element
/// type before multiplying, which allows e.g. `f16 x f16 -> f32`.
///
/// Each cell is a plain left-to-right sum seeded with the `j = 0` product.
/// `lhs.cols() == rhs.rows()` is only checked in debug builds; see
/// [`try_multiply`].
pub fn multiply<T, U, V>(lhs: &Matrix<'_, T>, rhs: &Matrix<'_, U>, out: &mut Matrix<'_, V>)
where
    T: Copy + Into<V>,
    U: Copy + Into<V>,
    V: Scalar,
{
    debug_assert_eq!(
        lhs.cols(),
        rhs.rows(),
        "multiply: [{}x{}] * [{}x{}]",
        lhs.rows(),
        lhs.cols(),
        rhs.rows(),
        rhs.cols()
    );

    let m = lhs.rows();
    let k = lhs.cols();
    let n = rhs.cols();
    out.resize(m, n);

    let term = |i: usize, j: usize, rhs_col: &[U]| -> V {
        let a: V = lhs[(i, j)].into();
        let b: V = rhs_col[j].into();
        a * b
    };

    for i in 0..m {
        for col in 0..n {
            let rhs_col = rhs.get_col(col);
            let mut acc = if k == 0 { V::zero() } else { term(i, 0, rhs_col) };
            for j in 1..k {
                acc += term(i, j, rhs_col);
            }
            out[(i, col)] = acc;
        }
    }
}

/// Checked form of [`multiply`]. `out` is left untouched on error.
pub fn try_multiply<T, U, V>(
    lhs: &Matrix<'_, T>,
    rhs: &Matrix<'_, U>,
    out: &mut Matrix<'_, V>,
) -> Result<()>
where
    T: Copy + Into<V>,
    U: Copy + Into<V>,
    V: Scalar,
{
    if lhs.cols() != rhs.rows() {
        return Err(MatrixError::MultiplyMismatch {
            m: lhs.rows(),
            k: lhs.cols(),
            k2: rhs.rows(),
            n: rhs.cols(),
        });
    }
    multiply(lhs, rhs, out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn brute_force(lhs: &Matrix<'_, f64>, rhs: &Matrix<'_, f64>) -> Vec<f64> {
        let mut expected = Vec::new();
        for col in 0..rhs.cols() {
            for row in 0..lhs.rows() {
                let mut sum = 0.0;
                for j in 0..lhs.cols() {
                    sum += lhs[(row, j)] * rhs[(j, col)];
                }
                expected.push(sum);
            }
        }
        expected
    }

    #[test]
    fn test_multiply_basic() {
        let a = Matrix::from_row_major(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = Matrix::from_row_major(3, 2, &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
        let mut c: Matrix<'_, f64> = Matrix::new();
        multiply(&a, &b, &mut c);
        assert_eq!(c, Matrix::from_row_major(2, 2, &[58.0, 64.0, 139.0, 154.0]));
        assert_eq!(c.as_slice(), brute_force(&a, &b).as_slice());
    }

    #[test]
    fn test_multiply_identity() {
        let a = Matrix::from_row_major(2, 3, &[1.5, -2.0, 3.25, 4.0, 0.5, -6.0]);

        let mut left: Matrix<'_, f64> = Matrix::with_shape(2, 2);
        left.set_identity();
        let mut right: Matrix<'_, f64> = Matrix::with_shape(3, 3);
        right.set_identity();

        let mut out: Matrix<'_, f64> = Matrix::new();
        multiply(&left, &a, &mut out);
        assert_eq!(out, a);

        multiply(&a, &right, &mut out);
        assert_eq!(out, a);
    }

    #[test]
    fn test_multiply_rectangular_chain() {
        let a = Matrix::from_row_major(1, 4, &[1.0, 2.0, 3.0, 4.0]);
        let b = Matrix::from_row_major(4, 3, &[
            0.5, 1.0, -1.0, //
            2.0, 0.0, 1.0, //
            -3.0, 1.5, 2.0, //
            1.0, 1.0, 1.0,
        ]);
        let mut c: Matrix<'_, f64> = Matrix::new();
        multiply(&a, &b, &mut c);
        assert_eq!(c.rows(), 1);
        assert_eq!(c.cols(), 3);
        let expected = brute_force(&a, &b);
        for (got, want) in c.as_slice().iter().zip(expected.iter()) {
            assert_relative_eq!(*got, *want);
        }
    }

    #[test]
    fn test_multiply_mixed_precision() {
        let a = Matrix::from_row_major(1, 2, &[0.1f32, 0.2]);
        let b = Matrix::from_row_major(2, 1, &[3.0f32, 4.0]);
        let mut c: Matrix<'_, f64> = Matrix::new();
        multiply(&a, &b, &mut c);
        let expected = 0.1f32 as f64 * 3.0 + 0.2f32 as f64 * 4.0;
        assert_relative_eq!(c[(0, 0)], expected);
    }

    #[cfg(feature = "f16")]
    #[test]
    fn test_multiply_f16_into_f32() {
        use half::f16;
        let a = Matrix::from_row_major(2, 2, &[1.0f32, 2.0, 3.0, 4.0].map(f16::from_f32));
        let b = Matrix::from_row_major(2, 2, &[5.0f32, 6.0, 7.0, 8.0].map(f16::from_f32));
        let mut c: Matrix<'_, f32> = Matrix::new();
        multiply(&a, &b, &mut c);
        assert_eq!(c, Matrix::from_row_major(2, 2, &[19.0, 22.0, 43.0, 50.0]));
    }

    #[test]
    fn test_multiply_reuses_same_size_output() {
        let a = Matrix::from_row_major(2, 2, &[1i32, 2, 3, 4]);
        let b = Matrix::from_row_major(2, 2, &[5i32, 6, 7, 8]);
        let mut raw = vec![0i64; 4];
        {
            // 4x1 scratch has the same element count as the 2x2 product.
            let mut out = Matrix::wrap(4, 1, &mut raw);
            multiply(&a, &b, &mut out);
            assert!(!out.is_owner());
            assert_eq!(out.rows(), 2);
            assert_eq!(out.cols(), 2);
        }
        // Column-major [[19, 22], [43, 50]].
        assert_eq!(raw, vec![19, 43, 22, 50]);
    }

    #[test]
    fn test_multiply_reallocates_output() {
        let a = Matrix::from_row_major(2, 1, &[2u32, 3]);
        let b = Matrix::from_row_major(1, 3, &[1u32, 10, 100]);
        let mut raw = vec![0u64; 2];
        let mut out = Matrix::wrap(1, 2, &mut raw);
        multiply(&a, &b, &mut out);
        assert!(out.is_owner());
        assert_eq!(out, Matrix::from_row_major(2, 3, &[2u64, 20, 200, 3, 30, 300]));
    }

    #[test]
    fn test_multiply_inner_dimension_zero() {
        let a: Matrix<'_, f64> = Matrix::with_shape(2, 0);
        let b: Matrix<'_, f64> = Matrix::with_shape(0, 3);
        let mut c: Matrix<'_, f64> = Matrix::new();
        multiply(&a, &b, &mut c);
        assert_eq!(c.rows(), 2);
        assert_eq!(c.cols(), 3);
        assert_eq!(c.as_slice(), &[0.0; 6]);
    }

    #[test]
    fn test_try_multiply_mismatch() {
        let a = Matrix::from_row_major(1, 3, &[1.0, 2.0, 3.0]);
        let b = Matrix::from_row_major(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let mut out: Matrix<'_, f64> = Matrix::with_shape(1, 1);
        out[(0, 0)] = 42.0;
        assert_eq!(
            try_multiply(&a, &b, &mut out),
            Err(MatrixError::MultiplyMismatch { m: 1, k: 3, k2: 2, n: 2 })
        );
        assert_eq!(out[(0, 0)], 42.0);
        assert!(try_multiply(&a, &a.clone(), &mut out).is_err());
    }
}
