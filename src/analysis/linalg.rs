//! # 稠密线性方程组求解
//!
//! 封装 `nalgebra` 的 LU 分解；奇异时退化为轻度正则化的 SVD 最小二乘解。
//!
//! ## 依赖关系
//! - 被 `analysis/axial.rs`, `analysis/lateral.rs` 调用

use crate::error::{PileError, Result};

use nalgebra::{DMatrix, DVector};

/// 正则化系数（相对于对角元最大值）
const REGULARIZATION: f64 = 1e-9;

/// 求解 A x = b
pub fn solve(a: &DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>> {
    let n = a.nrows();
    if let Some(x) = a.clone().lu().solve(b) {
        if x.iter().all(|v| v.is_finite()) {
            return Ok(x);
        }
    }

    tracing::debug!(size = n, "LU solve failed, falling back to regularized least squares");

    let scale = a
        .diagonal()
        .iter()
        .map(|v| v.abs())
        .fold(0.0_f64, f64::max)
        .max(1.0);
    let regularized = a + DMatrix::<f64>::identity(n, n) * (REGULARIZATION * scale);
    let x = regularized
        .svd(true, true)
        .solve(b, f64::EPSILON)
        .map_err(|_| PileError::SingularSystem { size: n })?;

    if x.iter().all(|v| v.is_finite()) {
        Ok(x)
    } else {
        Err(PileError::SingularSystem { size: n })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_regular_system() {
        let a = DMatrix::from_row_slice(2, 2, &[4.0, 1.0, 1.0, 3.0]);
        let b = DVector::from_vec(vec![1.0, 2.0]);
        let x = solve(&a, &b).unwrap();
        let r = &a * &x - &b;
        assert!(r.amax() < 1e-12);
    }

    #[test]
    fn test_solve_singular_system_falls_back() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        let b = DVector::from_vec(vec![2.0, 2.0]);
        let x = solve(&a, &b).unwrap();
        assert!(x.iter().all(|v| v.is_finite()));
        assert!((x[0] + x[1] - 2.0).abs() < 1e-6);
    }
}
