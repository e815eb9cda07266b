//! # 单桩分析模块
//!
//! ## 子模块
//! - `axial`: 轴向荷载-沉降（t-z / q-z 弹簧）
//! - `lateral`: 水平荷载（p-y 弹簧，非线性 Winkler 地基梁）
//! - `linalg`: 稠密线性方程组求解
//!
//! ## 依赖关系
//! - 被 `commands/analyze/`, `commands/batch.rs` 调用
//! - 使用 `curves/`, `models/`

pub mod axial;
pub mod lateral;
pub mod linalg;

pub use axial::{run_axial, AxialResults};
pub use lateral::{run_lateral, LateralProfile, LateralResults};
