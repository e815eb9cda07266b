//! # 水平抗力 p-y 曲线
//!
//! - 黏土: Matlock (1970) 软黏土静载曲线
//! - 砂土: API RP 2GEO / Reese 双曲正切曲线
//!
//! ## 依赖关系
//! - 被 `analysis/lateral.rs`, `curves/mod.rs` 调用
//! - 使用 `models/soil.rs`

use crate::curves::Curve;
use crate::models::{SoilKind, SoilLayer};

/// 曲线采样点数
const PY_POINTS: usize = 100;
/// 最大挠度 = 0.05 D
const PY_MAX_Y_OVER_D: f64 = 0.05;
/// 水的重度 (kN/m³)
const GAMMA_WATER: f64 = 9.81;
/// Matlock 经验系数 J
const MATLOCK_J: f64 = 0.5;
/// 静止土压力系数
const K0: f64 = 0.4;

/// 砂土地基反力模量初值 k (kN/m³) 与 φ (°) 对照表
const SAND_K_TABLE: [(f64, f64); 5] = [
    (25.0, 2_700.0),
    (29.0, 6_800.0),
    (33.0, 24_400.0),
    (37.0, 61_000.0),
    (40.0, 90_000.0),
];

/// 黏土极限水平抗力 p_u (kN/m)
pub fn clay_ultimate_resistance(su_kpa: f64, gamma: f64, depth: f64, diameter: f64) -> f64 {
    let factor = (3.0 + gamma * depth / su_kpa + MATLOCK_J * depth / diameter).min(9.0);
    factor * su_kpa * diameter
}

/// 砂土有效重度：假定位于水下
fn effective_unit_weight(gamma: f64) -> f64 {
    if gamma > GAMMA_WATER {
        gamma - GAMMA_WATER
    } else {
        gamma
    }
}

/// API 砂土系数 (C1, C2, C3)
pub fn sand_coefficients(phi_deg: f64) -> (f64, f64, f64) {
    let phi = phi_deg.to_radians();
    let alpha = 0.5 * phi;
    let beta = (45.0 + 0.5 * phi_deg).to_radians();
    let ka = (45.0 - 0.5 * phi_deg).to_radians().tan().powi(2);

    let tan_b = beta.tan();
    let tan_bp = (beta - phi).tan();

    let c1 = tan_b * tan_b * alpha.tan() / tan_bp
        + K0 * (phi.tan() * beta.sin() / (alpha.cos() * tan_bp)
            + tan_b * (phi.tan() * beta.sin() - alpha.tan()));
    let c2 = tan_b / tan_bp - ka;
    let c3 = ka * (tan_b.powi(8) - 1.0) + K0 * phi.tan() * tan_b.powi(4);
    (c1, c2, c3)
}

/// 砂土极限水平抗力 p_u (kN/m)：浅层楔形破坏与深层流动破坏取小值
pub fn sand_ultimate_resistance(phi_deg: f64, gamma: f64, depth: f64, diameter: f64) -> f64 {
    let (c1, c2, c3) = sand_coefficients(phi_deg);
    let gamma_eff = effective_unit_weight(gamma);
    let shallow = (c1 * depth + c2 * diameter) * gamma_eff * depth;
    let deep = c3 * diameter * gamma_eff * depth;
    shallow.min(deep)
}

/// 砂土地基反力模量 k (kN/m³)，按 φ 线性插值
pub fn sand_subgrade_modulus(phi_deg: f64) -> f64 {
    Curve::new(SAND_K_TABLE.to_vec()).interpolate(phi_deg)
}

/// p-y 曲线：挠度 (m) - 水平抗力 (kN/m)
pub fn py_curve(layer: &SoilLayer, diameter_m: f64, depth_m: f64) -> Curve {
    let y_max = PY_MAX_Y_OVER_D * diameter_m;
    let ys = (0..PY_POINTS).map(|i| y_max * i as f64 / (PY_POINTS - 1) as f64);

    let points: Vec<(f64, f64)> = match layer.kind {
        SoilKind::Clay { su_kpa } => {
            let su = if su_kpa <= 0.0 {
                tracing::warn!(
                    su = su_kpa,
                    depth = depth_m,
                    "non-positive su in clay layer, using 1 kPa"
                );
                1.0
            } else {
                su_kpa
            };
            let eps50 = if su < 24.0 { 0.02 } else { 0.005 };
            let y_c = 2.5 * eps50 * diameter_m;
            let p_u = clay_ultimate_resistance(su, layer.gamma_knpm3, depth_m, diameter_m);
            ys.map(|y| {
                let p = if y <= 8.0 * y_c {
                    0.5 * p_u * (y / y_c).powf(1.0 / 3.0)
                } else {
                    p_u
                };
                (y, p)
            })
            .collect()
        }
        SoilKind::Sand { phi_deg } => {
            let p_u = sand_ultimate_resistance(phi_deg, layer.gamma_knpm3, depth_m, diameter_m);
            let a = (3.0 - 0.8 * depth_m / diameter_m).max(0.9);
            let k = sand_subgrade_modulus(phi_deg);
            ys.map(|y| {
                let p = if p_u > 0.0 {
                    a * p_u * (k * depth_m * y / (a * p_u)).tanh()
                } else {
                    0.0
                };
                (y, p)
            })
            .collect()
        }
    };

    Curve::new(points)
}
