//! # 轴向荷载传递曲线
//!
//! t-z（桩侧摩阻-位移）与 q-z（桩端阻力-位移）曲线。
//! 归一化形状取自 API RP 2GEO (2011)。
//!
//! ## 依赖关系
//! - 被 `analysis/axial.rs`, `curves/mod.rs` 调用
//! - 使用 `models/soil.rs`

use crate::curves::Curve;
use crate::models::{SoilKind, SoilLayer};

/// 黏土 t-z 归一化位移 z/D
const CLAY_TZ_Z_OVER_D: [f64; 8] = [0.0, 0.0016, 0.0031, 0.0057, 0.0080, 0.0100, 0.0200, 0.1];
/// 黏土 t/t_max，峰后残余强度 0.8
const CLAY_TZ_T_RATIO: [f64; 8] = [0.0, 0.30, 0.50, 0.75, 0.90, 1.00, 0.80, 0.80];

/// 砂土 t-z 位移 (m)，与桩径无关
const SAND_TZ_Z: [f64; 6] = [0.0, 0.00025, 0.001, 0.0025, 0.01, 0.025];
const SAND_TZ_T_RATIO: [f64; 6] = [0.0, 0.10, 0.30, 0.50, 0.80, 1.00];

/// q-z 归一化位移 z/D（黏土与砂土相同）
const QZ_Z_OVER_D: [f64; 8] = [0.0, 0.0005, 0.002, 0.005, 0.01, 0.02, 0.05, 0.10];
const QZ_Q_RATIO: [f64; 8] = [0.0, 0.10, 0.30, 0.50, 0.70, 0.90, 1.00, 1.00];

/// 砂土侧压力系数（开口打入桩）
const SAND_K: f64 = 0.8;
/// 桩土界面摩擦角折减 (°)
const SAND_DELTA_REDUCTION_DEG: f64 = 5.0;
/// 桩端阻力上限 (kPa)
const MAX_TIP_RESISTANCE_KPA: f64 = 50_000.0;

/// 黏土侧摩阻系数 α (API)
pub fn clay_alpha(su_kpa: f64, sigma_v_kpa: f64) -> f64 {
    if sigma_v_kpa <= 0.0 || su_kpa <= 0.0 {
        return 1.0;
    }
    let psi = su_kpa / sigma_v_kpa;
    let alpha = if psi <= 1.0 {
        0.5 * psi.powf(-0.5)
    } else {
        0.5 * psi.powf(-0.25)
    };
    alpha.min(1.0)
}

/// 极限桩侧摩阻 t_max (kPa)
pub fn unit_shaft_friction(layer: &SoilLayer, sigma_v_kpa: f64) -> f64 {
    match layer.kind {
        SoilKind::Clay { su_kpa } => clay_alpha(su_kpa, sigma_v_kpa) * su_kpa,
        SoilKind::Sand { phi_deg } => {
            let delta = (phi_deg - SAND_DELTA_REDUCTION_DEG).to_radians();
            SAND_K * sigma_v_kpa * delta.tan()
        }
    }
}

/// 砂土承载力系数 Nq = e^(π tanφ) tan²(45° + φ/2)
pub fn bearing_factor_nq(phi_deg: f64) -> f64 {
    let phi = phi_deg.to_radians();
    let t = (std::f64::consts::FRAC_PI_4 + 0.5 * phi).tan();
    (std::f64::consts::PI * phi.tan()).exp() * t * t
}

/// 极限桩端阻力 q_max (kPa)
pub fn unit_end_bearing(layer: &SoilLayer, sigma_v_kpa: f64) -> f64 {
    match layer.kind {
        SoilKind::Clay { su_kpa } => 9.0 * su_kpa,
        SoilKind::Sand { phi_deg } => {
            (bearing_factor_nq(phi_deg) * sigma_v_kpa).min(MAX_TIP_RESISTANCE_KPA)
        }
    }
}

/// t-z 曲线：位移 (m) - 桩侧摩阻 (kPa)
///
/// `sigma_v_kpa` 为该深度处的竖向上覆应力。
pub fn tz_curve(layer: &SoilLayer, diameter_m: f64, sigma_v_kpa: f64) -> Curve {
    let t_max = unit_shaft_friction(layer, sigma_v_kpa);
    match layer.kind {
        SoilKind::Clay { .. } => Curve::new(
            CLAY_TZ_Z_OVER_D
                .iter()
                .zip(CLAY_TZ_T_RATIO.iter())
                .map(|(zd, r)| (zd * diameter_m, r * t_max))
                .collect(),
        ),
        SoilKind::Sand { .. } => Curve::new(
            SAND_TZ_Z
                .iter()
                .zip(SAND_TZ_T_RATIO.iter())
                .map(|(z, r)| (*z, r * t_max))
                .collect(),
        ),
    }
}

/// q-z 曲线：位移 (m) - 桩端阻力 (kPa)
pub fn qz_curve(layer: &SoilLayer, diameter_m: f64, sigma_v_kpa: f64) -> Curve {
    let q_max = unit_end_bearing(layer, sigma_v_kpa);
    Curve::new(
        QZ_Z_OVER_D
            .iter()
            .zip(QZ_Q_RATIO.iter())
            .map(|(zd, r)| (zd * diameter_m, r * q_max))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clay_alpha_limits() {
        // su/σv = 0.25 -> α = 0.5 * 2 = 1.0
        assert!((clay_alpha(25.0, 100.0) - 1.0).abs() < 1e-12);
        // su/σv = 4 -> α = 0.5 * 4^-0.25
        assert!((clay_alpha(400.0, 100.0) - 0.5 / 2f64.sqrt()).abs() < 1e-12);
        // 浅层：σv = 0
        assert_eq!(clay_alpha(40.0, 0.0), 1.0);
        // 极软：α 上限 1.0
        assert_eq!(clay_alpha(1.0, 100.0), 1.0);
    }

    #[test]
    fn test_clay_tz_peak_and_residual() {
        let layer = SoilLayer::clay(0.0, 10.0, 18.0, 50.0);
        let sigma_v = 18.0 * 5.0;
        let c = tz_curve(&layer, 1.0, sigma_v);
        let t_max = clay_alpha(50.0, sigma_v) * 50.0;
        assert_eq!(c.len(), 8);
        assert!((c.interpolate(0.01) - t_max).abs() < 1e-9);
        assert!((c.interpolate(1.0) - 0.8 * t_max).abs() < 1e-9);
        assert!((c.max_y() - t_max).abs() < 1e-9);
    }

    #[test]
    fn test_sand_tz_uses_absolute_displacement() {
        let layer = SoilLayer::sand(0.0, 10.0, 19.0, 35.0);
        let a = tz_curve(&layer, 0.5, 100.0);
        let b = tz_curve(&layer, 2.0, 100.0);
        assert_eq!(a.points, b.points);
        let expected = 0.8 * 100.0 * 30f64.to_radians().tan();
        assert!((a.interpolate(0.025) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_nq_reference_value() {
        // φ = 30°: Nq ≈ 18.4
        assert!((bearing_factor_nq(30.0) - 18.40).abs() < 0.05);
    }

    #[test]
    fn test_qz_caps_end_bearing() {
        let clay = SoilLayer::clay(0.0, 30.0, 18.0, 100.0);
        let c = qz_curve(&clay, 1.0, 500.0);
        assert!((c.interpolate(0.1) - 900.0).abs() < 1e-9);
        assert!((c.interpolate(0.005) - 450.0).abs() < 1e-9);

        let sand = SoilLayer::sand(0.0, 300.0, 20.0, 40.0);
        let c = qz_curve(&sand, 1.0, 20.0 * 250.0);
        assert_eq!(c.max_y(), MAX_TIP_RESISTANCE_KPA);
    }
}
