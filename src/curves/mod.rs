//! # 桩土相互作用曲线模块
//!
//! 生成桩侧摩阻 (t-z)、桩端阻力 (q-z) 与水平抗力 (p-y) 曲线，
//! 并提供曲线插值。
//!
//! ## 子模块
//! - `axial`: t-z 与 q-z 曲线（API RP 2GEO）
//! - `lateral`: p-y 曲线（黏土 Matlock，砂土 API/Reese）
//!
//! ## 依赖关系
//! - 被 `analysis/` 和 `commands/curves.rs` 调用
//! - 使用 `models/soil.rs`

pub mod axial;
pub mod lateral;

pub use axial::{qz_curve, tz_curve};
pub use lateral::py_curve;

use crate::error::Result;
use crate::models::{Pile, SoilProfile};

/// 曲线类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveKind {
    /// 桩侧摩阻 t (kPa) - 位移 z (m)
    Tz,
    /// 桩端阻力 q (kPa) - 位移 z (m)
    Qz,
    /// 水平抗力 p (kN/m) - 挠度 y (m)
    Py,
}

impl CurveKind {
    pub fn x_label(&self) -> &'static str {
        match self {
            CurveKind::Tz | CurveKind::Qz => "Displacement z (m)",
            CurveKind::Py => "Deflection y (m)",
        }
    }

    pub fn y_label(&self) -> &'static str {
        match self {
            CurveKind::Tz => "Shaft Friction t (kPa)",
            CurveKind::Qz => "Tip Resistance q (kPa)",
            CurveKind::Py => "Lateral Resistance p (kN/m)",
        }
    }

    /// 文件名标识
    pub fn tag(&self) -> &'static str {
        match self {
            CurveKind::Tz => "tz",
            CurveKind::Qz => "qz",
            CurveKind::Py => "py",
        }
    }
}

impl std::fmt::Display for CurveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CurveKind::Tz => write!(f, "t-z"),
            CurveKind::Qz => write!(f, "q-z"),
            CurveKind::Py => write!(f, "p-y"),
        }
    }
}

/// 分段线性曲线
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Curve {
    /// (x, y) 点列
    pub points: Vec<(f64, f64)>,
}

impl Curve {
    /// 由点列构建，清理非有限值并保证 x 严格递增
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        let mut points: Vec<(f64, f64)> = points
            .into_iter()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();

        // 稳定排序
        points.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        const EPS: f64 = 1e-12;
        for k in 1..points.len() {
            if points[k].0 <= points[k - 1].0 {
                points[k].0 = points[k - 1].0 + EPS;
            }
        }

        Curve { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 线性插值，区间外取端点值
    pub fn interpolate(&self, x: f64) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let pts = &self.points;
        match pts.len() {
            1 => pts[0].1,
            n => {
                if x <= pts[0].0 {
                    return pts[0].1;
                }
                if x >= pts[n - 1].0 {
                    return pts[n - 1].1;
                }
                // 第一个 x_i >= x 的位置
                let i = pts.partition_point(|p| p.0 < x);
                let (x0, y0) = pts[i - 1];
                let (x1, y1) = pts[i];
                y0 + (y1 - y0) * (x - x0) / (x1 - x0)
            }
        }
    }

    /// x 取值范围宽度
    pub fn x_span(&self) -> f64 {
        match (self.points.first(), self.points.last()) {
            (Some(a), Some(b)) => b.0 - a.0,
            _ => 0.0,
        }
    }

    /// 在 x 处的前向割线斜率，探测步长为 x 范围的 5%
    pub fn secant_slope(&self, x: f64) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        let ds = (0.05 * self.x_span()).max(1e-8);
        (self.interpolate(x + ds) - self.interpolate(x)) / ds
    }

    /// 最大 y 值
    pub fn max_y(&self) -> f64 {
        self.points
            .iter()
            .map(|(_, y)| *y)
            .fold(0.0_f64, f64::max)
    }
}

/// 带标签的曲线（用于绘图与导出）
#[derive(Debug, Clone)]
pub struct LabeledCurve {
    pub kind: CurveKind,
    /// 土层序号（从 1 开始），桩端曲线为 None
    pub layer_index: Option<usize>,
    pub soil: String,
    pub depth_m: f64,
    pub curve: Curve,
}

impl LabeledCurve {
    pub fn title(&self) -> String {
        match self.layer_index {
            Some(i) => format!(
                "{} Curve for Layer {} ({}) at {:.2} m",
                self.kind, i, self.soil, self.depth_m
            ),
            None => format!(
                "{} Curve at Pile Tip ({}) at {:.2} m",
                self.kind, self.soil, self.depth_m
            ),
        }
    }

    /// 输出文件名主干，例如 `tz_layer1`, `qz_tip`
    pub fn file_stem(&self) -> String {
        match self.layer_index {
            Some(i) => format!("{}_layer{}", self.kind.tag(), i),
            None => format!("{}_tip", self.kind.tag()),
        }
    }
}

/// 生成全部预览曲线：每层中点处的 t-z 与 p-y，以及桩端 q-z
pub fn generate_curve_set(pile: &Pile, profile: &SoilProfile) -> Result<Vec<LabeledCurve>> {
    pile.validate()?;
    let d = pile.diameter_m;
    let mut curves = Vec::with_capacity(2 * profile.len() + 1);

    for (i, layer) in profile.layers().iter().enumerate() {
        let mid = layer.mid_depth();
        let sigma_v = profile.vertical_stress(mid);

        curves.push(LabeledCurve {
            kind: CurveKind::Tz,
            layer_index: Some(i + 1),
            soil: layer.kind.to_string(),
            depth_m: mid,
            curve: tz_curve(layer, d, sigma_v),
        });
        curves.push(LabeledCurve {
            kind: CurveKind::Py,
            layer_index: Some(i + 1),
            soil: layer.kind.to_string(),
            depth_m: mid,
            curve: py_curve(layer, d, mid),
        });
    }

    let tip = pile.length_m;
    if let Some(tip_layer) = profile.layer_at(tip) {
        curves.push(LabeledCurve {
            kind: CurveKind::Qz,
            layer_index: None,
            soil: tip_layer.kind.to_string(),
            depth_m: tip,
            curve: qz_curve(tip_layer, d, profile.vertical_stress(tip)),
        });
    }

    tracing::debug!(count = curves.len(), "generated soil spring curves");
    Ok(curves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SoilLayer;

    #[test]
    fn test_interpolate_clamps_and_interpolates() {
        let c = Curve::new(vec![(0.0, 0.0), (1.0, 10.0), (2.0, 10.0)]);
        assert_eq!(c.interpolate(-1.0), 0.0);
        assert!((c.interpolate(0.5) - 5.0).abs() < 1e-12);
        assert_eq!(c.interpolate(5.0), 10.0);
    }

    #[test]
    fn test_interpolate_degenerate_curves() {
        assert_eq!(Curve::default().interpolate(1.0), 0.0);
        assert_eq!(Curve::new(vec![(0.3, 7.0)]).interpolate(10.0), 7.0);
    }

    #[test]
    fn test_new_drops_nan_sorts_and_separates_duplicates() {
        let c = Curve::new(vec![(1.0, 1.0), (f64::NAN, 3.0), (0.0, 0.0), (1.0, 2.0)]);
        assert_eq!(c.len(), 3);
        for w in c.points.windows(2) {
            assert!(w[1].0 > w[0].0);
        }
        assert_eq!(c.points[0], (0.0, 0.0));
    }

    #[test]
    fn test_secant_slope() {
        let c = Curve::new(vec![(0.0, 0.0), (1.0, 2.0)]);
        assert!((c.secant_slope(0.2) - 2.0).abs() < 1e-9);
        // 超出末端后斜率为零
        assert_eq!(c.secant_slope(2.0), 0.0);
    }

    #[test]
    fn test_curve_set_counts() {
        let pile = Pile::new(20.0, 0.6, 30e9, 24.0);
        let profile = SoilProfile::new(vec![
            SoilLayer::clay(0.0, 8.0, 18.0, 40.0),
            SoilLayer::sand(8.0, 30.0, 19.0, 32.0),
        ]);
        let set = generate_curve_set(&pile, &profile).unwrap();
        assert_eq!(set.len(), 5);
        let tip = set.last().unwrap();
        assert_eq!(tip.kind, CurveKind::Qz);
        assert_eq!(tip.soil, "sand");
        assert_eq!(tip.file_stem(), "qz_tip");
        assert_eq!(set[0].file_stem(), "tz_layer1");
    }
}
