//! # 轴向荷载-沉降分析
//!
//! 将桩身离散为等长单元，桩侧为 t-z 弹簧、桩端为 q-z 弹簧，
//! 分级加载并在每级荷载下用 Newton-Raphson 迭代求解节点位移。
//!
//! ## 算法概述
//! 1. 节点 z_i = i·L/n，位移 w 以向下为正
//! 2. 节点力平衡：N_{i-1/2} - N_{i+1/2} - q_i·l_i = 0，
//!    其中 N_{i+1/2} = EA(w_i - w_{i+1})/dz，桩顶 N = P，桩端 N = Q(w_n)
//! 3. 桩侧摩阻由节点位移 w_i 在 t-z 曲线上调动，桩端仅受压
//! 4. 单步位移增量限幅，保证软化曲线下的稳定性
//!
//! ## 依赖关系
//! - 被 `commands/analyze/axial.rs`, `commands/batch.rs` 调用
//! - 使用 `curves/axial.rs`, `analysis/linalg.rs`

use crate::analysis::linalg;
use crate::curves::{qz_curve, tz_curve, Curve};
use crate::error::{PileError, Result};
use crate::models::{AnalysisSettings, Pile, SoilProfile};

use nalgebra::{DMatrix, DVector};

/// 轴向求解参数
#[derive(Debug, Clone)]
pub struct AxialSettings {
    pub segments: usize,
    pub load_steps: usize,
    pub max_iterations: usize,
    pub tolerance_m: f64,
    pub max_step_m: f64,
}

impl Default for AxialSettings {
    fn default() -> Self {
        AnalysisSettings::default().into()
    }
}

impl From<&AnalysisSettings> for AxialSettings {
    fn from(s: &AnalysisSettings) -> Self {
        AxialSettings {
            segments: s.segments.max(10),
            load_steps: s.axial_load_steps.max(2),
            max_iterations: s.axial_max_iterations.max(1),
            tolerance_m: s.axial_tolerance_m,
            max_step_m: s.axial_max_step_m,
        }
    }
}

impl From<AnalysisSettings> for AxialSettings {
    fn from(s: AnalysisSettings) -> Self {
        (&s).into()
    }
}

/// 单级荷载结果
#[derive(Debug, Clone)]
pub struct AxialStep {
    /// 桩顶荷载 (kN)
    pub load_kn: f64,
    /// 桩顶沉降 (m)
    pub head_settlement_m: f64,
    pub converged: bool,
    pub iterations: usize,
}

/// 最后一级荷载下沿桩身的分布
#[derive(Debug, Clone, Default)]
pub struct AxialProfile {
    /// 深度 (m)，0 为桩顶
    pub z_m: Vec<f64>,
    /// 位移 (m)
    pub settlement_m: Vec<f64>,
    /// 自桩顶累计的桩侧摩阻力 (N)
    pub shaft_resistance_n: Vec<f64>,
    /// 桩身轴力 (N)
    pub axial_force_n: Vec<f64>,
}

/// 极限承载力估算
#[derive(Debug, Clone, Copy, Default)]
pub struct AxialCapacity {
    pub shaft_kn: f64,
    pub toe_kn: f64,
    pub total_kn: f64,
    pub self_weight_kn: f64,
}

/// 轴向分析结果
#[derive(Debug, Clone)]
pub struct AxialResults {
    pub steps: Vec<AxialStep>,
    pub profile: AxialProfile,
    /// 最后一级荷载下的桩端阻力 (N)
    pub toe_resistance_n: f64,
    pub capacity: AxialCapacity,
}

impl AxialResults {
    pub fn loads_kn(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.load_kn).collect()
    }

    pub fn settlements_m(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.head_settlement_m).collect()
    }

    /// 最大沉降 (m) 及其对应荷载 (kN)
    pub fn max_settlement(&self) -> (f64, f64) {
        self.steps
            .iter()
            .max_by(|a, b| {
                a.head_settlement_m
                    .abs()
                    .partial_cmp(&b.head_settlement_m.abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|s| (s.head_settlement_m, s.load_kn))
            .unwrap_or((0.0, 0.0))
    }

    pub fn all_converged(&self) -> bool {
        self.steps.iter().all(|s| s.converged)
    }
}

/// 轴向求解器
pub struct AxialSolver {
    settings: AxialSettings,
    n: usize,
    dz: f64,
    /// EA (N)
    ea: f64,
    area: f64,
    perimeter: f64,
    /// 每个节点的 t-z 曲线 (kPa)
    tz: Vec<Curve>,
    /// 每个节点的桩侧分担长度 (m)
    tributary: Vec<f64>,
    /// 桩端 q-z 曲线 (kPa)
    qz: Curve,
    self_weight_kn: f64,
}

impl AxialSolver {
    /// 创建求解器并预先生成各节点的荷载传递曲线
    pub fn new(pile: &Pile, profile: &SoilProfile, settings: AxialSettings) -> Result<Self> {
        pile.validate()?;
        if profile.is_empty() {
            return Err(PileError::MissingData("add soil layers first".to_string()));
        }

        let n = settings.segments.max(10);
        let length = pile.length_m;
        let dz = length / n as f64;
        let d = pile.diameter_m;

        let mut tz = Vec::with_capacity(n + 1);
        let mut tributary = Vec::with_capacity(n + 1);
        for i in 0..=n {
            let z = i as f64 * dz;
            let curve = match profile.layer_at(z) {
                Some(layer) => tz_curve(layer, d, profile.vertical_stress(z)),
                None => Curve::default(),
            };
            tz.push(curve);
            tributary.push(if i == 0 || i == n { 0.5 * dz } else { dz });
        }

        let qz = match profile.layer_at(length) {
            Some(layer) => qz_curve(layer, d, profile.vertical_stress(length)),
            None => Curve::default(),
        };

        Ok(AxialSolver {
            settings: AxialSettings { segments: n, ..settings },
            n,
            dz,
            ea: pile.axial_stiffness(),
            area: pile.area(),
            perimeter: pile.perimeter(),
            tz,
            tributary,
            qz,
            self_weight_kn: pile.self_weight_kn(),
        })
    }

    /// 节点深度
    pub fn nodes(&self) -> Vec<f64> {
        (0..=self.n).map(|i| i as f64 * self.dz).collect()
    }

    /// 桩侧节点力 (N) 及其对 w_i 的导数
    fn shaft_force(&self, i: usize, w: f64) -> (f64, f64) {
        let curve = &self.tz[i];
        let scale = 1e3 * self.perimeter * self.tributary[i];
        let t = w.signum() * curve.interpolate(w.abs());
        let dt = curve.secant_slope(w.abs());
        (t * scale, dt * scale)
    }

    /// 桩端阻力 (N) 及其导数；上拔时为零
    fn toe_force(&self, w: f64) -> (f64, f64) {
        if w < 0.0 {
            return (0.0, 0.0);
        }
        let scale = 1e3 * self.area;
        (
            self.qz.interpolate(w) * scale,
            self.qz.secant_slope(w) * scale,
        )
    }

    /// 节点残差与 Jacobian
    fn assemble(&self, w: &DVector<f64>, p: f64) -> (DVector<f64>, DMatrix<f64>) {
        let n = self.n;
        let k = self.ea / self.dz;
        let mut r = DVector::zeros(n + 1);
        let mut j = DMatrix::zeros(n + 1, n + 1);

        for i in 0..=n {
            let (q, dq) = self.shaft_force(i, w[i]);

            let n_in = if i == 0 { p } else { k * (w[i - 1] - w[i]) };
            let n_out = if i == n {
                self.toe_force(w[n]).0
            } else {
                k * (w[i] - w[i + 1])
            };
            r[i] = n_in - n_out - q;

            j[(i, i)] -= dq;
            if i > 0 {
                j[(i, i - 1)] += k;
                j[(i, i)] -= k;
            }
            if i < n {
                j[(i, i + 1)] += k;
                j[(i, i)] -= k;
            } else {
                j[(i, i)] -= self.toe_force(w[n]).1;
            }
        }

        (r, j)
    }

    /// 单级荷载下的 Newton 迭代，返回 (是否收敛, 迭代次数)
    fn solve_step(&self, w: &mut DVector<f64>, p: f64) -> Result<(bool, usize)> {
        let s = &self.settings;
        for iter in 1..=s.max_iterations {
            let (r, j) = self.assemble(w, p);
            let mut dw = linalg::solve(&j, &(-r))?;

            let max_comp = dw.amax();
            if max_comp.is_finite() && max_comp > s.max_step_m {
                dw *= s.max_step_m / max_comp;
            }
            *w += &dw;

            if dw.amax() < s.tolerance_m {
                return Ok((true, iter));
            }
        }
        Ok((false, s.max_iterations))
    }

    /// 极限承载力：桩侧峰值摩阻之和 + 桩端极限阻力
    pub fn capacity(&self) -> AxialCapacity {
        let shaft_kn: f64 = (0..=self.n)
            .map(|i| self.tz[i].max_y() * self.perimeter * self.tributary[i])
            .sum();
        let toe_kn = self.qz.max_y() * self.area;
        AxialCapacity {
            shaft_kn,
            toe_kn,
            total_kn: shaft_kn + toe_kn,
            self_weight_kn: self.self_weight_kn,
        }
    }

    /// 分级加载至目标荷载 (kN)
    pub fn solve(&self, target_kn: f64) -> Result<AxialResults> {
        let z = self.nodes();
        let capacity = self.capacity();

        if target_kn == 0.0 {
            let zeros = vec![0.0; self.n + 1];
            return Ok(AxialResults {
                steps: vec![AxialStep {
                    load_kn: 0.0,
                    head_settlement_m: 0.0,
                    converged: true,
                    iterations: 0,
                }],
                profile: AxialProfile {
                    z_m: z,
                    settlement_m: zeros.clone(),
                    shaft_resistance_n: zeros.clone(),
                    axial_force_n: zeros,
                },
                toe_resistance_n: 0.0,
                capacity,
            });
        }

        let n_steps = self.settings.load_steps.max(2);
        let mut w = DVector::zeros(self.n + 1);
        let mut steps = Vec::with_capacity(n_steps);

        for k in 0..n_steps {
            let load_kn = target_kn * k as f64 / (n_steps - 1) as f64;
            // 以上一级收敛解为初值
            let (converged, iterations) = self.solve_step(&mut w, load_kn * 1e3)?;

            if converged {
                tracing::debug!(load_kn, iterations, head = w[0], "axial step converged");
            } else {
                tracing::warn!(
                    load_kn,
                    iterations,
                    "axial step did not converge; load may exceed pile capacity"
                );
            }

            steps.push(AxialStep {
                load_kn,
                head_settlement_m: w[0],
                converged,
                iterations,
            });
        }

        let profile = self.build_profile(&w, target_kn * 1e3, z);
        let toe_resistance_n = self.toe_force(w[self.n]).0;

        Ok(AxialResults {
            steps,
            profile,
            toe_resistance_n,
            capacity,
        })
    }

    /// 由最终位移计算分布
    fn build_profile(&self, w: &DVector<f64>, p: f64, z: Vec<f64>) -> AxialProfile {
        let n = self.n;
        let k = self.ea / self.dz;

        let mut shaft = Vec::with_capacity(n + 1);
        let mut cumulative = 0.0;
        for i in 0..=n {
            cumulative += self.shaft_force(i, w[i]).0;
            shaft.push(cumulative);
        }

        let segment: Vec<f64> = (0..n).map(|i| k * (w[i] - w[i + 1])).collect();
        let mut axial = Vec::with_capacity(n + 1);
        axial.push(p);
        for i in 1..n {
            axial.push(0.5 * (segment[i - 1] + segment[i]));
        }
        axial.push(self.toe_force(w[n]).0);

        AxialProfile {
            z_m: z,
            settlement_m: w.iter().copied().collect(),
            shaft_resistance_n: shaft,
            axial_force_n: axial,
        }
    }
}

/// 便捷入口：按项目设置运行轴向分析
pub fn run_axial(
    pile: &Pile,
    profile: &SoilProfile,
    settings: &AnalysisSettings,
    target_kn: f64,
) -> Result<AxialResults> {
    AxialSolver::new(pile, profile, settings.into())?.solve(target_kn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SoilLayer;

    fn clay_site() -> (Pile, SoilProfile) {
        let pile = Pile::new(20.0, 0.6, 30e9, 24.0);
        let profile = SoilProfile::new(vec![
            SoilLayer::clay(0.0, 10.0, 18.0, 40.0),
            SoilLayer::clay(10.0, 30.0, 19.0, 80.0),
        ]);
        (pile, profile)
    }

    #[test]
    fn test_zero_load_returns_single_point() {
        let (pile, profile) = clay_site();
        let res = run_axial(&pile, &profile, &AnalysisSettings::default(), 0.0).unwrap();
        assert_eq!(res.steps.len(), 1);
        assert_eq!(res.loads_kn(), vec![0.0]);
        assert_eq!(res.settlements_m(), vec![0.0]);
        assert_eq!(res.toe_resistance_n, 0.0);
        assert!(res.profile.settlement_m.iter().all(|w| *w == 0.0));
    }

    #[test]
    fn test_compression_load_settlement_monotonic() {
        let (pile, profile) = clay_site();
        let res = run_axial(&pile, &profile, &AnalysisSettings::default(), 600.0).unwrap();
        assert_eq!(res.steps.len(), 10);
        assert!(res.all_converged());
        assert_eq!(res.steps[0].head_settlement_m, 0.0);

        let s = res.settlements_m();
        for w in s.windows(2) {
            assert!(w[1] >= w[0]);
        }
        assert!(*s.last().unwrap() > 0.0);

        // 桩顶位移大于桩端位移
        let w = &res.profile.settlement_m;
        assert!(w[0] > *w.last().unwrap());
    }

    #[test]
    fn test_global_equilibrium() {
        let (pile, profile) = clay_site();
        let p_kn = 600.0;
        let res = run_axial(&pile, &profile, &AnalysisSettings::default(), p_kn).unwrap();
        let shaft = *res.profile.shaft_resistance_n.last().unwrap();
        let total = shaft + res.toe_resistance_n;
        let p = p_kn * 1e3;
        assert!((total - p).abs() / p < 0.02, "shaft+toe = {}, P = {}", total, p);
        assert!((res.profile.axial_force_n[0] - p).abs() < 1e-6);
    }

    #[test]
    fn test_uplift_has_no_toe_resistance() {
        let (pile, profile) = clay_site();
        let res = run_axial(&pile, &profile, &AnalysisSettings::default(), -300.0).unwrap();
        assert!(res.all_converged());
        assert!(res.steps.last().unwrap().head_settlement_m < 0.0);
        assert_eq!(res.toe_resistance_n, 0.0);
    }

    #[test]
    fn test_capacity_summary() {
        let (pile, profile) = clay_site();
        let solver = AxialSolver::new(&pile, &profile, AxialSettings::default()).unwrap();
        let cap = solver.capacity();
        assert!(cap.shaft_kn > 0.0);
        // 桩端 9 su A
        let expected_toe = 9.0 * 80.0 * pile.area();
        assert!((cap.toe_kn - expected_toe).abs() < 1e-9);
        assert!((cap.total_kn - cap.shaft_kn - cap.toe_kn).abs() < 1e-9);
        assert!(cap.self_weight_kn > 0.0);
    }

    #[test]
    fn test_segments_clamped_to_minimum() {
        let (pile, profile) = clay_site();
        let settings = AnalysisSettings {
            segments: 3,
            ..AnalysisSettings::default()
        };
        let solver = AxialSolver::new(&pile, &profile, (&settings).into()).unwrap();
        assert_eq!(solver.nodes().len(), 11);
    }

    #[test]
    fn test_empty_profile_rejected() {
        let pile = Pile::new(20.0, 0.6, 30e9, 24.0);
        let err = AxialSolver::new(&pile, &SoilProfile::default(), AxialSettings::default());
        assert!(matches!(err, Err(PileError::MissingData(_))));
    }

    #[test]
    fn test_overload_flags_unconverged_steps() {
        let pile = Pile::new(20.0, 0.3, 30e9, 24.0);
        let profile = SoilProfile::new(vec![SoilLayer::clay(0.0, 30.0, 18.0, 5.0)]);
        let res = run_axial(&pile, &profile, &AnalysisSettings::default(), 5000.0).unwrap();

        assert!(res.capacity.total_kn < 5000.0);
        assert!(res.steps[0].converged);
        assert!(!res.all_converged());
        assert!(res.steps.iter().skip(1).all(|s| !s.converged));
        assert!(res.steps.last().unwrap().iterations > 0);
        assert!(res.settlements_m().iter().all(|w| w.is_finite()));
    }
}
