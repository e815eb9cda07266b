//! # 水平受荷桩分析
//!
//! 非线性 Winkler 地基梁：EI·y'''' + p(y, z) = 0。
//! 桩身 n 个实节点，两端各加两个虚节点，共 n + 4 个未知量，
//! 中心差分离散后以带松弛的 Newton 迭代求解。
//!
//! ## 边界条件
//! - 自由桩顶：EI·y''(0) = M，EI·y'''(0) = H
//! - 嵌固桩顶（转角约束、可平移）：y'(0) = 0，EI·y'''(0) = H
//! - 桩端自由：y''(L) = 0，y'''(L) = 0
//!
//! ## 依赖关系
//! - 被 `commands/analyze/lateral.rs`, `commands/batch.rs` 调用
//! - 使用 `curves/lateral.rs`, `analysis/linalg.rs`

use crate::analysis::linalg;
use crate::curves::{py_curve, Curve};
use crate::error::{PileError, Result};
use crate::models::{AnalysisSettings, HeadCondition, Pile, SoilProfile};

use nalgebra::{DMatrix, DVector};

/// 切线刚度下限 (N/m²)
const MIN_TANGENT: f64 = 1e3;
/// 切线刚度上限 (N/m²)
const MAX_TANGENT: f64 = 1e9;
/// 挠度超过 0.5 D 视为发散
const DIVERGENCE_Y_OVER_D: f64 = 0.5;
/// 初始挠度幅值 (m)
const INITIAL_DEFLECTION: f64 = 1e-6;

/// 水平求解参数
#[derive(Debug, Clone)]
pub struct LateralSettings {
    pub nodes: usize,
    pub load_steps: usize,
    pub max_iterations: usize,
    pub tolerance: f64,
    pub relaxation: f64,
    pub head: HeadCondition,
}

impl Default for LateralSettings {
    fn default() -> Self {
        (&AnalysisSettings::default()).into()
    }
}

impl From<&AnalysisSettings> for LateralSettings {
    fn from(s: &AnalysisSettings) -> Self {
        let relaxation = if s.lateral_relaxation > 0.0 && s.lateral_relaxation <= 1.0 {
            s.lateral_relaxation
        } else {
            0.5
        };
        LateralSettings {
            nodes: s.lateral_nodes.max(11),
            load_steps: s.lateral_load_steps.max(1),
            max_iterations: s.lateral_max_iterations.max(1),
            tolerance: s.lateral_tolerance,
            relaxation,
            head: s.head_condition,
        }
    }
}

/// 沿桩身的响应分布
#[derive(Debug, Clone, Default)]
pub struct LateralProfile {
    pub z_m: Vec<f64>,
    pub deflection_m: Vec<f64>,
    pub rotation_rad: Vec<f64>,
    /// 弯矩 M = EI·y'' (N·m)
    pub moment_nm: Vec<f64>,
    /// 剪力 V = EI·y''' (N)
    pub shear_n: Vec<f64>,
    /// 土反力 (N/m)
    pub soil_reaction_npm: Vec<f64>,
}

impl LateralProfile {
    fn zeros(z_m: Vec<f64>) -> Self {
        let n = z_m.len();
        LateralProfile {
            z_m,
            deflection_m: vec![0.0; n],
            rotation_rad: vec![0.0; n],
            moment_nm: vec![0.0; n],
            shear_n: vec![0.0; n],
            soil_reaction_npm: vec![0.0; n],
        }
    }

    /// 绝对值最大的弯矩 (深度 m, 弯矩 N·m)
    pub fn max_moment(&self) -> (f64, f64) {
        self.z_m
            .iter()
            .zip(self.moment_nm.iter())
            .fold((0.0, 0.0), |best, (z, m)| {
                if m.abs() > best.1.abs() {
                    (*z, *m)
                } else {
                    best
                }
            })
    }
}

/// 单级荷载结果
#[derive(Debug, Clone)]
pub struct LateralStep {
    pub lateral_kn: f64,
    pub moment_knm: f64,
    pub head_deflection_mm: f64,
    pub head_rotation_mrad: f64,
    pub converged: bool,
    pub iterations: usize,
    pub profile: LateralProfile,
}

/// 水平分析结果
#[derive(Debug, Clone)]
pub struct LateralResults {
    pub steps: Vec<LateralStep>,
    pub head: HeadCondition,
    /// EI (N·m²)
    pub ei_nm2: f64,
    pub length_m: f64,
    pub nodes: usize,
}

impl LateralResults {
    /// 最后一级荷载的结果
    pub fn last_step(&self) -> Option<&LateralStep> {
        self.steps.last()
    }

    /// 桩顶荷载-挠度曲线 (H kN, y mm)
    pub fn head_curve(&self) -> Vec<(f64, f64)> {
        self.steps
            .iter()
            .map(|s| (s.lateral_kn, s.head_deflection_mm))
            .collect()
    }

    pub fn all_converged(&self) -> bool {
        self.steps.iter().all(|s| s.converged)
    }
}

/// 单级迭代的结束状态
enum StepOutcome {
    Converged(usize),
    MaxIterations,
    Diverged(&'static str),
}

/// 水平求解器
pub struct LateralSolver {
    settings: LateralSettings,
    n: usize,
    dz: f64,
    ei: f64,
    diameter: f64,
    length: f64,
    springs: Vec<Curve>,
    /// 切线探测步长 (m)
    probe: f64,
}

impl LateralSolver {
    pub fn new(pile: &Pile, profile: &SoilProfile, settings: LateralSettings) -> Result<Self> {
        pile.validate()?;
        if profile.is_empty() {
            return Err(PileError::MissingData("add soil layers first".to_string()));
        }

        let n = settings.nodes.max(11);
        let length = pile.length_m;
        let dz = length / (n - 1) as f64;
        let diameter = pile.diameter_m;

        let springs = (0..n)
            .map(|i| {
                let z = i as f64 * dz;
                profile
                    .layer_at(z)
                    .map(|layer| py_curve(layer, diameter, z))
                    .unwrap_or_default()
            })
            .collect();

        Ok(LateralSolver {
            settings: LateralSettings { nodes: n, ..settings },
            n,
            dz,
            ei: pile.flexural_rigidity(),
            diameter,
            length,
            springs,
            probe: (1e-4 * diameter).max(1e-7),
        })
    }

    pub fn nodes(&self) -> Vec<f64> {
        (0..self.n).map(|i| i as f64 * self.dz).collect()
    }

    /// 节点 i 的土反力 (N/m) 与切线刚度 (N/m²)
    fn spring(&self, i: usize, y: f64) -> (f64, f64) {
        let curve = &self.springs[i];
        let a = y.abs();
        let p = y.signum() * curve.interpolate(a) * 1e3;
        let k = (curve.interpolate(a + self.probe) - curve.interpolate(a)) / self.probe * 1e3;
        let k = if k.is_finite() { k } else { MIN_TANGENT };
        (p, k.clamp(MIN_TANGENT, MAX_TANGENT))
    }

    /// 线性刚度矩阵（梁 + 边界条件）
    fn stiffness(&self) -> DMatrix<f64> {
        let n = self.n;
        let size = n + 4;
        let dz = self.dz;
        let c4 = self.ei / dz.powi(4);
        let c3 = self.ei / (2.0 * dz.powi(3));
        let c2 = self.ei / (dz * dz);
        let mut k = DMatrix::zeros(size, size);

        // 桩顶（列 0, 1 为虚节点 y_-2, y_-1；列 2 为 y_0）
        match self.settings.head {
            HeadCondition::FreeHead => {
                k[(0, 1)] = c2;
                k[(0, 2)] = -2.0 * c2;
                k[(0, 3)] = c2;
            }
            HeadCondition::FixedHead => {
                k[(0, 1)] = -c3;
                k[(0, 3)] = c3;
            }
        }
        k[(1, 0)] = -c3;
        k[(1, 1)] = 2.0 * c3;
        k[(1, 3)] = -2.0 * c3;
        k[(1, 4)] = c3;

        // 实节点：五点差分
        for i in 0..n {
            let row = i + 2;
            for (offset, coef) in [1.0, -4.0, 6.0, -4.0, 1.0].iter().enumerate() {
                k[(row, i + offset)] = coef * c4;
            }
        }

        // 桩端（末实节点在列 n + 1）
        let m = n + 1;
        k[(n + 2, m - 1)] = c2;
        k[(n + 2, m)] = -2.0 * c2;
        k[(n + 2, m + 1)] = c2;

        k[(n + 3, m - 2)] = -c3;
        k[(n + 3, m - 1)] = 2.0 * c3;
        k[(n + 3, m + 1)] = -2.0 * c3;
        k[(n + 3, m + 2)] = c3;

        k
    }

    /// 荷载向量 (H N, M N·m)
    fn load_vector(&self, h: f64, m: f64) -> DVector<f64> {
        let mut f = DVector::zeros(self.n + 4);
        if self.settings.head == HeadCondition::FreeHead {
            f[0] = m;
        }
        f[1] = h;
        f
    }

    fn initial_guess(&self) -> DVector<f64> {
        let decay = 0.2 * self.length;
        DVector::from_fn(self.n + 4, |j, _| {
            let z = (j as f64 - 2.0) * self.dz;
            INITIAL_DEFLECTION * (-z / decay).exp()
        })
    }

    fn max_real(&self, y: &DVector<f64>) -> f64 {
        y.rows(2, self.n).amax()
    }

    /// 单级荷载下的 Newton 迭代
    fn solve_step(
        &self,
        k: &DMatrix<f64>,
        f: &DVector<f64>,
        y: &mut DVector<f64>,
    ) -> Result<StepOutcome> {
        let s = &self.settings;
        let limit = DIVERGENCE_Y_OVER_D * self.diameter;

        for iter in 1..=s.max_iterations {
            let mut residual = k * &*y - f;
            let mut jacobian = k.clone();
            for i in 0..self.n {
                let (p, kt) = self.spring(i, y[i + 2]);
                residual[i + 2] += p;
                jacobian[(i + 2, i + 2)] += kt;
            }

            let dy = match linalg::solve(&jacobian, &(-residual)) {
                Ok(dy) => dy,
                Err(PileError::SingularSystem { .. }) => {
                    return Ok(StepOutcome::Diverged("linear solve failed"))
                }
                Err(e) => return Err(e),
            };
            let update = dy * s.relaxation;
            *y += &update;

            if y.iter().any(|v| !v.is_finite()) {
                return Ok(StepOutcome::Diverged("non-finite deflection"));
            }
            let y_max = self.max_real(y);
            if y_max > limit {
                return Ok(StepOutcome::Diverged("deflection exceeds half the pile diameter"));
            }

            if update.amax() <= s.tolerance * y_max.max(1e-9) {
                return Ok(StepOutcome::Converged(iter));
            }
        }
        Ok(StepOutcome::MaxIterations)
    }

    /// 由扩展挠度向量计算各实节点的响应
    fn build_profile(&self, y: &DVector<f64>) -> LateralProfile {
        let dz = self.dz;
        let ei = self.ei;
        let mut profile = LateralProfile {
            z_m: self.nodes(),
            ..Default::default()
        };
        for i in 0..self.n {
            let j = i + 2;
            let (ym2, ym1, y0, yp1, yp2) = (y[j - 2], y[j - 1], y[j], y[j + 1], y[j + 2]);
            profile.deflection_m.push(y0);
            profile.rotation_rad.push((yp1 - ym1) / (2.0 * dz));
            profile.moment_nm.push(ei * (yp1 - 2.0 * y0 + ym1) / (dz * dz));
            profile
                .shear_n
                .push(ei * (yp2 - 2.0 * yp1 + 2.0 * ym1 - ym2) / (2.0 * dz.powi(3)));
            profile.soil_reaction_npm.push(self.spring(i, y0).0);
        }
        profile
    }

    /// 分级加载至桩顶水平力 H (kN) 与弯矩 M (kN·m)
    pub fn solve(&self, lateral_kn: f64, moment_knm: f64) -> Result<LateralResults> {
        let mut results = LateralResults {
            steps: Vec::new(),
            head: self.settings.head,
            ei_nm2: self.ei,
            length_m: self.length,
            nodes: self.n,
        };

        if lateral_kn == 0.0 && moment_knm == 0.0 {
            results.steps.push(LateralStep {
                lateral_kn: 0.0,
                moment_knm: 0.0,
                head_deflection_mm: 0.0,
                head_rotation_mrad: 0.0,
                converged: true,
                iterations: 0,
                profile: LateralProfile::zeros(self.nodes()),
            });
            return Ok(results);
        }

        let k = self.stiffness();
        let n_steps = self.settings.load_steps;
        let mut y = self.initial_guess();

        for step in 1..=n_steps {
            let frac = step as f64 / n_steps as f64;
            let (h_kn, m_knm) = (lateral_kn * frac, moment_knm * frac);
            let f = self.load_vector(h_kn * 1e3, m_knm * 1e3);

            let last_good = y.clone();
            let (converged, iterations, abandoned) = match self.solve_step(&k, &f, &mut y)? {
                StepOutcome::Converged(iter) => {
                    tracing::debug!(h_kn, m_knm, iter, "lateral step converged");
                    (true, iter, false)
                }
                StepOutcome::MaxIterations => {
                    tracing::warn!(h_kn, m_knm, "lateral step reached the iteration limit");
                    (false, self.settings.max_iterations, false)
                }
                StepOutcome::Diverged(reason) => {
                    tracing::warn!(h_kn, m_knm, reason, "lateral step abandoned");
                    y = last_good;
                    (false, self.settings.max_iterations, true)
                }
            };

            let profile = self.build_profile(&y);
            results.steps.push(LateralStep {
                lateral_kn: h_kn,
                moment_knm: m_knm,
                head_deflection_mm: profile.deflection_m[0] * 1e3,
                head_rotation_mrad: profile.rotation_rad[0] * 1e3,
                converged,
                iterations,
                profile,
            });

            if abandoned {
                break;
            }
        }

        Ok(results)
    }
}

/// 便捷入口：按项目设置运行水平分析
pub fn run_lateral(
    pile: &Pile,
    profile: &SoilProfile,
    settings: &AnalysisSettings,
    lateral_kn: f64,
    moment_knm: f64,
) -> Result<LateralResults> {
    LateralSolver::new(pile, profile, settings.into())?.solve(lateral_kn, moment_knm)
}
