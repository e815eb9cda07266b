//! # 土层数据模型
//!
//! 分层土体剖面：每层为黏土（不排水抗剪强度 su）或砂土（内摩擦角 φ）。
//!
//! ## 依赖关系
//! - 被 `models/project.rs`, `curves/`, `analysis/` 使用

use crate::error::{PileError, Result};

use serde::{Deserialize, Serialize};

/// 土类及其强度参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SoilKind {
    Clay {
        /// 不排水抗剪强度 (kPa)
        #[serde(rename = "undrained_shear_strength_kPa")]
        su_kpa: f64,
    },
    Sand {
        /// 内摩擦角 (°)
        #[serde(rename = "phi_deg")]
        phi_deg: f64,
    },
}

impl std::fmt::Display for SoilKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoilKind::Clay { .. } => write!(f, "clay"),
            SoilKind::Sand { .. } => write!(f, "sand"),
        }
    }
}

/// 单个土层
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilLayer {
    /// 层顶深度 (m)
    pub from_m: f64,

    /// 层底深度 (m)
    pub to_m: f64,

    /// 重度 (kN/m³)
    #[serde(rename = "gamma_kNpm3")]
    pub gamma_knpm3: f64,

    #[serde(flatten)]
    pub kind: SoilKind,
}

impl SoilLayer {
    pub fn clay(from_m: f64, to_m: f64, gamma: f64, su_kpa: f64) -> Self {
        SoilLayer {
            from_m,
            to_m,
            gamma_knpm3: gamma,
            kind: SoilKind::Clay { su_kpa },
        }
    }

    pub fn sand(from_m: f64, to_m: f64, gamma: f64, phi_deg: f64) -> Self {
        SoilLayer {
            from_m,
            to_m,
            gamma_knpm3: gamma,
            kind: SoilKind::Sand { phi_deg },
        }
    }

    /// 层中点深度 (m)
    pub fn mid_depth(&self) -> f64 {
        0.5 * (self.from_m + self.to_m)
    }

    pub fn contains(&self, z: f64) -> bool {
        self.from_m <= z && z < self.to_m
    }

    /// 强度参数的简短描述，例如 `su=40 kPa`
    pub fn strength_label(&self) -> String {
        match self.kind {
            SoilKind::Clay { su_kpa } => format!("su={} kPa", su_kpa),
            SoilKind::Sand { phi_deg } => format!("phi={}°", phi_deg),
        }
    }

    /// 校验参数范围
    pub fn validate(&self) -> Result<()> {
        if !(self.from_m >= 0.0 && self.to_m > self.from_m) {
            return Err(PileError::InvalidLayer(format!(
                "depth range {}-{} m is empty or negative",
                self.from_m, self.to_m
            )));
        }
        if !(self.gamma_knpm3 > 0.0 && self.gamma_knpm3 <= 100.0) {
            return Err(PileError::InvalidLayer(format!(
                "unit weight must be in (0, 100] kN/m³ (got {})",
                self.gamma_knpm3
            )));
        }
        match self.kind {
            SoilKind::Clay { su_kpa } if !(0.0..=1000.0).contains(&su_kpa) => {
                Err(PileError::InvalidLayer(format!(
                    "su must be in [0, 1000] kPa (got {})",
                    su_kpa
                )))
            }
            SoilKind::Sand { phi_deg } if !(20.0..=45.0).contains(&phi_deg) => {
                Err(PileError::InvalidLayer(format!(
                    "phi must be in [20, 45] degrees (got {})",
                    phi_deg
                )))
            }
            _ => Ok(()),
        }
    }
}

/// 土体剖面（按层顶深度排序）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoilProfile {
    layers: Vec<SoilLayer>,
}

impl SoilProfile {
    pub fn new(mut layers: Vec<SoilLayer>) -> Self {
        sort_layers(&mut layers);
        SoilProfile { layers }
    }

    pub fn layers(&self) -> &[SoilLayer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// 添加土层并保持按层顶深度排序
    pub fn add(&mut self, layer: SoilLayer) {
        self.layers.push(layer);
        sort_layers(&mut self.layers);
    }

    /// 重新排序（从文件加载后调用）
    pub fn sort(&mut self) {
        sort_layers(&mut self.layers);
    }

    /// 删除指定序号（从 0 开始）的土层
    pub fn remove(&mut self, index: usize) -> Option<SoilLayer> {
        if index < self.layers.len() {
            Some(self.layers.remove(index))
        } else {
            None
        }
    }

    /// 查找深度 z 处的土层；不在任何层内时返回最后一层
    pub fn layer_at(&self, z: f64) -> Option<&SoilLayer> {
        self.layers
            .iter()
            .find(|l| l.contains(z))
            .or_else(|| self.layers.last())
    }

    /// 深度 z 处的竖向上覆应力 (kPa)
    pub fn vertical_stress(&self, z: f64) -> f64 {
        if z <= 0.0 {
            return 0.0;
        }
        let mut sigma = 0.0;
        for layer in &self.layers {
            if layer.from_m >= z {
                break;
            }
            let thickness = z.min(layer.to_m) - layer.from_m;
            sigma += layer.gamma_knpm3 * thickness.max(0.0);
        }
        if let Some(last) = self.layers.last() {
            if z > last.to_m {
                sigma += last.gamma_knpm3 * (z - last.to_m);
            }
        }
        sigma
    }

    /// 校验剖面，返回非致命警告（层间空隙）
    pub fn validate(&self) -> Result<Vec<String>> {
        let mut warnings = Vec::new();
        for (i, layer) in self.layers.iter().enumerate() {
            layer.validate().map_err(|e| match e {
                PileError::InvalidLayer(reason) => {
                    PileError::InvalidLayer(format!("layer {}: {}", i + 1, reason))
                }
                other => other,
            })?;
        }
        if let Some(first) = self.layers.first() {
            if first.from_m > 1e-9 {
                warnings.push(format!(
                    "no soil defined between 0 and {} m",
                    first.from_m
                ));
            }
        }
        for pair in self.layers.windows(2) {
            let (upper, lower) = (&pair[0], &pair[1]);
            if lower.from_m < upper.to_m - 1e-9 {
                return Err(PileError::InvalidLayer(format!(
                    "layers {}-{} m and {}-{} m overlap",
                    upper.from_m, upper.to_m, lower.from_m, lower.to_m
                )));
            }
            if lower.from_m > upper.to_m + 1e-9 {
                warnings.push(format!(
                    "gap between {} m and {} m",
                    upper.to_m, lower.from_m
                ));
            }
        }
        Ok(warnings)
    }
}

fn sort_layers(layers: &mut [SoilLayer]) {
    layers.sort_by(|a, b| {
        a.from_m
            .partial_cmp(&b.from_m)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
