//! # 桩与荷载数据模型
//!
//! 桩的几何与材料参数（SI 单位）及桩顶荷载。
//!
//! ## 依赖关系
//! - 被 `models/project.rs`, `analysis/`, `curves/` 使用

use crate::error::{PileError, Result};

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// 单桩参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pile {
    /// 桩长 (m)
    pub length_m: f64,

    /// 外径 (m)
    pub diameter_m: f64,

    /// 弹性模量 (Pa)
    pub elastic_modulus_pa: f64,

    /// 桩身重度 (kN/m³)
    #[serde(rename = "unit_weight_kNpm3")]
    pub unit_weight_knpm3: f64,

    /// 管桩壁厚 (m)，None 表示实心截面
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall_thickness_m: Option<f64>,
}

impl Pile {
    pub fn new(length_m: f64, diameter_m: f64, elastic_modulus_pa: f64, unit_weight: f64) -> Self {
        Pile {
            length_m,
            diameter_m,
            elastic_modulus_pa,
            unit_weight_knpm3: unit_weight,
            wall_thickness_m: None,
        }
    }

    pub fn with_wall_thickness(mut self, t: f64) -> Self {
        self.wall_thickness_m = Some(t);
        self
    }

    /// 校验参数
    pub fn validate(&self) -> Result<()> {
        let values = [
            ("length", self.length_m),
            ("diameter", self.diameter_m),
            ("elastic modulus", self.elastic_modulus_pa),
            ("unit weight", self.unit_weight_knpm3),
        ];
        for (name, v) in values {
            if !v.is_finite() || v <= 0.0 {
                return Err(PileError::InvalidPile(format!(
                    "{} must be greater than 0 (got {})",
                    name, v
                )));
            }
        }
        if self.length_m <= self.diameter_m {
            return Err(PileError::InvalidPile(
                "pile length must exceed diameter".to_string(),
            ));
        }
        if let Some(t) = self.wall_thickness_m {
            if !(t > 0.0 && t < 0.5 * self.diameter_m) {
                return Err(PileError::InvalidPile(format!(
                    "wall thickness must be in (0, D/2) (got {})",
                    t
                )));
            }
        }
        Ok(())
    }

    /// 内径 (m)，实心截面为 0
    fn inner_diameter(&self) -> f64 {
        match self.wall_thickness_m {
            Some(t) => (self.diameter_m - 2.0 * t).max(0.0),
            None => 0.0,
        }
    }

    /// 截面面积 (m²)
    pub fn area(&self) -> f64 {
        let d_in = self.inner_diameter();
        0.25 * PI * (self.diameter_m.powi(2) - d_in.powi(2))
    }

    /// 截面周长 (m)
    pub fn perimeter(&self) -> f64 {
        PI * self.diameter_m
    }

    /// 截面惯性矩 (m⁴)
    pub fn second_moment(&self) -> f64 {
        let d_in = self.inner_diameter();
        PI * (self.diameter_m.powi(4) - d_in.powi(4)) / 64.0
    }

    /// 轴向刚度 EA (N)
    pub fn axial_stiffness(&self) -> f64 {
        self.elastic_modulus_pa * self.area()
    }

    /// 抗弯刚度 EI (N·m²)
    pub fn flexural_rigidity(&self) -> f64 {
        self.elastic_modulus_pa * self.second_moment()
    }

    /// 桩身自重 (kN)
    pub fn self_weight_kn(&self) -> f64 {
        self.unit_weight_knpm3 * self.area() * self.length_m
    }
}

/// 桩顶荷载
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Loads {
    /// 轴向荷载 (kN)，正值为压，负值为拔
    #[serde(rename = "axial_kN", default)]
    pub axial_kn: f64,

    /// 水平荷载 (kN)
    #[serde(rename = "lateral_kN", default)]
    pub lateral_kn: f64,

    /// 桩顶弯矩 (kN·m)
    #[serde(rename = "moment_kNm", default)]
    pub moment_knm: f64,
}
