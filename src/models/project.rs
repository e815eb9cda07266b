//! # 项目数据模型
//!
//! 一个项目文件包含桩、土层剖面、荷载与分析设置。
//!
//! ## 依赖关系
//! - 被 `io/project.rs`, `commands/` 使用
//! - 使用 `models/pile.rs`, `models/soil.rs`

use crate::error::{PileError, Result};
use crate::models::{Loads, Pile, SoilProfile};

use serde::{Deserialize, Deserializer, Serialize};

/// 当前项目文件格式版本
pub const PROJECT_VERSION: u32 = 1;

/// 项目元信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_units")]
    pub units: String,
}

fn default_version() -> u32 {
    PROJECT_VERSION
}

fn default_units() -> String {
    "SI".to_string()
}

impl Default for Meta {
    fn default() -> Self {
        Meta {
            version: PROJECT_VERSION,
            units: default_units(),
        }
    }
}

/// 桩顶约束条件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadCondition {
    /// 自由桩头：可转动
    #[default]
    FreeHead,
    /// 固定桩头：转角为零，可平移
    FixedHead,
}

impl std::fmt::Display for HeadCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeadCondition::FreeHead => write!(f, "free head"),
            HeadCondition::FixedHead => write!(f, "fixed head"),
        }
    }
}

/// 分析设置（所有字段可缺省）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// 轴向分析桩身分段数
    pub segments: usize,
    pub axial_load_steps: usize,
    pub axial_max_iterations: usize,
    /// 位移增量收敛容差 (m)
    pub axial_tolerance_m: f64,
    /// 单次 Newton 步最大位移增量 (m)
    pub axial_max_step_m: f64,

    /// 水平分析节点数
    pub lateral_nodes: usize,
    pub lateral_load_steps: usize,
    pub lateral_max_iterations: usize,
    pub lateral_tolerance: f64,
    pub lateral_relaxation: f64,
    pub head_condition: HeadCondition,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            segments: 40,
            axial_load_steps: 10,
            axial_max_iterations: 80,
            axial_tolerance_m: 1e-6,
            axial_max_step_m: 5e-4,
            lateral_nodes: 81,
            lateral_load_steps: 10,
            lateral_max_iterations: 100,
            lateral_tolerance: 1e-6,
            lateral_relaxation: 0.5,
            head_condition: HeadCondition::FreeHead,
        }
    }
}

/// 项目
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub meta: Meta,

    /// 桩参数；新建项目为空对象 `{}`
    #[serde(default, deserialize_with = "empty_object_as_none")]
    pub pile: Option<Pile>,

    #[serde(default)]
    pub soil_profile: SoilProfile,

    /// 荷载；新建项目为空对象 `{}`
    #[serde(default, deserialize_with = "empty_object_as_none")]
    pub loads: Option<Loads>,

    #[serde(default)]
    pub analysis: AnalysisSettings,
}

/// 将 `{}` 或 `null` 视为未填写
fn empty_object_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(serde_json::Value::Object(map)) if map.is_empty() => Ok(None),
        Some(v) => serde_json::from_value(v)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require_pile(&self) -> Result<&Pile> {
        self.pile
            .as_ref()
            .ok_or_else(|| PileError::MissingData("edit the pile properties first".to_string()))
    }

    pub fn require_loads(&self) -> Result<&Loads> {
        self.loads
            .as_ref()
            .ok_or_else(|| PileError::MissingData("edit the loads first".to_string()))
    }

    pub fn require_profile(&self) -> Result<&SoilProfile> {
        if self.soil_profile.is_empty() {
            Err(PileError::MissingData("add soil layers first".to_string()))
        } else {
            Ok(&self.soil_profile)
        }
    }

    /// 校验分析所需的全部输入，返回警告列表
    pub fn validate_for_analysis(&self) -> Result<Vec<String>> {
        self.require_pile()?.validate()?;
        self.require_loads()?;
        self.require_profile()?.validate()
    }

    /// 项目摘要（对应终端显示）
    pub fn summary_lines(&self) -> Vec<String> {
        let pile = match &self.pile {
            Some(p) => {
                let mut s = format!(
                    "L={} m, D={} m, E={:.3e} Pa, unit weight={} kN/m³",
                    p.length_m, p.diameter_m, p.elastic_modulus_pa, p.unit_weight_knpm3
                );
                if let Some(t) = p.wall_thickness_m {
                    s.push_str(&format!(", wall={} m", t));
                }
                s
            }
            None => "(empty)".to_string(),
        };
        let loads = match &self.loads {
            Some(l) => format!(
                "axial={} kN, lateral={} kN, moment={} kN·m",
                l.axial_kn, l.lateral_kn, l.moment_knm
            ),
            None => "(empty)".to_string(),
        };
        vec![
            format!("Units: {}", self.meta.units),
            format!("Pile: {}", pile),
            format!("Loads: {}", loads),
            format!("Soil Layers: {} layer(s)", self.soil_profile.len()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SoilLayer;

    #[test]
    fn test_new_project_has_empty_sections() {
        let project = Project::new();
        assert!(project.pile.is_none());
        assert!(project.loads.is_none());
        assert!(project.soil_profile.is_empty());
        assert_eq!(project.analysis.segments, 40);
        assert_eq!(project.meta.units, "SI");
    }

    #[test]
    fn test_empty_objects_parse_as_missing() {
        let json = r#"{
            "meta": {"version": 1, "units": "SI"},
            "pile": {},
            "soil_profile": [],
            "loads": {},
            "analysis": {"segments": 40}
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert!(project.pile.is_none());
        assert!(project.loads.is_none());
        assert_eq!(project.analysis.lateral_nodes, 81);
    }

    #[test]
    fn test_require_reports_missing_sections() {
        let mut project = Project::new();
        assert!(matches!(
            project.validate_for_analysis(),
            Err(PileError::MissingData(_))
        ));

        project.pile = Some(Pile::new(20.0, 0.6, 30e9, 24.0));
        project.loads = Some(Loads::default());
        assert!(matches!(
            project.validate_for_analysis(),
            Err(PileError::MissingData(_))
        ));

        project.soil_profile.add(SoilLayer::clay(0.0, 30.0, 18.0, 50.0));
        assert!(project.validate_for_analysis().unwrap().is_empty());
    }

    #[test]
    fn test_head_condition_serialization() {
        let mut settings = AnalysisSettings::default();
        settings.head_condition = HeadCondition::FixedHead;
        let v = serde_json::to_value(&settings).unwrap();
        assert_eq!(v["head_condition"], "fixed_head");
    }

    #[test]
    fn test_summary_mentions_layers() {
        let mut project = Project::new();
        project.soil_profile.add(SoilLayer::sand(0.0, 10.0, 19.0, 32.0));
        let lines = project.summary_lines();
        assert!(lines.iter().any(|l| l.contains("1 layer(s)")));
        assert!(lines.iter().any(|l| l.contains("Pile: (empty)")));
    }
}
