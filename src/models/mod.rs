//! # 数据模型模块
//!
//! 定义桩、土层剖面、荷载与项目的统一数据模型。
//!
//! ## 依赖关系
//! - 被 `io/`, `curves/`, `analysis/` 和 `commands/` 使用
//! - 子模块: pile, soil, project

pub mod pile;
pub mod project;
pub mod soil;

pub use pile::{Loads, Pile};
pub use project::{AnalysisSettings, HeadCondition, Project};
pub use soil::{SoilKind, SoilLayer, SoilProfile};
