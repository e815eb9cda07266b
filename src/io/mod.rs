//! # 文件读写模块
//!
//! ## 子模块
//! - `project`: 项目 JSON 文件的读取、保存与新建
//! - `export`: 曲线与分析结果的 CSV 导出
//! - `report`: 纯文本分析报告
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `models/`, `analysis/`, `curves/`

pub mod export;
pub mod project;
pub mod report;

pub use project::{create_project, load_project, save_project, PROJECT_SUFFIX};
