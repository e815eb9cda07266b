//! # 批量处理模块
//!
//! 对目录中的多个项目文件并行运行分析。
//!
//! ## 功能
//! - 按 glob 模式收集项目文件（可递归）
//! - 基于 rayon 的并行处理
//! - 进度反馈与成功/跳过/失败统计
//!
//! ## 依赖关系
//! - 被 `commands/batch.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod collector;
pub mod runner;

pub use collector::FileCollector;
pub use runner::{BatchRunner, ProcessResult};
