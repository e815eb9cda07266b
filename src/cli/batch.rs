//! # batch 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/batch.rs`

use super::analyze::OutputFormat;

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 批量运行的分析类型
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum BatchAnalysis {
    /// Axial analysis only
    Axial,
    /// Lateral analysis only
    Lateral,
    /// Both analyses
    #[default]
    Both,
}

impl BatchAnalysis {
    pub fn axial(&self) -> bool {
        matches!(self, BatchAnalysis::Axial | BatchAnalysis::Both)
    }

    pub fn lateral(&self) -> bool {
        matches!(self, BatchAnalysis::Lateral | BatchAnalysis::Both)
    }
}

/// batch 子命令参数
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Directory containing project files (or a single project file)
    pub input: PathBuf,

    /// Output root; each project gets its own sub-directory
    #[arg(short, long, env = "PILEKIT_OUTPUT", default_value = "pilekit_results")]
    pub output: PathBuf,

    /// File name patterns, comma separated
    #[arg(short, long, default_value = "*.rspile.json")]
    pub pattern: String,

    /// Search sub-directories
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Analyses to run
    #[arg(short, long, value_enum, default_value = "both")]
    pub analysis: BatchAnalysis,

    /// Output format
    #[arg(short, long, value_enum, env = "PILEKIT_FORMAT", default_value = "csv")]
    pub format: OutputFormat,

    /// Number of parallel jobs (0 = number of CPUs)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Re-run projects whose report already exists
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
