//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `new` / `show` / `pile` / `loads` / `layer`: 项目编辑
//! - `curves`: 生成 t-z、q-z、p-y 曲线
//! - `analyze`: 分析功能（嵌套子命令）
//!   - `axial`: 轴向荷载-沉降
//!   - `lateral`: 水平荷载
//! - `batch`: 批量分析
//! - `config`: 用户配置
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: project, analyze, batch, config

pub mod analyze;
pub mod batch;
pub mod config;
pub mod project;

use clap::{Parser, Subcommand};

/// pilekit - 单桩轴向与水平受荷分析
#[derive(Parser)]
#[command(name = "pilekit")]
#[command(version)]
#[command(about = "Single pile analysis with t-z, q-z and p-y soil springs", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Show debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Create a new, empty project file
    New(project::NewArgs),

    /// Show the project summary and soil profile
    Show(project::ShowArgs),

    /// Edit the pile properties of a project
    Pile(project::PileArgs),

    /// Edit the head loads of a project
    Loads(project::LoadsArgs),

    /// Add or remove soil layers
    Layer(project::LayerArgs),

    /// Generate t-z, q-z and p-y curve previews
    Curves(analyze::CurvesArgs),

    /// Run axial or lateral pile analysis
    Analyze(analyze::AnalyzeArgs),

    /// Analyze many project files in parallel
    Batch(batch::BatchArgs),

    /// Show or change user defaults
    Config(config::ConfigArgs),
}
