//! # analyze / curves 子命令 CLI 定义
//!
//! - `curves`: 土弹簧曲线预览
//! - `analyze axial`: 轴向荷载-沉降分析
//! - `analyze lateral`: 水平受荷分析
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs`, `cli/batch.rs` 使用
//! - 参数传递给 `commands/curves.rs`, `commands/analyze/`

use crate::models::HeadCondition;
use crate::plot::ImageFormat;

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

/// 输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// PNG charts plus CSV data
    Png,
    /// SVG charts plus CSV data
    Svg,
    /// CSV data only, no charts
    Csv,
}

impl OutputFormat {
    /// 图像格式；`Csv` 不绘图
    pub fn image_format(&self) -> Option<ImageFormat> {
        match self {
            OutputFormat::Png => Some(ImageFormat::Png),
            OutputFormat::Svg => Some(ImageFormat::Svg),
            OutputFormat::Csv => None,
        }
    }
}

/// 桩顶约束
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum HeadArg {
    /// Head free to rotate
    Free,
    /// Head rotation restrained, free to translate
    Fixed,
}

impl From<HeadArg> for HeadCondition {
    fn from(arg: HeadArg) -> Self {
        match arg {
            HeadArg::Free => HeadCondition::FreeHead,
            HeadArg::Fixed => HeadCondition::FixedHead,
        }
    }
}

/// 输出相关的公共参数
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output directory (defaults to the project file's directory)
    #[arg(short, long, env = "PILEKIT_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Output format (chart format defaults to the user config)
    #[arg(short, long, value_enum, env = "PILEKIT_FORMAT")]
    pub format: Option<OutputFormat>,
}

// ─────────────────────────────────────────────────────────────
// curves 子命令
// ─────────────────────────────────────────────────────────────

/// curves 子命令参数
#[derive(Args, Debug)]
pub struct CurvesArgs {
    /// Project file
    pub file: PathBuf,

    #[command(flatten)]
    pub out: OutputArgs,
}

// ─────────────────────────────────────────────────────────────
// analyze 主命令
// ─────────────────────────────────────────────────────────────

/// analyze 主命令参数
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(subcommand)]
    pub command: AnalyzeCommands,
}

/// analyze 子命令
#[derive(Subcommand, Debug)]
pub enum AnalyzeCommands {
    /// Load-settlement analysis under the axial head load
    Axial(AxialArgs),

    /// Lateral analysis under the head lateral load and moment
    Lateral(LateralArgs),
}

/// 轴向分析参数
#[derive(Args, Debug)]
pub struct AxialArgs {
    /// Project file
    pub file: PathBuf,

    /// Override the axial load (kN)
    #[arg(long, allow_hyphen_values = true)]
    pub load: Option<f64>,

    /// Override the number of pile segments
    #[arg(long)]
    pub segments: Option<usize>,

    /// Override the number of load steps
    #[arg(long)]
    pub steps: Option<usize>,

    #[command(flatten)]
    pub out: OutputArgs,
}

/// 水平分析参数
#[derive(Args, Debug)]
pub struct LateralArgs {
    /// Project file
    pub file: PathBuf,

    /// Override the lateral head load (kN)
    #[arg(long, allow_hyphen_values = true)]
    pub lateral: Option<f64>,

    /// Override the head moment (kN·m)
    #[arg(long, allow_hyphen_values = true)]
    pub moment: Option<f64>,

    /// Override the head condition
    #[arg(long, value_enum)]
    pub head: Option<HeadArg>,

    /// Override the number of nodes along the pile
    #[arg(long)]
    pub nodes: Option<usize>,

    /// Override the number of load steps
    #[arg(long)]
    pub steps: Option<usize>,

    #[command(flatten)]
    pub out: OutputArgs,
}
