//! # analyze 命令实现
//!
//! 分析功能统一入口：
//! - `axial`: 轴向荷载-沉降
//! - `lateral`: 水平受荷
//!
//! ## 依赖关系
//! - 使用 `cli/analyze.rs` 定义的参数
//! - 子模块: axial, lateral

pub mod axial;
pub mod lateral;

use crate::cli::analyze::{AnalyzeArgs, AnalyzeCommands, OutputArgs, OutputFormat};
use crate::config::AppConfig;
use crate::error::Result;
use crate::plot::PlotOptions;

/// 执行 analyze 命令
pub fn execute(args: AnalyzeArgs) -> Result<()> {
    match args.command {
        AnalyzeCommands::Axial(a) => axial::execute(a),
        AnalyzeCommands::Lateral(a) => lateral::execute(a),
    }
}

/// 由输出参数确定绘图选项；`csv` 格式不绘图
pub(crate) fn plot_options(out: &OutputArgs, config: &AppConfig) -> Option<PlotOptions> {
    match out.format {
        Some(OutputFormat::Csv) => None,
        Some(f) => Some(config.plot_options(f.image_format())),
        None => Some(config.plot_options(None)),
    }
}
