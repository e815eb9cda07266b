//! # pilekit - 单桩轴向与水平受荷分析
//!
//! 以 t-z、q-z、p-y 土弹簧分析单桩的荷载-沉降与水平响应，
//! 项目以 JSON 文件保存，结果输出为表格、CSV、图表与文本报告。
//!
//! ## 子命令
//! - `new` / `show` / `pile` / `loads` / `layer` - 项目编辑
//! - `curves` - 土弹簧曲线预览
//! - `analyze` - 分析功能
//!   - `axial` - 轴向荷载-沉降
//!   - `lateral` - 水平受荷
//! - `batch` - 批量并行分析
//! - `config` - 用户配置
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── models/    (项目数据模型)
//!   │     ├── io/        (项目文件、CSV、报告)
//!   │     ├── curves/    (土弹簧曲线)
//!   │     ├── analysis/  (轴向与水平求解器)
//!   │     ├── plot/      (图表)
//!   │     └── batch/     (批量处理)
//!   ├── config.rs   (用户配置)
//!   ├── utils/      (输出、进度条、日志)
//!   └── error.rs    (错误处理)
//! ```

mod analysis;
mod batch;
mod cli;
mod commands;
mod config;
mod curves;
mod error;
mod io;
mod models;
mod plot;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    utils::logging::init_logging(cli.verbose);

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
