//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `models/`, `io/`, `curves/`, `analysis/`, `plot/`, `utils/`
//! - 子模块: project, curves, analyze, batch, config

pub mod analyze;
pub mod batch;
pub mod config;
pub mod curves;
pub mod project;

use crate::cli::Commands;
use crate::config::{AppConfig, ConfigManager};
use crate::error::{PileError, Result};
use crate::io::PROJECT_SUFFIX;
use crate::utils::output;

use std::fs;
use std::path::{Path, PathBuf};

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::New(args) => project::execute_new(args),
        Commands::Show(args) => project::execute_show(args),
        Commands::Pile(args) => project::execute_pile(args),
        Commands::Loads(args) => project::execute_loads(args),
        Commands::Layer(args) => project::execute_layer(args),
        Commands::Curves(args) => curves::execute(args),
        Commands::Analyze(args) => analyze::execute(args),
        Commands::Batch(args) => batch::execute(args),
        Commands::Config(args) => config::execute(args),
    }
}

/// 项目名：去掉 `.rspile.json` 或扩展名后的文件名
pub(crate) fn project_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("project");
    if let Some(stem) = name.strip_suffix(PROJECT_SUFFIX) {
        return stem.to_string();
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("project")
        .to_string()
}

/// 输出目录：显式指定，或项目文件旁的 `<name>_results`
pub(crate) fn prepare_output_dir(file: &Path, output: Option<&Path>) -> Result<PathBuf> {
    let dir = match output {
        Some(dir) => dir.to_path_buf(),
        None => file
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(format!("{}_results", project_stem(file))),
    };
    fs::create_dir_all(&dir).map_err(|e| PileError::FileWriteError {
        path: dir.display().to_string(),
        source: e,
    })?;
    Ok(dir)
}

/// 读取用户配置；失败时提示并使用默认值
pub(crate) fn user_config() -> AppConfig {
    match ConfigManager::new(ConfigManager::default_path()).load() {
        Ok(config) => config,
        Err(e) => {
            output::print_warning(&format!("Ignoring unreadable config: {:#}", e));
            AppConfig::default()
        }
    }
}

/// 打印非致命警告
pub(crate) fn print_warnings(warnings: &[String]) {
    for w in warnings {
        output::print_warning(w);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_project_stem() {
        assert_eq!(project_stem(Path::new("a/site1.rspile.json")), "site1");
        assert_eq!(project_stem(Path::new("b/site2.json")), "site2");
    }

    #[test]
    fn test_prepare_output_dir_defaults_next_to_project() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("demo.rspile.json");
        let out = prepare_output_dir(&file, None).unwrap();
        assert_eq!(out, dir.path().join("demo_results"));
        assert!(out.is_dir());
    }
}
