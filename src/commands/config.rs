//! # config 命令实现
//!
//! 查看与修改用户配置（`config.json`）。
//!
//! ## 依赖关系
//! - 使用 `cli/config.rs` 定义的参数
//! - 使用 `config.rs` 的 ConfigManager

use crate::cli::config::{ConfigArgs, ConfigCommands};
use crate::config::ConfigManager;
use crate::error::{PileError, Result};
use crate::utils::output;

/// 执行 config 命令
pub fn execute(args: ConfigArgs) -> Result<()> {
    let manager = ConfigManager::new(ConfigManager::default_path());
    run_with(&manager, args.command).map_err(|e| PileError::Config(format!("{:#}", e)))
}

fn run_with(manager: &ConfigManager, cmd: ConfigCommands) -> anyhow::Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let config = manager.load()?;
            output::print_header("pilekit Configuration");
            output::print_kv("plot_width", &config.plot_width.to_string());
            output::print_kv("plot_height", &config.plot_height.to_string());
            output::print_kv("plot_format", &config.plot_format.to_string());
            output::print_kv("file", &manager.path().display().to_string());
        }
        ConfigCommands::Path => {
            println!("{}", manager.path().display());
        }
        ConfigCommands::Reset => {
            manager.reset()?;
            output::print_success("Configuration reset to defaults");
        }
        ConfigCommands::Set { key, value } => {
            let mut config = manager.load()?;
            config.set(&key, &value)?;
            manager.save(&config)?;
            output::print_success(&format!("{} = {}", key, value));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::ImageFormat;
    use tempfile::tempdir;

    #[test]
    fn test_set_and_reset() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().join("config.json"));

        run_with(
            &manager,
            ConfigCommands::Set {
                key: "plot_format".to_string(),
                value: "svg".to_string(),
            },
        )
        .unwrap();
        assert_eq!(manager.load().unwrap().plot_format, ImageFormat::Svg);

        let err = run_with(
            &manager,
            ConfigCommands::Set {
                key: "dpi".to_string(),
                value: "300".to_string(),
            },
        );
        assert!(err.is_err());

        run_with(&manager, ConfigCommands::Reset).unwrap();
        assert_eq!(manager.load().unwrap().plot_format, ImageFormat::Png);
    }
}
