//! # config 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/config.rs`

use clap::{Args, Subcommand};

/// config 主命令参数
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// config 子命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the current configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Restore the default configuration
    Reset,

    /// Set a configuration value (plot_width, plot_height, plot_format)
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },
}
