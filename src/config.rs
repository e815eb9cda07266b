//! # 用户配置
//!
//! 保存在平台配置目录下的 `config.json`（`directories::ProjectDirs`），
//! 提供绘图尺寸与默认图像格式。缺失的键取默认值。
//!
//! ## 依赖关系
//! - 被 `commands/config.rs` 与需要绘图的命令使用
//! - 使用 `plot::ImageFormat`

use crate::plot::{ImageFormat, PlotOptions};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 可通过 `config set` 修改的键
pub const CONFIG_KEYS: [&str; 3] = ["plot_width", "plot_height", "plot_format"];

/// 用户配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub plot_width: u32,
    pub plot_height: u32,
    pub plot_format: ImageFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        let opts = PlotOptions::default();
        AppConfig {
            plot_width: opts.width,
            plot_height: opts.height,
            plot_format: opts.format,
        }
    }
}

impl AppConfig {
    /// 按键名修改配置
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "plot_width" | "plot_height" => {
                let v: u32 = value
                    .trim()
                    .parse()
                    .with_context(|| format!("'{}' is not a valid pixel size", value))?;
                if !(100..=10_000).contains(&v) {
                    bail!("{} must be between 100 and 10000 pixels", key);
                }
                if key == "plot_width" {
                    self.plot_width = v;
                } else {
                    self.plot_height = v;
                }
            }
            "plot_format" => {
                self.plot_format = value.parse()?;
            }
            _ => bail!(
                "unknown config key '{}', expected one of: {}",
                key,
                CONFIG_KEYS.join(", ")
            ),
        }
        Ok(())
    }

    /// 绘图选项；`format` 覆盖配置中的默认格式
    pub fn plot_options(&self, format: Option<ImageFormat>) -> PlotOptions {
        PlotOptions {
            width: self.plot_width,
            height: self.plot_height,
            format: format.unwrap_or(self.plot_format),
        }
    }
}

/// 配置管理器
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// 默认配置路径
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("org", "pilekit", "pilekit")
            .map(|d| d.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("pilekit-config.json"))
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// 加载配置，文件不存在时返回默认值
    pub fn load(&self) -> Result<AppConfig> {
        if self.config_path.exists() {
            let content = std::fs::read_to_string(&self.config_path)
                .with_context(|| format!("reading {}", self.config_path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", self.config_path.display()))
        } else {
            Ok(AppConfig::default())
        }
    }

    pub fn save(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(config)?;
        std::fs::write(&self.config_path, content)
            .with_context(|| format!("writing {}", self.config_path.display()))?;
        Ok(())
    }

    /// 重置为默认配置
    pub fn reset(&self) -> Result<()> {
        self.save(&AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_save_load() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().join("config.json"));

        assert_eq!(manager.load().unwrap(), AppConfig::default());

        let mut config = AppConfig::default();
        config.set("plot_width", "1600").unwrap();
        config.set("plot_format", "svg").unwrap();
        manager.save(&config).unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(loaded.plot_width, 1600);
        assert_eq!(loaded.plot_format, ImageFormat::Svg);

        manager.reset().unwrap();
        assert_eq!(manager.load().unwrap(), AppConfig::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"plot_height": 900}"#).unwrap();
        let config = ConfigManager::new(path).load().unwrap();
        assert_eq!(config.plot_height, 900);
        assert_eq!(config.plot_width, AppConfig::default().plot_width);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = AppConfig::default();
        assert!(config.set("plot_width", "abc").is_err());
        assert!(config.set("plot_height", "20").is_err());
        assert!(config.set("colour", "red").is_err());
        assert!(config.set("plot_format", "gif").is_err());

        let opts = config.plot_options(Some(ImageFormat::Svg));
        assert_eq!(opts.format, ImageFormat::Svg);
    }
}
