//! # 统一错误处理模块
//!
//! 定义 pilekit 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// pilekit 统一错误类型
#[derive(Error, Debug)]
pub enum PileError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("File already exists: {path} (use --force to overwrite)")]
    FileExists { path: String },

    // ─────────────────────────────────────────────────────────────
    // 项目文件错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse project file: {path}\nReason: {source}")]
    ProjectParseError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize project: {0}")]
    SerializeError(#[source] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // 输入校验错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid pile: {0}")]
    InvalidPile(String),

    #[error("Invalid soil layer: {0}")]
    InvalidLayer(String),

    #[error("Missing project data: {0}")]
    MissingData(String),

    // ─────────────────────────────────────────────────────────────
    // 求解器错误
    // ─────────────────────────────────────────────────────────────
    #[error("Linear system could not be solved ({size}x{size})")]
    SingularSystem { size: usize },

    // ─────────────────────────────────────────────────────────────
    // 输出错误
    // ─────────────────────────────────────────────────────────────
    #[error("Plotting failed: {0}")]
    PlotError(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No matching files found with pattern: {pattern}")]
    NoFilesFound { pattern: String },
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, PileError>;
