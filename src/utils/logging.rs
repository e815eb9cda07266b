//! # 日志初始化
//!
//! `tracing-subscriber` 输出到 stderr。默认级别 warn，`--verbose` 为 debug，
//! 设置 `RUST_LOG` 时以其为准。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pilekit={}", default_level)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    // 重复初始化（测试中）时忽略
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init();
}
