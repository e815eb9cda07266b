//! # 批量执行器
//!
//! 并行执行批量处理任务。
//!
//! ## 功能
//! - 基于 rayon 的并行迭代
//! - 进度条显示
//! - 错误收集与汇总报告
//!
//! ## 依赖关系
//! - 被 `commands/batch.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::utils::progress;

use rayon::prelude::*;
use std::path::PathBuf;

/// 单个项目处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessResult {
    /// 处理成功
    Success(String),
    /// 跳过（输出已存在）
    Skipped(String),
    /// 处理失败：(文件路径, 错误信息)
    Failed(String, String),
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
    /// 失败详情
    pub failures: Vec<(String, String)>,
}

impl BatchResult {
    pub fn merge(&mut self, result: ProcessResult) {
        match result {
            ProcessResult::Success(_) => self.success += 1,
            ProcessResult::Skipped(_) => self.skipped += 1,
            ProcessResult::Failed(path, err) => {
                self.failed += 1;
                self.failures.push((path, err));
            }
        }
    }

    pub fn total(&self) -> usize {
        self.success + self.skipped + self.failed
    }
}

/// 批量执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
    show_progress: bool,
}

impl BatchRunner {
    /// `jobs` 为 0 时使用 CPU 核数
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self {
            jobs,
            show_progress: true,
        }
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// 并行处理文件列表
    pub fn run<F>(&self, files: &[PathBuf], processor: F) -> BatchResult
    where
        F: Fn(&PathBuf) -> ProcessResult + Sync + Send,
    {
        let pb = if self.show_progress {
            progress::create_progress_bar(files.len() as u64, "Analyzing")
        } else {
            indicatif::ProgressBar::hidden()
        };

        let work = || -> Vec<ProcessResult> {
            files
                .par_iter()
                .map(|file| {
                    let result = processor(file);
                    pb.inc(1);
                    result
                })
                .collect()
        };

        let results = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
        {
            Ok(pool) => pool.install(work),
            Err(e) => {
                tracing::warn!(error = %e, "could not build thread pool, using the global pool");
                work()
            }
        };

        pb.finish_and_clear();

        let mut batch_result = BatchResult::default();
        for result in results {
            batch_result.merge(result);
        }
        batch_result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_counts_outcomes() {
        let files: Vec<PathBuf> = (0..9).map(|i| PathBuf::from(format!("p{}.json", i))).collect();
        let runner = BatchRunner::new(2).show_progress(false);
        let result = runner.run(&files, |f| {
            let name = f.display().to_string();
            match name.as_bytes()[1] % 3 {
                0 => ProcessResult::Success(name),
                1 => ProcessResult::Skipped(name),
                _ => ProcessResult::Failed(name, "boom".to_string()),
            }
        });
        assert_eq!(result.total(), 9);
        assert_eq!(result.success, 3);
        assert_eq!(result.skipped, 3);
        assert_eq!(result.failed, 3);
        assert_eq!(result.failures.len(), 3);
    }

    #[test]
    fn test_zero_jobs_uses_cpu_count() {
        assert_eq!(BatchRunner::new(0).jobs(), num_cpus::get());
    }
}
