//! # 项目文件收集器
//!
//! 根据输入路径和模式收集待处理的项目文件。
//!
//! ## 功能
//! - 支持单文件和目录输入
//! - 逗号分隔的多个 glob 模式（匹配文件名）
//! - 递归目录搜索
//!
//! ## 依赖关系
//! - 被 `commands/batch.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob::Pattern` 匹配文件名

use crate::error::{PileError, Result};

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 默认匹配模式
pub const DEFAULT_PATTERN: &str = "*.rspile.json";

/// 文件收集器
pub struct FileCollector {
    input: PathBuf,
    patterns: Vec<Pattern>,
    recursive: bool,
}

impl FileCollector {
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            patterns: Vec::new(),
            recursive: false,
        }
    }

    /// 设置匹配模式（逗号分隔的多模式）
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        let mut patterns = Vec::new();
        for p in pattern.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let compiled = Pattern::new(p).map_err(|e| {
                PileError::InvalidArgument(format!("invalid pattern '{}': {}", p, e.msg))
            })?;
            patterns.push(compiled);
        }
        self.patterns = patterns;
        Ok(self)
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 收集所有匹配的文件（按路径排序）
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        if self.input.is_file() {
            return Ok(vec![self.input.clone()]);
        }
        if !self.input.is_dir() {
            return Err(PileError::DirectoryNotFound {
                path: self.input.display().to_string(),
            });
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let mut files: Vec<PathBuf> = WalkDir::new(&self.input)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| self.matches(e.path()))
            .map(|e| e.path().to_path_buf())
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(PileError::NoFilesFound {
                pattern: self.pattern_list(),
            });
        }
        tracing::debug!(count = files.len(), "collected project files");
        Ok(files)
    }

    fn pattern_list(&self) -> String {
        if self.patterns.is_empty() {
            DEFAULT_PATTERN.to_string()
        } else {
            self.patterns
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join(",")
        }
    }

    /// 文件名是否匹配任一模式
    fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if self.patterns.is_empty() {
            return name.ends_with(&DEFAULT_PATTERN[1..]);
        }
        self.patterns.iter().any(|p| p.matches(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::write(path, "{}").unwrap();
    }

    #[test]
    fn test_collect_default_pattern() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("b.rspile.json"));
        touch(&dir.path().join("a.rspile.json"));
        touch(&dir.path().join("notes.txt"));
        fs::create_dir(dir.path().join("sub")).unwrap();
        touch(&dir.path().join("sub").join("c.rspile.json"));

        let files = FileCollector::new(dir.path().to_path_buf()).collect().unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.rspile.json"));

        let files = FileCollector::new(dir.path().to_path_buf())
            .recursive(true)
            .collect()
            .unwrap();
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_collect_custom_patterns() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("site1.json"));
        touch(&dir.path().join("site2.json"));
        touch(&dir.path().join("other.json"));

        let files = FileCollector::new(dir.path().to_path_buf())
            .with_pattern("site?.json, nothing*")
            .unwrap()
            .collect()
            .unwrap();
        assert_eq!(files.len(), 2);

        let err = FileCollector::new(dir.path().to_path_buf())
            .with_pattern("*.xml")
            .unwrap()
            .collect();
        assert!(matches!(err, Err(PileError::NoFilesFound { .. })));
    }

    #[test]
    fn test_single_file_and_missing_dir() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("one.json");
        touch(&file);
        assert_eq!(FileCollector::new(file.clone()).collect().unwrap(), vec![file]);

        let missing = FileCollector::new(dir.path().join("nope")).collect();
        assert!(matches!(missing, Err(PileError::DirectoryNotFound { .. })));

        assert!(FileCollector::new(dir.path().to_path_buf())
            .with_pattern("[")
            .is_err());
    }
}
