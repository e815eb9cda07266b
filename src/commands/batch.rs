//! # batch 命令实现
//!
//! 收集目录下的项目文件，并行运行轴向和/或水平分析，
//! 每个项目输出到 `<output>/<相对目录>/<name>/`，相对目录取自输入根目录。
//!
//! ## 依赖关系
//! - 使用 `cli/batch.rs` 定义的 BatchArgs
//! - 使用 `batch/` 模块进行收集与并行执行
//! - 使用 `commands/analyze/` 的输出函数

use super::analyze::{axial, lateral};
use super::{project_stem, user_config};
use crate::analysis::{run_axial, run_lateral};
use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::batch::{BatchAnalysis, BatchArgs};
use crate::error::{PileError, Result};
use crate::io::{load_project, report};
use crate::plot::PlotOptions;
use crate::utils::output;

use std::fs;
use std::path::{Path, PathBuf};

/// 批量任务的共享配置
struct BatchConfig {
    input_root: PathBuf,
    output_root: PathBuf,
    analysis: BatchAnalysis,
    plot: Option<PlotOptions>,
    overwrite: bool,
}

/// 执行 batch 命令
pub fn execute(args: BatchArgs) -> Result<()> {
    output::print_header("Batch Pile Analysis");

    let files = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)?
        .recursive(args.recursive)
        .collect()?;
    output::print_info(&format!("Found {} project file(s)", files.len()));

    fs::create_dir_all(&args.output).map_err(|e| PileError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    let config = BatchConfig {
        input_root: args.input.clone(),
        output_root: args.output.clone(),
        analysis: args.analysis,
        plot: args
            .format
            .image_format()
            .map(|f| user_config().plot_options(Some(f))),
        overwrite: args.overwrite,
    };

    let runner = BatchRunner::new(args.jobs);
    output::print_info(&format!("Running with {} job(s)", runner.jobs()));
    let result = runner.run(&files, |file| process_project(file, &config));

    output::print_separator();
    output::print_success(&format!(
        "Batch complete: {} success, {} skipped, {} failed",
        result.success, result.skipped, result.failed
    ));

    if !result.failures.is_empty() {
        output::print_warning("Failed projects:");
        for (path, err) in result.failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", path, err));
        }
        if result.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", result.failures.len() - 10));
        }
    }

    Ok(())
}

/// 项目输出目录：保留相对输入根目录的子路径，避免同名项目互相覆盖
fn output_dir(file: &Path, config: &BatchConfig) -> PathBuf {
    let rel = file
        .strip_prefix(&config.input_root)
        .ok()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new(""));
    config.output_root.join(rel).join(project_stem(file))
}

/// 处理单个项目
fn process_project(file: &Path, config: &BatchConfig) -> ProcessResult {
    let dir = output_dir(file, config);
    let report_path = dir.join("report.txt");

    if report_path.exists() && !config.overwrite {
        return ProcessResult::Skipped(file.display().to_string());
    }

    match analyze_project(file, &dir, &report_path, config) {
        Ok(()) => ProcessResult::Success(file.display().to_string()),
        Err(e) => {
            tracing::debug!(file = %file.display(), error = %e, "batch project failed");
            ProcessResult::Failed(file.display().to_string(), e.to_string())
        }
    }
}

fn analyze_project(file: &Path, dir: &Path, report_path: &Path, config: &BatchConfig) -> Result<()> {
    let project = load_project(file)?;
    project.validate_for_analysis()?;
    let pile = project.require_pile()?;
    let loads = project.require_loads()?;
    let profile = &project.soil_profile;

    fs::create_dir_all(dir).map_err(|e| PileError::FileWriteError {
        path: dir.display().to_string(),
        source: e,
    })?;

    let axial_res = if config.analysis.axial() {
        let res = run_axial(pile, profile, &project.analysis, loads.axial_kn)?;
        axial::write_outputs(&project, &res, dir, config.plot.as_ref())?;
        Some(res)
    } else {
        None
    };

    let lateral_res = if config.analysis.lateral() {
        let res = run_lateral(
            pile,
            profile,
            &project.analysis,
            loads.lateral_kn,
            loads.moment_knm,
        )?;
        lateral::write_outputs(&project, &res, dir, config.plot.as_ref())?;
        Some(res)
    } else {
        None
    };

    let title = format!("Pile Analysis Report: {}", project_stem(file));
    let text = report::build_report(&title, &project, axial_res.as_ref(), lateral_res.as_ref());
    report::write_report(&text, report_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::save_project;
    use crate::models::{Loads, Pile, Project, SoilLayer};
    use tempfile::tempdir;

    fn write_demo(path: &Path) {
        let mut project = Project::new();
        project.pile = Some(Pile::new(15.0, 0.5, 30e9, 24.0));
        project.loads = Some(Loads {
            axial_kn: 200.0,
            lateral_kn: 40.0,
            moment_knm: 0.0,
        });
        project
            .soil_profile
            .add(SoilLayer::clay(0.0, 20.0, 18.0, 50.0));
        save_project(&project, path).unwrap();
    }

    #[test]
    fn test_process_project_then_skip() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("demo.rspile.json");
        write_demo(&file);

        let config = BatchConfig {
            input_root: dir.path().to_path_buf(),
            output_root: dir.path().join("out"),
            analysis: BatchAnalysis::Both,
            plot: None,
            overwrite: false,
        };

        assert!(matches!(
            process_project(&file, &config),
            ProcessResult::Success(_)
        ));
        let out = dir.path().join("out").join("demo");
        assert!(out.join("report.txt").exists());
        assert!(out.join("load_settlement.csv").exists());
        assert!(out.join("lateral_head_curve.csv").exists());

        assert!(matches!(
            process_project(&file, &config),
            ProcessResult::Skipped(_)
        ));
    }

    #[test]
    fn test_incomplete_project_fails() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("empty.rspile.json");
        save_project(&Project::new(), &file).unwrap();

        let config = BatchConfig {
            input_root: dir.path().to_path_buf(),
            output_root: dir.path().join("out"),
            analysis: BatchAnalysis::Axial,
            plot: None,
            overwrite: true,
        };
        match process_project(&file, &config) {
            ProcessResult::Failed(_, msg) => assert!(msg.contains("pile")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_same_stem_in_subdirs_gets_own_output() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a").join("site.rspile.json");
        let b = dir.path().join("b").join("site.rspile.json");
        write_demo(&a);
        write_demo(&b);

        let config = BatchConfig {
            input_root: dir.path().to_path_buf(),
            output_root: dir.path().join("out"),
            analysis: BatchAnalysis::Axial,
            plot: None,
            overwrite: false,
        };
        let files = FileCollector::new(dir.path().to_path_buf())
            .recursive(true)
            .with_pattern("*.rspile.json")
            .unwrap()
            .collect()
            .unwrap();
        assert_eq!(files.len(), 2);

        for file in &files {
            assert!(matches!(
                process_project(file, &config),
                ProcessResult::Success(_)
            ));
        }
        let out = dir.path().join("out");
        assert!(out.join("a").join("site").join("report.txt").exists());
        assert!(out.join("b").join("site").join("report.txt").exists());
    }

    #[test]
    fn test_single_file_input_maps_to_root() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("demo.rspile.json");
        let config = BatchConfig {
            input_root: file.clone(),
            output_root: dir.path().join("out"),
            analysis: BatchAnalysis::Axial,
            plot: None,
            overwrite: false,
        };
        assert_eq!(output_dir(&file, &config), dir.path().join("out").join("demo"));
    }
}
