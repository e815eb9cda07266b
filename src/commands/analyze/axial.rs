//! # 轴向分析命令实现
//!
//! 读取项目，分级加载求解荷载-沉降曲线，输出表格、CSV、图表与报告。
//!
//! ## 依赖关系
//! - 使用 `cli/analyze.rs` 定义的 AxialArgs
//! - 使用 `analysis/axial.rs`, `io/`, `plot/charts.rs`
//! - `write_outputs` 同时被 `commands/batch.rs` 调用

use super::plot_options;
use crate::analysis::{run_axial, AxialResults};
use crate::cli::analyze::AxialArgs;
use crate::commands::{prepare_output_dir, print_warnings, user_config};
use crate::error::Result;
use crate::io::{export, load_project, report};
use crate::models::Project;
use crate::plot::{charts, PlotOptions};
use crate::utils::{output, progress};

use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct StepRow {
    #[tabled(rename = "Step")]
    step: usize,
    #[tabled(rename = "Load (kN)")]
    load: String,
    #[tabled(rename = "Settlement (mm)")]
    settlement: String,
    #[tabled(rename = "Iterations")]
    iterations: usize,
    #[tabled(rename = "Converged")]
    converged: String,
}

/// 执行轴向分析
pub fn execute(args: AxialArgs) -> Result<()> {
    output::print_header("Axial Load-Settlement Analysis");

    let mut project = load_project(&args.file)?;
    if let Some(n) = args.segments {
        project.analysis.segments = n;
    }
    if let Some(n) = args.steps {
        project.analysis.axial_load_steps = n;
    }

    let pile = project.require_pile()?.clone();
    let profile = project.require_profile()?;
    let load_kn = match args.load {
        Some(p) => p,
        None => project.require_loads()?.axial_kn,
    };
    pile.validate()?;
    print_warnings(&profile.validate()?);

    output::print_kv("Axial load", &format!("{} kN", load_kn));
    output::print_kv(
        "Segments",
        &project.analysis.segments.max(10).to_string(),
    );

    let spinner = progress::create_spinner("Solving load steps...");
    let result = run_axial(&pile, profile, &project.analysis, load_kn);
    spinner.finish_and_clear();
    let res = result?;

    print_results(&res);

    let dir = prepare_output_dir(&args.file, args.out.output.as_deref())?;
    let plot = plot_options(&args.out, &user_config());
    for (kind, path) in write_outputs(&project, &res, &dir, plot.as_ref())? {
        output::print_written(kind, &path);
    }

    if res.all_converged() {
        output::print_done("Axial analysis complete");
    } else {
        output::print_warning("Some load steps did not converge; the load may exceed capacity");
    }
    Ok(())
}

fn print_results(res: &AxialResults) {
    let rows: Vec<StepRow> = res
        .steps
        .iter()
        .enumerate()
        .map(|(i, s)| StepRow {
            step: i,
            load: format!("{:.1}", s.load_kn),
            settlement: format!("{:.3}", s.head_settlement_m * 1e3),
            iterations: s.iterations,
            converged: if s.converged { "yes" } else { "no" }.to_string(),
        })
        .collect();
    println!();
    println!("{}", Table::new(&rows));

    let (settlement, _) = res.max_settlement();
    let cap = &res.capacity;
    output::print_separator();
    output::print_kv("Max settlement", &format!("{:.4} m", settlement));
    output::print_kv("Toe resistance", &format!("{:.2} N", res.toe_resistance_n));
    output::print_kv("Ultimate shaft", &format!("{:.1} kN", cap.shaft_kn));
    output::print_kv("Ultimate toe", &format!("{:.1} kN", cap.toe_kn));
    output::print_kv("Ultimate total", &format!("{:.1} kN", cap.total_kn));
    output::print_kv("Pile self weight", &format!("{:.1} kN", cap.self_weight_kn));
    output::print_separator();
}

/// 写出轴向分析的 CSV、图表与报告，返回 (类型, 路径) 列表
pub(crate) fn write_outputs(
    project: &Project,
    res: &AxialResults,
    dir: &Path,
    plot: Option<&PlotOptions>,
) -> Result<Vec<(&'static str, PathBuf)>> {
    let mut written = Vec::new();

    let path = dir.join("load_settlement.csv");
    export::load_settlement_to_csv(res, &path)?;
    written.push(("csv", path));

    let path = dir.join("axial_profile.csv");
    export::axial_profile_to_csv(res, &path)?;
    written.push(("csv", path));

    if let Some(opts) = plot {
        let ext = opts.format.extension();
        written.push((ext, charts::plot_load_settlement(res, dir, opts)?));
        written.push((ext, charts::plot_shaft_shear(res, dir, opts)?));
    }

    let path = dir.join("axial_report.txt");
    let text = report::build_report("Axial Analysis Report", project, Some(res), None);
    report::write_report(&text, &path)?;
    written.push(("report", path));

    Ok(written)
}
