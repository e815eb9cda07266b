//! # 水平分析命令实现
//!
//! 读取项目，分级施加桩顶水平力与弯矩，输出桩顶响应表、
//! 桩身分布 CSV、图表与报告。
//!
//! ## 依赖关系
//! - 使用 `cli/analyze.rs` 定义的 LateralArgs
//! - 使用 `analysis/lateral.rs`, `io/`, `plot/charts.rs`
//! - `write_outputs` 同时被 `commands/batch.rs` 调用

use super::plot_options;
use crate::analysis::{run_lateral, LateralResults};
use crate::cli::analyze::LateralArgs;
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
    #[tabled(rename = "H (kN)")]
    lateral: String,
    #[tabled(rename = "M (kN·m)")]
    moment: String,
    #[tabled(rename = "y head (mm)")]
    deflection: String,
    #[tabled(rename = "θ head (mrad)")]
    rotation: String,
    #[tabled(rename = "Iterations")]
    iterations: usize,
    #[tabled(rename = "Converged")]
    converged: String,
}

/// 执行水平分析
pub fn execute(args: LateralArgs) -> Result<()> {
    output::print_header("Lateral Pile Analysis");

    let mut project = load_project(&args.file)?;
    if let Some(head) = args.head {
        project.analysis.head_condition = head.into();
    }
    if let Some(n) = args.nodes {
        project.analysis.lateral_nodes = n;
    }
    if let Some(n) = args.steps {
        project.analysis.lateral_load_steps = n;
    }

    let pile = project.require_pile()?.clone();
    let profile = project.require_profile()?;
    let (lateral_kn, moment_knm) = match (args.lateral, args.moment) {
        (Some(h), Some(m)) => (h, m),
        (h, m) => {
            let loads = project.require_loads()?;
            (h.unwrap_or(loads.lateral_kn), m.unwrap_or(loads.moment_knm))
        }
    };
    pile.validate()?;
    print_warnings(&profile.validate()?);

    output::print_kv("Lateral load", &format!("{} kN", lateral_kn));
    output::print_kv("Head moment", &format!("{} kN·m", moment_knm));
    output::print_kv("Head condition", &project.analysis.head_condition.to_string());

    let spinner = progress::create_spinner("Solving load steps...");
    let result = run_lateral(&pile, profile, &project.analysis, lateral_kn, moment_knm);
    spinner.finish_and_clear();
    let res = result?;

    print_results(&res);

    let dir = prepare_output_dir(&args.file, args.out.output.as_deref())?;
    let plot = plot_options(&args.out, &user_config());
    for (kind, path) in write_outputs(&project, &res, &dir, plot.as_ref())? {
        output::print_written(kind, &path);
    }

    if res.all_converged() {
        output::print_done("Lateral analysis complete");
    } else {
        output::print_warning("Lateral analysis did not fully converge; results are approximate");
    }
    Ok(())
}

fn print_results(res: &LateralResults) {
    let rows: Vec<StepRow> = res
        .steps
        .iter()
        .enumerate()
        .map(|(i, s)| StepRow {
            step: i + 1,
            lateral: format!("{:.1}", s.lateral_kn),
            moment: format!("{:.1}", s.moment_knm),
            deflection: format!("{:.3}", s.head_deflection_mm),
            rotation: format!("{:.3}", s.head_rotation_mrad),
            iterations: s.iterations,
            converged: if s.converged { "yes" } else { "no" }.to_string(),
        })
        .collect();
    println!();
    println!("{}", Table::new(&rows));

    if let Some(step) = res.last_step() {
        let (z, m) = step.profile.max_moment();
        output::print_separator();
        output::print_kv("EI", &format!("{:.4e} N·m²", res.ei_nm2));
        output::print_kv("Head deflection", &format!("{:.3} mm", step.head_deflection_mm));
        output::print_kv("Head rotation", &format!("{:.3} mrad", step.head_rotation_mrad));
        output::print_kv("Max moment", &format!("{:.2} kN·m at {:.2} m", m / 1e3, z));
        output::print_separator();
    }
}

/// 写出水平分析的 CSV、图表与报告，返回 (类型, 路径) 列表
pub(crate) fn write_outputs(
    project: &Project,
    res: &LateralResults,
    dir: &Path,
    plot: Option<&PlotOptions>,
) -> Result<Vec<(&'static str, PathBuf)>> {
    let mut written = Vec::new();

    if let Some(step) = res.last_step() {
        let path = dir.join("lateral_profile.csv");
        export::lateral_profile_to_csv(&step.profile, &path)?;
        written.push(("csv", path));
    }

    let path = dir.join("lateral_head_curve.csv");
    export::head_curve_to_csv(res, &path)?;
    written.push(("csv", path));

    if let Some(opts) = plot {
        let ext = opts.format.extension();
        for path in charts::plot_lateral_profiles(res, dir, opts)? {
            written.push((ext, path));
        }
        written.push((ext, charts::plot_head_curve(res, dir, opts)?));
    }

    let path = dir.join("lateral_report.txt");
    let text = report::build_report("Lateral Analysis Report", project, None, Some(res));
    report::write_report(&text, &path)?;
    written.push(("report", path));

    Ok(written)
}
