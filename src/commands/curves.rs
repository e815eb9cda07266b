//! # curves 命令实现
//!
//! 生成每层中点处的 t-z、p-y 曲线与桩端 q-z 曲线，
//! 写出 CSV 数据，并按需绘图。
//!
//! ## 依赖关系
//! - 使用 `cli/analyze.rs` 定义的 CurvesArgs
//! - 使用 `curves/`, `io/export.rs`, `plot/charts.rs`

use super::{prepare_output_dir, print_warnings, user_config};
use super::analyze::plot_options;
use crate::cli::analyze::CurvesArgs;
use crate::curves::generate_curve_set;
use crate::error::Result;
use crate::io::{export, load_project};
use crate::plot::charts;
use crate::utils::output;

use tabled::{Table, Tabled};

#[derive(Tabled)]
struct CurveRow {
    #[tabled(rename = "Curve")]
    name: String,
    #[tabled(rename = "Soil")]
    soil: String,
    #[tabled(rename = "Depth (m)")]
    depth: String,
    #[tabled(rename = "Peak")]
    peak: String,
}

/// 执行 curves 命令
pub fn execute(args: CurvesArgs) -> Result<()> {
    output::print_header("Soil Spring Curves");

    let project = load_project(&args.file)?;
    let pile = project.require_pile()?;
    let profile = project.require_profile()?;
    print_warnings(&profile.validate()?);

    let curves = generate_curve_set(pile, profile)?;
    let dir = prepare_output_dir(&args.file, args.out.output.as_deref())?;

    let plot_opts = plot_options(&args.out, &user_config());

    let mut rows = Vec::with_capacity(curves.len());
    for curve in &curves {
        let csv_path = dir.join(format!("{}.csv", curve.file_stem()));
        export::curve_to_csv(curve, &csv_path)?;
        output::print_written("csv", &csv_path);

        if let Some(opts) = &plot_opts {
            let path = charts::plot_curve(curve, &dir, opts)?;
            output::print_written(opts.format.extension(), &path);
        }

        rows.push(CurveRow {
            name: curve.file_stem(),
            soil: curve.soil.clone(),
            depth: format!("{:.2}", curve.depth_m),
            peak: format!("{:.2}", curve.curve.max_y()),
        });
    }

    println!();
    println!("{}", Table::new(&rows));
    output::print_done(&format!(
        "{} curves written to '{}'",
        curves.len(),
        dir.display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::analyze::{OutputArgs, OutputFormat};
    use crate::error::PileError;
    use crate::io::save_project;
    use crate::models::{Pile, Project, SoilLayer};
    use tempfile::tempdir;

    fn args(file: std::path::PathBuf, out: std::path::PathBuf) -> CurvesArgs {
        CurvesArgs {
            file,
            out: OutputArgs {
                output: Some(out),
                format: Some(OutputFormat::Csv),
            },
        }
    }

    #[test]
    fn test_curves_written_as_csv() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("site.rspile.json");
        let mut project = Project::new();
        project.pile = Some(Pile::new(15.0, 0.5, 30e9, 24.0));
        project.soil_profile.add(SoilLayer::clay(0.0, 8.0, 18.0, 40.0));
        project.soil_profile.add(SoilLayer::sand(8.0, 20.0, 19.0, 32.0));
        save_project(&project, &file).unwrap();

        let out = dir.path().join("curves");
        execute(args(file, out.clone())).unwrap();
        assert!(out.join("tz_layer1.csv").exists());
        assert!(out.join("py_layer2.csv").exists());
        assert!(out.join("qz_tip.csv").exists());
    }

    #[test]
    fn test_overlapping_profile_rejected() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("overlap.rspile.json");
        let mut project = Project::new();
        project.pile = Some(Pile::new(15.0, 0.5, 30e9, 24.0));
        project.soil_profile.add(SoilLayer::clay(0.0, 10.0, 18.0, 40.0));
        project.soil_profile.add(SoilLayer::sand(5.0, 20.0, 19.0, 32.0));
        save_project(&project, &file).unwrap();

        let out = dir.path().join("curves");
        assert!(matches!(
            execute(args(file, out.clone())),
            Err(PileError::InvalidLayer(_))
        ));
        assert!(!out.exists());
    }
}
