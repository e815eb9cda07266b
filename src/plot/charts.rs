//! # 单桩分析图表
//!
//! 将曲线与分析结果转换为 `ChartSpec` 并渲染。
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `plot/mod.rs`, `analysis/`, `curves/`

use super::{render, ChartSpec, PlotOptions, Series};
use crate::analysis::{AxialResults, LateralResults};
use crate::curves::LabeledCurve;
use crate::error::Result;

use std::path::{Path, PathBuf};

/// 土弹簧曲线图
pub fn plot_curve(curve: &LabeledCurve, dir: &Path, opts: &PlotOptions) -> Result<PathBuf> {
    let path = opts.output_path(dir, &curve.file_stem());
    let spec = ChartSpec {
        title: &curve.title(),
        x_desc: curve.kind.x_label(),
        y_desc: curve.kind.y_label(),
        series: vec![Series::new(curve.kind.to_string(), curve.curve.points.clone())],
        depth_axis: false,
    };
    render(&spec, &path, opts)?;
    Ok(path)
}

/// 荷载-沉降曲线（横轴沉降，纵轴荷载）
pub fn plot_load_settlement(res: &AxialResults, dir: &Path, opts: &PlotOptions) -> Result<PathBuf> {
    let path = opts.output_path(dir, "load_settlement");
    let points = res
        .steps
        .iter()
        .map(|s| (s.head_settlement_m, s.load_kn))
        .collect();
    let spec = ChartSpec {
        title: "Load-Settlement Curve",
        x_desc: "Head Settlement (m)",
        y_desc: "Axial Load (kN)",
        series: vec![Series::new("Load-settlement", points)],
        depth_axis: false,
    };
    render(&spec, &path, opts)?;
    Ok(path)
}

/// 累计桩侧摩阻与轴力沿深度分布
pub fn plot_shaft_shear(res: &AxialResults, dir: &Path, opts: &PlotOptions) -> Result<PathBuf> {
    let path = opts.output_path(dir, "shear_vs_depth");
    let p = &res.profile;
    let shear = p
        .shaft_resistance_n
        .iter()
        .zip(p.z_m.iter())
        .map(|(v, z)| (*v, *z))
        .collect();
    let axial = p
        .axial_force_n
        .iter()
        .zip(p.z_m.iter())
        .map(|(v, z)| (*v, *z))
        .collect();
    let spec = ChartSpec {
        title: "Cumulative Shaft Shear vs Depth",
        x_desc: "Force (N)",
        y_desc: "Depth (m)",
        series: vec![
            Series::new("Cumulative shaft shear", shear),
            Series::new("Axial force", axial),
        ],
        depth_axis: true,
    };
    render(&spec, &path, opts)?;
    Ok(path)
}

/// 水平分析桩身分布：挠度、弯矩、剪力、土反力各一张
pub fn plot_lateral_profiles(
    res: &LateralResults,
    dir: &Path,
    opts: &PlotOptions,
) -> Result<Vec<PathBuf>> {
    let Some(step) = res.last_step() else {
        return Ok(Vec::new());
    };
    let p = &step.profile;
    let panels: [(&str, &str, &str, Vec<f64>); 4] = [
        (
            "lateral_deflection",
            "Deflection vs Depth",
            "Deflection (mm)",
            p.deflection_m.iter().map(|y| y * 1e3).collect(),
        ),
        (
            "lateral_moment",
            "Bending Moment vs Depth",
            "Moment (kN·m)",
            p.moment_nm.iter().map(|m| m / 1e3).collect(),
        ),
        (
            "lateral_shear",
            "Shear Force vs Depth",
            "Shear (kN)",
            p.shear_n.iter().map(|v| v / 1e3).collect(),
        ),
        (
            "lateral_soil_reaction",
            "Soil Reaction vs Depth",
            "Soil Reaction (kN/m)",
            p.soil_reaction_npm.iter().map(|v| v / 1e3).collect(),
        ),
    ];

    let mut paths = Vec::with_capacity(panels.len());
    for (stem, title, x_desc, values) in panels {
        let path = opts.output_path(dir, stem);
        let points = values.into_iter().zip(p.z_m.iter().copied()).collect();
        let spec = ChartSpec {
            title,
            x_desc,
            y_desc: "Depth (m)",
            series: vec![Series::new(x_desc, points)],
            depth_axis: true,
        };
        render(&spec, &path, opts)?;
        paths.push(path);
    }
    Ok(paths)
}

/// 桩顶荷载-挠度曲线
pub fn plot_head_curve(res: &LateralResults, dir: &Path, opts: &PlotOptions) -> Result<PathBuf> {
    let path = opts.output_path(dir, "lateral_head_curve");
    let points = res.head_curve().into_iter().map(|(h, y)| (y, h)).collect();
    let spec = ChartSpec {
        title: &format!("Head Load-Deflection ({})", res.head),
        x_desc: "Head Deflection (mm)",
        y_desc: "Lateral Load (kN)",
        series: vec![Series::new("Head curve", points)],
        depth_axis: false,
    };
    render(&spec, &path, opts)?;
    Ok(path)
}
