//! # 文本分析报告
//!
//! 汇总项目输入与轴向、水平分析的关键结果，写出为纯文本文件。
//!
//! ## 依赖关系
//! - 被 `commands/analyze/`, `commands/batch.rs` 调用
//! - 使用 `analysis/` 的结果结构

use crate::analysis::{AxialResults, LateralResults};
use crate::error::{PileError, Result};
use crate::models::Project;

use std::fmt::Write as _;
use std::path::Path;

/// 生成报告文本
pub fn build_report(
    title: &str,
    project: &Project,
    axial: Option<&AxialResults>,
    lateral: Option<&LateralResults>,
) -> String {
    let rule = "=".repeat(60);
    let mut out = String::new();

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", rule);
    for line in project.summary_lines() {
        let _ = writeln!(out, "{}", line);
    }
    for (i, layer) in project.soil_profile.layers().iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}. {:>6.2} - {:>6.2} m  {:<5} gamma={} kN/m³  {}",
            i + 1,
            layer.from_m,
            layer.to_m,
            layer.kind.to_string(),
            layer.gamma_knpm3,
            layer.strength_label()
        );
    }

    if let Some(res) = axial {
        let (settlement, max_load) = res.max_settlement();
        let cap = &res.capacity;

        let _ = writeln!(out);
        let _ = writeln!(out, "Axial Analysis");
        let _ = writeln!(out, "{}", "-".repeat(60));
        let _ = writeln!(
            out,
            "Max Settlement: {:.4} m at {} kN",
            settlement, max_load
        );
        let _ = writeln!(out, "Toe Resistance: {:.2} N", res.toe_resistance_n);
        let _ = writeln!(out, "Ultimate Shaft Capacity: {:.1} kN", cap.shaft_kn);
        let _ = writeln!(out, "Ultimate Toe Capacity: {:.1} kN", cap.toe_kn);
        let _ = writeln!(out, "Ultimate Total Capacity: {:.1} kN", cap.total_kn);
        let _ = writeln!(out, "Pile Self Weight: {:.1} kN", cap.self_weight_kn);
        if !res.all_converged() {
            let failed = res.steps.iter().filter(|s| !s.converged).count();
            let _ = writeln!(out, "Warning: {} load step(s) did not converge", failed);
        }
    }

    if let Some(res) = lateral {
        let _ = writeln!(out);
        let _ = writeln!(out, "Lateral Analysis ({})", res.head);
        let _ = writeln!(out, "{}", "-".repeat(60));
        let _ = writeln!(out, "EI: {:.4e} N·m², nodes: {}", res.ei_nm2, res.nodes);
        if let Some(step) = res.last_step() {
            let (z, m) = step.profile.max_moment();
            let _ = writeln!(
                out,
                "Head Load: H = {} kN, M = {} kN·m",
                step.lateral_kn, step.moment_knm
            );
            let _ = writeln!(out, "Head Deflection: {:.3} mm", step.head_deflection_mm);
            let _ = writeln!(out, "Head Rotation: {:.3} mrad", step.head_rotation_mrad);
            let _ = writeln!(out, "Max Moment: {:.2} kN·m at {:.2} m", m / 1e3, z);
        }
        if !res.all_converged() {
            let _ = writeln!(out, "Warning: lateral analysis did not fully converge");
        }
    }

    out
}

/// 写出报告文件
pub fn write_report(text: &str, path: &Path) -> Result<()> {
    std::fs::write(path, text).map_err(|e| PileError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::run_axial;
    use crate::models::{Loads, Pile, SoilLayer};

    #[test]
    fn test_report_contains_axial_summary() {
        let mut project = Project::new();
        let pile = Pile::new(15.0, 0.5, 30e9, 24.0);
        project.pile = Some(pile.clone());
        project.loads = Some(Loads {
            axial_kn: 200.0,
            ..Loads::default()
        });
        project
            .soil_profile
            .add(SoilLayer::clay(0.0, 20.0, 18.0, 50.0));

        let res = run_axial(&pile, &project.soil_profile, &project.analysis, 200.0).unwrap();
        let text = build_report("Axial Analysis Report", &project, Some(&res), None);

        assert!(text.starts_with(&"=".repeat(60)));
        assert!(text.contains("Axial Analysis Report"));
        assert!(text.contains("Max Settlement:"));
        assert!(text.contains("at 200 kN"));
        assert!(text.contains("Toe Resistance:"));
        assert!(!text.contains("Lateral Analysis"));
    }

    #[test]
    fn test_report_uplift_uses_matching_load() {
        let mut project = Project::new();
        let pile = Pile::new(15.0, 0.5, 30e9, 24.0);
        project.pile = Some(pile.clone());
        project
            .soil_profile
            .add(SoilLayer::clay(0.0, 20.0, 18.0, 50.0));

        let res = run_axial(&pile, &project.soil_profile, &project.analysis, -300.0).unwrap();
        let text = build_report("Uplift", &project, Some(&res), None);

        let line = text
            .lines()
            .find(|l| l.starts_with("Max Settlement:"))
            .unwrap();
        assert!(line.ends_with("at -300 kN"), "{}", line);
        assert!(line.contains(": -"));
    }
}
