//! # CSV 数据导出
//!
//! 导出曲线点列与分析结果，供电子表格或其他绘图工具使用。
//!
//! ## 支持内容
//! - 土弹簧曲线：x, y
//! - 轴向：荷载-沉降 (`Load_kN,Settlement_m`)、桩身分布
//! - 水平：桩身分布、桩顶荷载-挠度曲线
//!
//! ## 依赖关系
//! - 被 `commands/curves.rs`, `commands/analyze/`, `commands/batch.rs` 调用
//! - 使用 `csv` 库写入 CSV 文件

use crate::analysis::{AxialResults, LateralProfile, LateralResults};
use crate::curves::LabeledCurve;
use crate::error::{PileError, Result};

use std::path::Path;

/// 写入表头与数据行
fn write_table<I>(path: &Path, header: &[&str], rows: I) -> Result<()>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(&row)?;
    }
    wtr.flush().map_err(|e| PileError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), "wrote csv");
    Ok(())
}

/// 导出单条土弹簧曲线
pub fn curve_to_csv(curve: &LabeledCurve, path: &Path) -> Result<()> {
    write_table(
        path,
        &[curve.kind.x_label(), curve.kind.y_label()],
        curve
            .curve
            .points
            .iter()
            .map(|(x, y)| vec![format!("{:.6e}", x), format!("{:.6}", y)]),
    )
}

/// 导出荷载-沉降曲线
pub fn load_settlement_to_csv(results: &AxialResults, path: &Path) -> Result<()> {
    write_table(
        path,
        &["Load_kN", "Settlement_m"],
        results
            .steps
            .iter()
            .map(|s| vec![format!("{:.4}", s.load_kn), format!("{:.6e}", s.head_settlement_m)]),
    )
}

/// 导出轴向桩身分布
pub fn axial_profile_to_csv(results: &AxialResults, path: &Path) -> Result<()> {
    let p = &results.profile;
    write_table(
        path,
        &["z_m", "Settlement_m", "Cumulative_Shaft_N", "Axial_Force_N"],
        (0..p.z_m.len()).map(|i| {
            vec![
                format!("{:.4}", p.z_m[i]),
                format!("{:.6e}", p.settlement_m[i]),
                format!("{:.3}", p.shaft_resistance_n[i]),
                format!("{:.3}", p.axial_force_n[i]),
            ]
        }),
    )
}

/// 导出水平桩身分布
pub fn lateral_profile_to_csv(profile: &LateralProfile, path: &Path) -> Result<()> {
    let p = profile;
    write_table(
        path,
        &[
            "z_m",
            "Deflection_m",
            "Rotation_rad",
            "Moment_Nm",
            "Shear_N",
            "Soil_Reaction_Npm",
        ],
        (0..p.z_m.len()).map(|i| {
            vec![
                format!("{:.4}", p.z_m[i]),
                format!("{:.6e}", p.deflection_m[i]),
                format!("{:.6e}", p.rotation_rad[i]),
                format!("{:.3}", p.moment_nm[i]),
                format!("{:.3}", p.shear_n[i]),
                format!("{:.3}", p.soil_reaction_npm[i]),
            ]
        }),
    )
}

/// 导出桩顶荷载-挠度曲线
pub fn head_curve_to_csv(results: &LateralResults, path: &Path) -> Result<()> {
    write_table(
        path,
        &[
            "Lateral_kN",
            "Moment_kNm",
            "Head_Deflection_mm",
            "Head_Rotation_mrad",
            "Converged",
        ],
        results.steps.iter().map(|s| {
            vec![
                format!("{:.4}", s.lateral_kn),
                format!("{:.4}", s.moment_knm),
                format!("{:.6}", s.head_deflection_mm),
                format!("{:.6}", s.head_rotation_mrad),
                s.converged.to_string(),
            ]
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::run_axial;
    use crate::curves::generate_curve_set;
    use crate::models::{AnalysisSettings, Pile, SoilLayer, SoilProfile};
    use tempfile::tempdir;

    fn site() -> (Pile, SoilProfile) {
        (
            Pile::new(15.0, 0.5, 30e9, 24.0),
            SoilProfile::new(vec![SoilLayer::clay(0.0, 20.0, 18.0, 50.0)]),
        )
    }

    #[test]
    fn test_load_settlement_csv_layout() {
        let (pile, profile) = site();
        let res = run_axial(&pile, &profile, &AnalysisSettings::default(), 300.0).unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("load_settlement.csv");
        load_settlement_to_csv(&res, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Load_kN,Settlement_m");
        assert_eq!(lines.len(), res.steps.len() + 1);
        assert!(lines[1].starts_with("0.0000,"));
    }

    #[test]
    fn test_curve_csv_has_axis_labels() {
        let (pile, profile) = site();
        let set = generate_curve_set(&pile, &profile).unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("py.csv");
        let py = set.iter().find(|c| c.file_stem() == "py_layer1").unwrap();
        curve_to_csv(py, &path).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(&headers[0], "Deflection y (m)");
        assert_eq!(rdr.records().count(), py.curve.len());
    }
}
