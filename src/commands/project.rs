//! # 项目编辑命令实现
//!
//! 新建、显示与编辑项目文件（桩参数、荷载、土层）。
//! 每个编辑命令读取文件、修改、校验后写回。
//!
//! ## 依赖关系
//! - 使用 `cli/project.rs` 定义的参数
//! - 使用 `io/project.rs`, `models/`

use super::print_warnings;
use crate::cli::project::{
    LayerAddArgs, LayerArgs, LayerCommands, LayerRemoveArgs, LoadsArgs, NewArgs, PileArgs,
    ShowArgs, SoilArg,
};
use crate::error::{PileError, Result};
use crate::io::{create_project, load_project, save_project};
use crate::models::{Loads, Pile, Project, SoilKind, SoilLayer};
use crate::utils::output;

use tabled::{Table, Tabled};

/// 土层表格行
#[derive(Tabled)]
struct LayerRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "From (m)")]
    from: String,
    #[tabled(rename = "To (m)")]
    to: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "γ (kN/m³)")]
    gamma: String,
    #[tabled(rename = "Strength")]
    strength: String,
}

/// 执行 new 命令
pub fn execute_new(args: NewArgs) -> Result<()> {
    create_project(&args.file, args.force)?;
    output::print_success(&format!("Created project '{}'", args.file.display()));
    Ok(())
}

/// 执行 show 命令
pub fn execute_show(args: ShowArgs) -> Result<()> {
    let project = load_project(&args.file)?;
    output::print_header(&format!("Project: {}", args.file.display()));
    print_project(&project);

    match project.soil_profile.validate() {
        Ok(warnings) => print_warnings(&warnings),
        Err(e) => output::print_error(&e.to_string()),
    }
    Ok(())
}

fn print_project(project: &Project) {
    for line in project.summary_lines() {
        match line.split_once(": ") {
            Some((k, v)) => output::print_kv(k, v),
            None => println!("  {}", line),
        }
    }
    output::print_kv(
        "Analysis",
        &format!(
            "{} axial segments, {} lateral nodes, {}",
            project.analysis.segments, project.analysis.lateral_nodes, project.analysis.head_condition
        ),
    );

    if project.soil_profile.is_empty() {
        return;
    }
    let rows: Vec<LayerRow> = project
        .soil_profile
        .layers()
        .iter()
        .enumerate()
        .map(|(i, l)| LayerRow {
            index: i + 1,
            from: format!("{:.2}", l.from_m),
            to: format!("{:.2}", l.to_m),
            kind: l.kind.to_string(),
            gamma: format!("{:.1}", l.gamma_knpm3),
            strength: l.strength_label(),
        })
        .collect();
    println!();
    println!("{}", Table::new(&rows));
}

/// 执行 pile 命令；未给出的字段保留原值
pub fn execute_pile(args: PileArgs) -> Result<()> {
    let mut project = load_project(&args.file)?;

    let mut pile = match project.pile.take() {
        Some(p) => p,
        None => match (args.length, args.diameter, args.modulus, args.unit_weight) {
            (Some(l), Some(d), Some(e), Some(g)) => Pile::new(l, d, e, g),
            _ => {
                return Err(PileError::InvalidArgument(
                    "a new pile needs --length, --diameter, --modulus and --unit-weight"
                        .to_string(),
                ))
            }
        },
    };

    if let Some(v) = args.length {
        pile.length_m = v;
    }
    if let Some(v) = args.diameter {
        pile.diameter_m = v;
    }
    if let Some(v) = args.modulus {
        pile.elastic_modulus_pa = v;
    }
    if let Some(v) = args.unit_weight {
        pile.unit_weight_knpm3 = v;
    }
    if args.solid {
        pile.wall_thickness_m = None;
    } else if let Some(t) = args.wall_thickness {
        pile = pile.with_wall_thickness(t);
    }

    pile.validate()?;
    project.pile = Some(pile);
    save_project(&project, &args.file)?;

    output::print_success("Pile properties updated");
    print_project(&project);
    Ok(())
}

/// 执行 loads 命令
pub fn execute_loads(args: LoadsArgs) -> Result<()> {
    let mut project = load_project(&args.file)?;
    let mut loads = project.loads.take().unwrap_or_default();

    if let Some(v) = args.axial {
        loads.axial_kn = v;
    }
    if let Some(v) = args.lateral {
        loads.lateral_kn = v;
    }
    if let Some(v) = args.moment {
        loads.moment_knm = v;
    }
    let all_finite = [loads.axial_kn, loads.lateral_kn, loads.moment_knm]
        .iter()
        .all(|v| v.is_finite());
    if !all_finite {
        return Err(PileError::InvalidArgument(
            "loads must be finite numbers".to_string(),
        ));
    }

    let summary = format_loads(&loads);
    project.loads = Some(loads);
    save_project(&project, &args.file)?;
    output::print_success(&format!("Loads updated: {}", summary));
    Ok(())
}

fn format_loads(loads: &Loads) -> String {
    format!(
        "axial={} kN, lateral={} kN, moment={} kN·m",
        loads.axial_kn, loads.lateral_kn, loads.moment_knm
    )
}

/// 执行 layer 命令
pub fn execute_layer(args: LayerArgs) -> Result<()> {
    match args.command {
        LayerCommands::Add(a) => add_layer(a),
        LayerCommands::Remove(a) => remove_layer(a),
    }
}

/// 由命令行参数构建土层
fn build_layer(args: &LayerAddArgs) -> Result<SoilLayer> {
    let kind = match args.soil {
        SoilArg::Clay => {
            let su_kpa = args.su.ok_or_else(|| {
                PileError::InvalidArgument("clay layers need --su (kPa)".to_string())
            })?;
            SoilKind::Clay { su_kpa }
        }
        SoilArg::Sand => SoilKind::Sand {
            phi_deg: args.phi,
        },
    };
    let layer = SoilLayer {
        from_m: args.from,
        to_m: args.to,
        gamma_knpm3: args.gamma,
        kind,
    };
    layer.validate()?;
    Ok(layer)
}

fn add_layer(args: LayerAddArgs) -> Result<()> {
    let mut project = load_project(&args.file)?;
    let layer = build_layer(&args)?;
    let label = format!(
        "{} {:.2}-{:.2} m, {}",
        layer.kind,
        layer.from_m,
        layer.to_m,
        layer.strength_label()
    );

    project.soil_profile.add(layer);
    let warnings = project.soil_profile.validate()?;
    save_project(&project, &args.file)?;

    output::print_success(&format!("Added layer: {}", label));
    print_warnings(&warnings);
    print_project(&project);
    Ok(())
}

fn remove_layer(args: LayerRemoveArgs) -> Result<()> {
    let mut project = load_project(&args.file)?;
    let count = project.soil_profile.len();
    let removed = args
        .index
        .checked_sub(1)
        .and_then(|i| project.soil_profile.remove(i))
        .ok_or_else(|| {
            PileError::InvalidArgument(format!(
                "layer index {} out of range (project has {} layer(s))",
                args.index, count
            ))
        })?;
    save_project(&project, &args.file)?;

    output::print_success(&format!(
        "Removed layer {}: {} {:.2}-{:.2} m",
        args.index, removed.kind, removed.from_m, removed.to_m
    ));
    print_project(&project);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn new_project(dir: &std::path::Path) -> PathBuf {
        let file = dir.join("p.rspile.json");
        execute_new(NewArgs {
            file: file.clone(),
            force: false,
        })
        .unwrap();
        file
    }

    fn clay_args(file: &PathBuf, from: f64, to: f64) -> LayerAddArgs {
        LayerAddArgs {
            file: file.clone(),
            from,
            to,
            soil: SoilArg::Clay,
            gamma: 18.0,
            su: Some(40.0),
            phi: 30.0,
        }
    }

    #[test]
    fn test_pile_edit_requires_full_set_first() {
        let dir = tempdir().unwrap();
        let file = new_project(dir.path());

        let partial = PileArgs {
            file: file.clone(),
            length: Some(20.0),
            diameter: None,
            modulus: None,
            unit_weight: None,
            wall_thickness: None,
            solid: false,
        };
        assert!(matches!(
            execute_pile(partial),
            Err(PileError::InvalidArgument(_))
        ));

        let full = PileArgs {
            file: file.clone(),
            length: Some(20.0),
            diameter: Some(0.6),
            modulus: Some(30e9),
            unit_weight: Some(24.0),
            wall_thickness: None,
            solid: false,
        };
        execute_pile(full).unwrap();

        let update = PileArgs {
            file: file.clone(),
            length: Some(25.0),
            diameter: None,
            modulus: None,
            unit_weight: None,
            wall_thickness: None,
            solid: false,
        };
        execute_pile(update).unwrap();
        let pile = load_project(&file).unwrap().pile.unwrap();
        assert_eq!(pile.length_m, 25.0);
        assert_eq!(pile.diameter_m, 0.6);
    }

    #[test]
    fn test_layers_sorted_and_overlap_rejected() {
        let dir = tempdir().unwrap();
        let file = new_project(dir.path());

        add_layer(clay_args(&file, 8.0, 20.0)).unwrap();
        add_layer(clay_args(&file, 0.0, 8.0)).unwrap();
        let project = load_project(&file).unwrap();
        assert_eq!(project.soil_profile.layers()[0].from_m, 0.0);

        assert!(add_layer(clay_args(&file, 5.0, 10.0)).is_err());
        assert_eq!(load_project(&file).unwrap().soil_profile.len(), 2);

        let mut no_su = clay_args(&file, 20.0, 30.0);
        no_su.su = None;
        assert!(matches!(add_layer(no_su), Err(PileError::InvalidArgument(_))));
    }

    #[test]
    fn test_remove_layer_bounds() {
        let dir = tempdir().unwrap();
        let file = new_project(dir.path());
        add_layer(clay_args(&file, 0.0, 8.0)).unwrap();

        let bad = LayerRemoveArgs {
            file: file.clone(),
            index: 0,
        };
        assert!(remove_layer(bad).is_err());

        remove_layer(LayerRemoveArgs {
            file: file.clone(),
            index: 1,
        })
        .unwrap();
        assert!(load_project(&file).unwrap().soil_profile.is_empty());
    }

    #[test]
    fn test_loads_merge() {
        let dir = tempdir().unwrap();
        let file = new_project(dir.path());
        execute_loads(LoadsArgs {
            file: file.clone(),
            axial: Some(800.0),
            lateral: None,
            moment: None,
        })
        .unwrap();
        execute_loads(LoadsArgs {
            file: file.clone(),
            axial: None,
            lateral: Some(50.0),
            moment: None,
        })
        .unwrap();
        let loads = load_project(&file).unwrap().loads.unwrap();
        assert_eq!(loads.axial_kn, 800.0);
        assert_eq!(loads.lateral_kn, 50.0);
    }
}
