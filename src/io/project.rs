//! # 项目文件读写
//!
//! 项目以 UTF-8 JSON 保存（约定后缀 `.rspile.json`），
//! 写出时使用 `serde_json::to_string_pretty`。
//!
//! ## 依赖关系
//! - 被 `commands/project.rs`, `commands/analyze/`, `commands/batch.rs` 调用
//! - 使用 `models/project.rs`

use crate::error::{PileError, Result};
use crate::models::Project;

use std::fs;
use std::path::Path;

/// 项目文件约定后缀
pub const PROJECT_SUFFIX: &str = ".rspile.json";

/// 读取项目文件；土层按起始深度排序
pub fn load_project(path: &Path) -> Result<Project> {
    if !path.exists() {
        return Err(PileError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| PileError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut project: Project =
        serde_json::from_str(&content).map_err(|e| PileError::ProjectParseError {
            path: path.display().to_string(),
            source: e,
        })?;
    project.soil_profile.sort();

    tracing::debug!(
        path = %path.display(),
        layers = project.soil_profile.len(),
        "loaded project"
    );
    Ok(project)
}

/// 保存项目文件，必要时创建父目录
pub fn save_project(project: &Project, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(project).map_err(PileError::SerializeError)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| PileError::FileWriteError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
    }

    fs::write(path, json).map_err(|e| PileError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), "saved project");
    Ok(())
}

/// 新建空项目并写入磁盘
pub fn create_project(path: &Path, force: bool) -> Result<Project> {
    if path.exists() && !force {
        return Err(PileError::FileExists {
            path: path.display().to_string(),
        });
    }
    let project = Project::new();
    save_project(&project, path)?;
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Loads, Pile, SoilLayer};
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_project() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demo.rspile.json");

        let mut project = Project::new();
        project.pile = Some(Pile::new(20.0, 0.6, 30e9, 24.0));
        project.loads = Some(Loads {
            axial_kn: 800.0,
            lateral_kn: 100.0,
            moment_knm: 0.0,
        });
        project.soil_profile.add(SoilLayer::clay(0.0, 8.0, 18.0, 40.0));
        save_project(&project, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"unit_weight_kNpm3\""));
        assert!(content.contains("\n  \"meta\""));

        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded, project);
    }

    #[test]
    fn test_load_sorts_layers_and_accepts_empty_objects() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw.rspile.json");
        fs::write(
            &path,
            r#"{
  "meta": {"version": 1, "units": "SI"},
  "pile": {},
  "soil_profile": [
    {"from_m": 5.0, "to_m": 12.0, "type": "sand", "gamma_kNpm3": 19.0, "phi_deg": 33.0},
    {"from_m": 0.0, "to_m": 5.0, "type": "clay", "gamma_kNpm3": 17.0,
     "undrained_shear_strength_kPa": 25.0}
  ],
  "loads": {},
  "extra": true
}"#,
        )
        .unwrap();

        let project = load_project(&path).unwrap();
        assert!(project.pile.is_none());
        assert!(project.loads.is_none());
        assert_eq!(project.soil_profile.layers()[0].from_m, 0.0);
        assert_eq!(project.soil_profile.layers()[1].from_m, 5.0);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.rspile.json");
        assert!(matches!(
            load_project(&missing),
            Err(PileError::FileNotFound { .. })
        ));

        let broken = dir.path().join("broken.rspile.json");
        fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(
            load_project(&broken),
            Err(PileError::ProjectParseError { .. })
        ));

        let no_su = dir.path().join("no_su.rspile.json");
        fs::write(
            &no_su,
            r#"{"soil_profile": [{"from_m": 0.0, "to_m": 5.0, "type": "clay", "gamma_kNpm3": 18.0}]}"#,
        )
        .unwrap();
        assert!(matches!(
            load_project(&no_su),
            Err(PileError::ProjectParseError { .. })
        ));
    }

    #[test]
    fn test_create_project_respects_force() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("new.rspile.json");
        create_project(&path, false).unwrap();
        assert!(path.exists());
        assert!(matches!(
            create_project(&path, false),
            Err(PileError::FileExists { .. })
        ));
        assert!(create_project(&path, true).is_ok());
    }
}
