//! # 项目编辑子命令 CLI 定义
//!
//! `new`, `show`, `pile`, `loads`, `layer add|remove`
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/project.rs`

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

/// new 子命令参数
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Project file to create (conventionally *.rspile.json)
    pub file: PathBuf,

    /// Overwrite an existing file
    #[arg(short, long, default_value_t = false)]
    pub force: bool,
}

/// show 子命令参数
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Project file
    pub file: PathBuf,
}

/// pile 子命令参数；未给出的字段保留原值
#[derive(Args, Debug)]
pub struct PileArgs {
    /// Project file
    pub file: PathBuf,

    /// Pile length (m)
    #[arg(long)]
    pub length: Option<f64>,

    /// Outer diameter (m)
    #[arg(long)]
    pub diameter: Option<f64>,

    /// Elastic modulus (Pa)
    #[arg(long)]
    pub modulus: Option<f64>,

    /// Pile unit weight (kN/m³)
    #[arg(long)]
    pub unit_weight: Option<f64>,

    /// Wall thickness for a pipe pile (m)
    #[arg(long, conflicts_with = "solid")]
    pub wall_thickness: Option<f64>,

    /// Make the section solid (clears the wall thickness)
    #[arg(long, default_value_t = false)]
    pub solid: bool,
}

/// loads 子命令参数；未给出的字段保留原值
#[derive(Args, Debug)]
pub struct LoadsArgs {
    /// Project file
    pub file: PathBuf,

    /// Axial head load (kN), positive compression, negative uplift
    #[arg(long, allow_hyphen_values = true)]
    pub axial: Option<f64>,

    /// Lateral head load (kN)
    #[arg(long, allow_hyphen_values = true)]
    pub lateral: Option<f64>,

    /// Head moment (kN·m)
    #[arg(long, allow_hyphen_values = true)]
    pub moment: Option<f64>,
}

// ─────────────────────────────────────────────────────────────
// layer 子命令
// ─────────────────────────────────────────────────────────────

/// layer 主命令参数
#[derive(Args, Debug)]
pub struct LayerArgs {
    #[command(subcommand)]
    pub command: LayerCommands,
}

/// layer 子命令
#[derive(Subcommand, Debug)]
pub enum LayerCommands {
    /// Add a soil layer (the profile stays sorted by top depth)
    Add(LayerAddArgs),

    /// Remove a soil layer by its 1-based index
    Remove(LayerRemoveArgs),
}

/// 土类型
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SoilArg {
    /// Clay, characterised by undrained shear strength
    Clay,
    /// Sand, characterised by friction angle
    Sand,
}

/// layer add 参数
#[derive(Args, Debug)]
pub struct LayerAddArgs {
    /// Project file
    pub file: PathBuf,

    /// Layer top depth (m)
    #[arg(long)]
    pub from: f64,

    /// Layer bottom depth (m)
    #[arg(long)]
    pub to: f64,

    /// Soil type
    #[arg(long, value_enum)]
    pub soil: SoilArg,

    /// Unit weight (kN/m³)
    #[arg(long, default_value_t = 18.0)]
    pub gamma: f64,

    /// Undrained shear strength (kPa), clay only
    #[arg(long)]
    pub su: Option<f64>,

    /// Friction angle (degrees), sand only
    #[arg(long, default_value_t = 30.0)]
    pub phi: f64,
}

/// layer remove 参数
#[derive(Args, Debug)]
pub struct LayerRemoveArgs {
    /// Project file
    pub file: PathBuf,

    /// Layer index as shown by `show` (starting at 1)
    pub index: usize,
}
