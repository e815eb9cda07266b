//! # 图表生成
//!
//! 使用 `plotters` 库绘制折线图，支持 PNG 和 SVG 输出。
//!
//! ## 功能
//! - 通用折线图（多条曲线 + 图例）
//! - 深度剖面图：纵轴为深度，向下增大
//!
//! ## 子模块
//! - `charts`: 曲线、荷载-沉降、桩身分布等具体图表
//!
//! ## 依赖关系
//! - 被 `commands/curves.rs`, `commands/analyze/`, `commands/batch.rs` 调用
//! - 使用 `plotters` 渲染图表

pub mod charts;

use crate::error::{PileError, Result};

use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 图像格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for ImageFormat {
    type Err = PileError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "svg" => Ok(ImageFormat::Svg),
            other => Err(PileError::InvalidArgument(format!(
                "unknown image format '{}', expected png or svg",
                other
            ))),
        }
    }
}

/// 绘图选项
#[derive(Debug, Clone, Copy)]
pub struct PlotOptions {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

impl Default for PlotOptions {
    fn default() -> Self {
        PlotOptions {
            width: 1000,
            height: 750,
            format: ImageFormat::Png,
        }
    }
}

impl PlotOptions {
    /// `dir/stem.<ext>`
    pub fn output_path(&self, dir: &Path, stem: &str) -> PathBuf {
        dir.join(format!("{}.{}", stem, self.format.extension()))
    }
}

/// 一条曲线
#[derive(Debug, Clone)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    pub fn new(label: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        Series {
            label: label.into(),
            points,
        }
    }
}

/// 图表描述
#[derive(Debug, Clone)]
pub struct ChartSpec<'a> {
    pub title: &'a str,
    pub x_desc: &'a str,
    pub y_desc: &'a str,
    pub series: Vec<Series>,
    /// 为 true 时点列为 (值, 深度)，纵轴向下
    pub depth_axis: bool,
}

const PALETTE: [RGBColor; 4] = [
    RGBColor(0, 102, 204),
    RGBColor(204, 51, 0),
    RGBColor(0, 153, 76),
    RGBColor(153, 51, 153),
];

/// 坐标范围：两端留 5% 余量，退化区间展开
fn axis_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let span = hi - lo;
    if span <= f64::EPSILON * hi.abs().max(1.0) {
        let pad = if lo.abs() > 0.0 { 0.1 * lo.abs() } else { 1.0 };
        return (lo - pad, hi + pad);
    }
    (lo - 0.05 * span, hi + 0.05 * span)
}

/// 渲染图表到文件
pub fn render(spec: &ChartSpec, path: &Path, opts: &PlotOptions) -> Result<()> {
    match opts.format {
        ImageFormat::Svg => {
            let root = SVGBackend::new(path, (opts.width, opts.height)).into_drawing_area();
            draw_chart(&root, spec)?;
            root.present()
                .map_err(|e| PileError::PlotError(e.to_string()))?;
        }
        ImageFormat::Png => {
            let root = BitMapBackend::new(path, (opts.width, opts.height)).into_drawing_area();
            draw_chart(&root, spec)?;
            root.present()
                .map_err(|e| PileError::PlotError(e.to_string()))?;
        }
    }
    tracing::debug!(path = %path.display(), "rendered chart");
    Ok(())
}

/// 绘制图表的核心逻辑
fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    spec: &ChartSpec,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| PileError::PlotError(format!("{:?}", e)))?;

    let all = || spec.series.iter().flat_map(|s| s.points.iter());
    let (x_min, x_max) = axis_range(all().map(|p| p.0));
    // 深度图以 -z 作纵坐标，刻度显示为正值
    let (y_min, y_max) = if spec.depth_axis {
        let (lo, hi) = axis_range(all().map(|p| p.1));
        (-hi, -lo.min(0.0))
    } else {
        axis_range(all().map(|p| p.1))
    };
    let depth_axis = spec.depth_axis;
    let y_formatter = move |y: &f64| {
        if depth_axis {
            format!("{:.1}", -y)
        } else {
            format!("{}", y)
        }
    };

    let mut chart = ChartBuilder::on(root)
        .caption(spec.title, ("sans-serif", 26).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| PileError::PlotError(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc(spec.x_desc)
        .y_desc(spec.y_desc)
        .y_label_formatter(&y_formatter)
        .x_label_style(("sans-serif", 15))
        .y_label_style(("sans-serif", 15))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| PileError::PlotError(format!("{:?}", e)))?;

    for (i, series) in spec.series.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        let points: Vec<(f64, f64)> = if spec.depth_axis {
            series.points.iter().map(|(v, z)| (*v, -z)).collect()
        } else {
            series.points.clone()
        };
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))
            .map_err(|e| PileError::PlotError(format!("{:?}", e)))?
            .label(series.label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    if spec.series.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| PileError::PlotError(format!("{:?}", e)))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_range_pads_span() {
        let (lo, hi) = axis_range([0.0, 10.0].into_iter());
        assert!((lo + 0.5).abs() < 1e-12);
        assert!((hi - 10.5).abs() < 1e-12);
    }

    #[test]
    fn test_axis_range_degenerate() {
        assert_eq!(axis_range([0.0, 0.0].into_iter()), (-1.0, 1.0));
        assert_eq!(axis_range(std::iter::empty()), (0.0, 1.0));
        let (lo, hi) = axis_range([5.0, f64::NAN].into_iter());
        assert!(lo < 5.0 && hi > 5.0);
    }

    #[test]
    fn test_image_format_parse() {
        assert_eq!("SVG".parse::<ImageFormat>().unwrap(), ImageFormat::Svg);
        assert!("pdf".parse::<ImageFormat>().is_err());
        let opts = PlotOptions::default();
        assert_eq!(
            opts.output_path(Path::new("out"), "load_settlement"),
            Path::new("out").join("load_settlement.png")
        );
    }
}
