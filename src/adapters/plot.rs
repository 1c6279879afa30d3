//! Raster UpSet plot.
//!
//! Layout, left to right: set-size bars growing leftward with their
//! counts, set names, then one column per intersection. Intersection-size
//! bars with count labels sit above the dot matrix. Set rows follow
//! `UpsetSummary::set_order`.
//!
//! Drawing goes through plotters onto an RGB buffer; labels use the
//! bundled DejaVu Sans so names show exactly as entered.

use crate::domain::model::UpsetSummary;
use crate::utils::error::{Result, UpsetError};
use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::register_font;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::io::Cursor;
use std::sync::OnceLock;

static FONT_DATA: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

pub const INK: RGBColor = RGBColor(40, 40, 40);
pub const INACTIVE: RGBColor = RGBColor(215, 215, 215);
pub const SHADE: RGBColor = RGBColor(242, 242, 242);

pub const MIN_SCALE: u32 = 1;
pub const MAX_SCALE: u32 = 8;

/// Largest canvas we are willing to allocate (about 150 MB of RGB).
pub const MAX_PIXELS: u64 = 50_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotStyle {
    /// Multiplies every dimension; 1 gives a small screen-sized image.
    pub scale: u32,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self { scale: 2 }
    }
}

/// Pixel geometry of a plot, derived from the summary and style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotLayout {
    pub width: u32,
    pub height: u32,
    pub cell: u32,
    pub font_px: u32,
    pub margin: u32,
    pub gap: u32,
    pub bar_height: u32,
    pub bar_base: u32,
    pub set_bar_width: u32,
    pub set_bars_right: u32,
    pub label_width: u32,
    pub label_right: u32,
    pub matrix_left: u32,
    pub matrix_top: u32,
}

impl PlotLayout {
    pub fn new(summary: &UpsetSummary, style: &PlotStyle) -> Result<Self> {
        ensure_font()?;

        let s = style.scale.clamp(MIN_SCALE, MAX_SCALE);
        let font_px = 12 * s;
        let margin = 16 * s;
        let gap = 8 * s;
        let bar_height = 180 * s;
        let set_bar_width = 120 * s;

        let font = label_font(font_px);
        let label_width = widest(&font, summary.set_names.iter().map(String::as_str))?;
        let intersection_counts: Vec<String> =
            summary.intersections.iter().map(|i| i.size.to_string()).collect();
        let set_counts: Vec<String> = summary.set_sizes.iter().map(|size| size.to_string()).collect();
        let intersection_count_width = widest(&font, intersection_counts.iter().map(String::as_str))?;
        let set_count_width = widest(&font, set_counts.iter().map(String::as_str))?;

        let cell = (intersection_count_width + 4 * s).max(28 * s);

        let set_bars_right = margin + set_count_width + gap + set_bar_width;
        let label_right = set_bars_right + gap + label_width;
        let matrix_left = label_right + gap;
        let bar_base = margin + font_px + gap + bar_height;
        let matrix_top = bar_base + gap;

        let columns = summary.intersections.len() as u64;
        let rows = summary.set_names.len() as u64;
        let width = matrix_left as u64 + columns.saturating_mul(cell as u64) + margin as u64;
        let height = matrix_top as u64 + rows.saturating_mul(cell as u64) + margin as u64;
        if width.saturating_mul(height) > MAX_PIXELS {
            return Err(UpsetError::PlotTooLarge {
                width,
                height,
                limit: MAX_PIXELS,
            });
        }

        Ok(Self {
            width: width as u32,
            height: height as u32,
            cell,
            font_px,
            margin,
            gap,
            bar_height,
            bar_base,
            set_bar_width,
            set_bars_right,
            label_width,
            label_right,
            matrix_left,
            matrix_top,
        })
    }

    pub fn column_center(&self, column: usize) -> u32 {
        self.matrix_left + column as u32 * self.cell + self.cell / 2
    }

    /// Center of the `row`-th plotted set, counted in `set_order`.
    pub fn row_center(&self, row: usize) -> u32 {
        self.matrix_top + row as u32 * self.cell + self.cell / 2
    }

    pub fn dot_radius(&self) -> u32 {
        (self.cell * 3 / 10).max(1)
    }
}

pub fn render_image(summary: &UpsetSummary, style: &PlotStyle) -> Result<RgbImage> {
    if summary.intersections.is_empty() || summary.set_names.is_empty() {
        return Err(UpsetError::NoData {
            action: "plot".to_string(),
        });
    }

    let layout = PlotLayout::new(summary, style)?;
    tracing::debug!(
        "Rendering {}x{} plot ({} intersections, {} sets)",
        layout.width,
        layout.height,
        summary.intersections.len(),
        summary.set_names.len()
    );

    let mut buffer = vec![0u8; layout.width as usize * layout.height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (layout.width, layout.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(plot_error)?;
        draw_sets(&root, summary, &layout)?;
        draw_intersections(&root, summary, &layout)?;
        root.present().map_err(plot_error)?;
    }

    RgbImage::from_raw(layout.width, layout.height, buffer).ok_or_else(|| UpsetError::PlotError {
        message: "pixel buffer does not match the canvas size".to_string(),
    })
}

pub fn render_png(summary: &UpsetSummary, style: &PlotStyle) -> Result<Vec<u8>> {
    let img = render_image(summary, style)?;

    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(img).write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
    Ok(buffer)
}

type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

// 交錯底色、集合名稱與集合大小長條
fn draw_sets(root: &Canvas<'_>, summary: &UpsetSummary, layout: &PlotLayout) -> Result<()> {
    let cell = layout.cell as i32;
    let half_bar = cell * 3 / 10;
    let font = label_font(layout.font_px);
    let label_style = font.color(&INK).pos(Pos::new(HPos::Right, VPos::Center));

    for row in (1..summary.set_order.len()).step_by(2) {
        let top = (layout.row_center(row) - layout.cell / 2) as i32;
        let left = (layout.label_right + layout.gap / 2) as i32;
        let right = (layout.width - layout.margin / 2) as i32;
        root.draw(&Rectangle::new([(left, top), (right, top + cell - 1)], SHADE.filled()))
            .map_err(plot_error)?;
    }

    let max_set = summary.set_sizes.iter().copied().max().unwrap_or(0).max(1) as u64;
    for (row, column) in summary.set_order.iter().enumerate() {
        let center = layout.row_center(row) as i32;
        let size = summary.set_sizes[*column];

        root.draw_text(
            &summary.set_names[*column],
            &label_style,
            (layout.label_right as i32, center),
        )
        .map_err(plot_error)?;

        let length = scaled(size as u64, max_set, layout.set_bar_width) as i32;
        let bar_right = layout.set_bars_right as i32;
        let bar_left = bar_right - length;
        root.draw(&Rectangle::new(
            [(bar_left, center - half_bar), (bar_right - 1, center + half_bar)],
            INK.filled(),
        ))
        .map_err(plot_error)?;

        root.draw_text(
            &size.to_string(),
            &label_style,
            (bar_left - (layout.gap / 2) as i32, center),
        )
        .map_err(plot_error)?;
    }

    Ok(())
}

fn draw_intersections(root: &Canvas<'_>, summary: &UpsetSummary, layout: &PlotLayout) -> Result<()> {
    let half_bar = (layout.cell * 3 / 10) as i32;
    let connector = (layout.cell / 10).max(1);
    let radius = layout.dot_radius();
    let count_style = label_font(layout.font_px)
        .color(&INK)
        .pos(Pos::new(HPos::Center, VPos::Bottom));

    let max_size = summary
        .intersections
        .iter()
        .map(|i| i.size)
        .max()
        .unwrap_or(0)
        .max(1) as u64;

    for (column, intersection) in summary.intersections.iter().enumerate() {
        let center_x = layout.column_center(column) as i32;
        let bar_base = layout.bar_base as i32;

        let height = scaled(intersection.size as u64, max_size, layout.bar_height) as i32;
        let bar_top = bar_base - height;
        root.draw(&Rectangle::new(
            [(center_x - half_bar, bar_top), (center_x + half_bar, bar_base - 1)],
            INK.filled(),
        ))
        .map_err(plot_error)?;

        root.draw_text(
            &intersection.size.to_string(),
            &count_style,
            (center_x, bar_top - (layout.gap / 2) as i32),
        )
        .map_err(plot_error)?;

        let member_rows: Vec<usize> = summary
            .set_order
            .iter()
            .enumerate()
            .filter(|(_, set)| intersection.members[**set])
            .map(|(row, _)| row)
            .collect();
        if let (Some(first), Some(last)) = (member_rows.first(), member_rows.last()) {
            if first != last {
                root.draw(&PathElement::new(
                    vec![
                        (center_x, layout.row_center(*first) as i32),
                        (center_x, layout.row_center(*last) as i32),
                    ],
                    INK.stroke_width(connector),
                ))
                .map_err(plot_error)?;
            }
        }

        for (row, set) in summary.set_order.iter().enumerate() {
            let color = if intersection.members[*set] { INK } else { INACTIVE };
            root.draw(&Circle::new(
                (center_x, layout.row_center(row) as i32),
                radius,
                color.filled(),
            ))
            .map_err(plot_error)?;
        }
    }

    Ok(())
}

/// Registers the bundled font with plotters once per process.
fn ensure_font() -> Result<()> {
    static REGISTERED: OnceLock<std::result::Result<(), String>> = OnceLock::new();

    REGISTERED
        .get_or_init(|| {
            register_font(FontFamily::SansSerif.as_str(), FontStyle::Normal, FONT_DATA)
                .map_err(|_| "cannot load bundled font: invalid font data".to_string())
        })
        .clone()
        .map_err(|message| UpsetError::PlotError { message })
}

fn label_font(px: u32) -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, px as f64, FontStyle::Normal)
}

fn widest<'a>(font: &FontDesc<'_>, texts: impl Iterator<Item = &'a str>) -> Result<u32> {
    let mut widest = 0;
    for text in texts {
        let (width, _) = font.box_size(text).map_err(plot_error)?;
        widest = widest.max(width);
    }
    Ok(widest)
}

// Nonzero values always get at least one pixel.
fn scaled(value: u64, max: u64, extent: u32) -> u32 {
    if value == 0 {
        return 0;
    }
    ((value * extent as u64) / max).max(1) as u32
}

fn plot_error(e: impl std::fmt::Debug) -> UpsetError {
    UpsetError::PlotError {
        message: format!("{:?}", e),
    }
}
