//! Places the slip's front frame on a drawing surface.
//! 將存款單正面座標系放置到繪圖表面上。
//!
//! The print geometry is authoritative: on a portrait letter page the leaf is
//! turned a quarter clockwise and pinned to the top-right margin. The preview
//! shows the same front frame unrotated and scaled. The back frame is never
//! placed here; the renderer derives it from whichever front frame is active.

use crate::job::{Orientation, PaperSize};
use crate::sink::DrawingSink;
use crate::slip_layout::{SLIP_HEIGHT_PT, SLIP_WIDTH_PT};

/// Default distance between the page edge and the slip leaf on paper.
pub const PRINT_MARGIN_PT: f32 = 18.0;
/// Blank border around the slip in preview images, before zoom.
pub const PREVIEW_MARGIN_PT: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum FrameStep {
    Translate(f32, f32),
    Rotate(f32),
    Scale(f32, f32),
}

/// Ordered transform steps mapping the front frame onto a surface.
/// 將正面座標系映射至表面的轉換步驟。
#[derive(Debug, Clone, PartialEq)]
pub struct SurfacePlacement {
    steps: Vec<FrameStep>,
    surface_width: f32,
    surface_height: f32,
}

impl SurfacePlacement {
    /// Physical page placement: `translate(page_width - margin, margin) · rotate(90°)`.
    pub fn print(paper: PaperSize, margin: f32) -> Self {
        let (page_width, page_height) = paper.to_points(Orientation::Portrait);
        Self {
            steps: vec![
                FrameStep::Translate(page_width - margin, margin),
                FrameStep::Rotate(90.0),
            ],
            surface_width: page_width,
            surface_height: page_height,
        }
    }

    /// Interactive preview placement: `translate(margin, margin) · scale(zoom)`.
    /// Surface size is expressed in preview points (zoom already applied).
    pub fn preview(zoom_percent: u32) -> Self {
        let zoom = zoom_percent.max(10) as f32 / 100.0;
        let margin = PREVIEW_MARGIN_PT * zoom;
        Self {
            steps: vec![
                FrameStep::Translate(margin, margin),
                FrameStep::Scale(zoom, zoom),
            ],
            surface_width: SLIP_WIDTH_PT * zoom + 2.0 * margin,
            surface_height: SLIP_HEIGHT_PT * zoom + 2.0 * margin,
        }
    }

    pub fn surface_size(&self) -> (f32, f32) {
        (self.surface_width, self.surface_height)
    }

    /// Applies the steps to `sink`. Callers bracket this with `save`/`restore`.
    pub fn apply(&self, sink: &mut dyn DrawingSink) {
        for step in &self.steps {
            match *step {
                FrameStep::Translate(dx, dy) => sink.translate(dx, dy),
                FrameStep::Rotate(degrees) => sink.rotate(degrees),
                FrameStep::Scale(sx, sy) => sink.scale(sx, sy),
            }
        }
    }
}
