#[cfg(test)]
use serde::Serialize;

/// Resolved page content consumed by the PDF writer, the preview rasterizer
/// and the platform adapters. Coordinates are page points, y down.
#[cfg_attr(test, derive(Serialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrintDisplayList {
    pub commands: Vec<DisplayCommand>,
}

impl PrintDisplayList {
    /// Append a command to the display list.
    pub fn push(&mut self, command: DisplayCommand) {
        self.commands.push(command);
    }

    /// Returns true if the display list is empty.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn glyph_runs(&self) -> impl Iterator<Item = &GlyphRun> {
        self.commands.iter().filter_map(|command| match command {
            DisplayCommand::GlyphRun(run) => Some(run),
            _ => None,
        })
    }

    /// Finds the first glyph run with exactly `text`.
    pub fn find_text(&self, text: &str) -> Option<&GlyphRun> {
        self.glyph_runs().find(|run| run.text == text)
    }
}

/// Low-level drawing commands emitted by the page canvas.
#[cfg_attr(test, derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCommand {
    GlyphRun(GlyphRun),
    Line {
        start: Point,
        end: Point,
        stroke: Stroke,
    },
    /// Four corners in drawing order; rotated frames turn rectangles into quads.
    Quad {
        corners: [Point; 4],
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
}

/// Describes an individual positioned glyph run. `position` is the baseline origin.
#[cfg_attr(test, derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRun {
    pub text: String,
    pub font_family: String,
    pub bold: bool,
    pub italic: bool,
    pub font_size_pt: f32,
    pub position: Point,
    /// Clockwise rotation of the baseline in degrees (y-down page space).
    pub rotation_deg: f32,
    /// Advance width in page points.
    pub width_pt: f32,
    pub color: Color,
}

/// 2D size representation.
#[cfg_attr(test, derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// 2D coordinate.
#[cfg_attr(test, derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// RGBA color stored in normalized floating-point form.
#[cfg_attr(test, derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Stroke descriptor for simple line drawing.
#[cfg_attr(test, derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Color,
}
