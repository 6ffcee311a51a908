//! Drawing capabilities the slip renderer needs from a 2D graphics context.
//! 存款單渲染器對 2D 繪圖環境所需的能力。

#[cfg(test)]
use serde::Serialize;

use crate::display::{Point, Size};
use crate::metrics;

#[cfg_attr(test, derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontSlant {
    #[default]
    Normal,
    Italic,
}

#[cfg_attr(test, derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Whether a rectangle is painted or outlined.
#[cfg_attr(test, derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectStyle {
    Filled,
    Stroked,
}

/// Measured size of a text run in the current user space.
/// 文字在目前使用者座標系中的量測結果。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtents {
    pub width: f32,
    pub height: f32,
}

/// A stateful, order-dependent 2D drawing context.
/// 具狀態且依呼叫順序作用的 2D 繪圖介面。
///
/// Font selection, size and current point persist between calls, and
/// `save`/`restore` bracket changes to the coordinate frame. Text is placed
/// with its baseline origin at the current point.
pub trait DrawingSink {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    /// Clockwise rotation in degrees (y axis pointing down).
    fn rotate(&mut self, degrees: f32);
    fn scale(&mut self, sx: f32, sy: f32);

    fn select_font(&mut self, family: &str, slant: FontSlant, weight: FontWeight);
    fn set_font_size(&mut self, size: f32);
    fn set_line_width(&mut self, width: f32);

    fn move_to(&mut self, x: f32, y: f32);
    /// Draws `text` at the current point and advances it by the text width.
    fn show_text(&mut self, text: &str);
    /// Measures `text` with the current font without drawing it.
    fn text_extents(&self, text: &str) -> TextExtents;

    fn line(&mut self, from: Point, to: Point);
    fn rectangle(&mut self, origin: Point, size: Size, style: RectStyle);
}

/// One recorded call on a [`RecordingSink`].
#[cfg_attr(test, derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Save,
    Restore,
    Translate { dx: f32, dy: f32 },
    Rotate { degrees: f32 },
    Scale { sx: f32, sy: f32 },
    SelectFont {
        family: String,
        slant: FontSlant,
        weight: FontWeight,
    },
    SetFontSize(f32),
    SetLineWidth(f32),
    MoveTo { x: f32, y: f32 },
    ShowText(String),
    Line { from: Point, to: Point },
    Rectangle {
        origin: Point,
        size: Size,
        style: RectStyle,
    },
}

/// Sink that keeps every call verbatim, measuring text with the built-in metrics.
/// 逐一記錄呼叫內容的繪圖介面，供比對與除錯使用。
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    ops: Vec<DrawOp>,
    font_family: String,
    bold: bool,
    font_size: f32,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    /// Text shown so far, in call order.
    pub fn shown_text(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::ShowText(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DrawingSink for RecordingSink {
    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.ops.push(DrawOp::Translate { dx, dy });
    }

    fn rotate(&mut self, degrees: f32) {
        self.ops.push(DrawOp::Rotate { degrees });
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.ops.push(DrawOp::Scale { sx, sy });
    }

    fn select_font(&mut self, family: &str, slant: FontSlant, weight: FontWeight) {
        self.font_family = family.to_string();
        self.bold = weight == FontWeight::Bold;
        self.ops.push(DrawOp::SelectFont {
            family: family.to_string(),
            slant,
            weight,
        });
    }

    fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
        self.ops.push(DrawOp::SetFontSize(size));
    }

    fn set_line_width(&mut self, width: f32) {
        self.ops.push(DrawOp::SetLineWidth(width));
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.ops.push(DrawOp::MoveTo { x, y });
    }

    fn show_text(&mut self, text: &str) {
        self.ops.push(DrawOp::ShowText(text.to_string()));
    }

    fn text_extents(&self, text: &str) -> TextExtents {
        TextExtents {
            width: metrics::text_width(&self.font_family, self.bold, self.font_size, text),
            height: metrics::cap_height(self.font_size),
        }
    }

    fn line(&mut self, from: Point, to: Point) {
        self.ops.push(DrawOp::Line { from, to });
    }

    fn rectangle(&mut self, origin: Point, size: Size, style: RectStyle) {
        self.ops.push(DrawOp::Rectangle {
            origin,
            size,
            style,
        });
    }
}
