use crate::display::{Color, DisplayCommand, GlyphRun, Point, PrintDisplayList, Size, Stroke};
use crate::metrics;
use crate::sink::{DrawingSink, FontSlant, FontWeight, RectStyle, TextExtents};

/// 2D affine transform: `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
/// 二維仿射轉換。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Returns `self * other`: `other` is applied first, then `self`.
    pub fn then_local(&self, other: &Affine) -> Affine {
        Affine {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn translation(dx: f32, dy: f32) -> Affine {
        Affine {
            e: dx,
            f: dy,
            ..Affine::IDENTITY
        }
    }

    pub fn rotation(degrees: f32) -> Affine {
        let radians = degrees.to_radians();
        let (sin, cos) = radians.sin_cos();
        // Snap quarter turns so rotated layouts stay on exact coordinates.
        let (sin, cos) = (snap(sin), snap(cos));
        Affine {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn scaling(sx: f32, sy: f32) -> Affine {
        Affine {
            a: sx,
            d: sy,
            ..Affine::IDENTITY
        }
    }

    pub fn apply(&self, point: Point) -> Point {
        Point {
            x: self.a * point.x + self.c * point.y + self.e,
            y: self.b * point.x + self.d * point.y + self.f,
        }
    }

    /// Length scale of the x axis, used for font sizes and stroke widths.
    pub fn scale_factor(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    pub fn rotation_degrees(&self) -> f32 {
        let degrees = self.b.atan2(self.a).to_degrees();
        if degrees.abs() < 1e-4 {
            0.0
        } else {
            degrees
        }
    }
}

fn snap(value: f32) -> f32 {
    if value.abs() < 1e-6 {
        0.0
    } else if (value.abs() - 1.0).abs() < 1e-6 {
        value.signum()
    } else {
        value
    }
}

#[derive(Debug, Clone)]
struct GraphicsState {
    transform: Affine,
    font_family: String,
    slant: FontSlant,
    weight: FontWeight,
    font_size: f32,
    line_width: f32,
    current: Point,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            font_family: "Sans".to_string(),
            slant: FontSlant::Normal,
            weight: FontWeight::Normal,
            font_size: 10.0,
            line_width: 1.0,
            current: Point::new(0.0, 0.0),
        }
    }
}

/// Drawing sink that resolves every call to absolute page coordinates.
/// 將繪圖呼叫轉換為頁面絕對座標的畫布。
#[derive(Debug, Clone, Default)]
pub struct PageCanvas {
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    display_list: PrintDisplayList,
}

impl PageCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display_list(&self) -> &PrintDisplayList {
        &self.display_list
    }

    pub fn into_display_list(self) -> PrintDisplayList {
        self.display_list
    }

    pub fn transform(&self) -> Affine {
        self.state.transform
    }

    fn stroke(&self) -> Stroke {
        Stroke {
            width: self.state.line_width * self.state.transform.scale_factor(),
            color: Color::BLACK,
        }
    }
}

impl DrawingSink for PageCanvas {
    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        match self.stack.pop() {
            Some(state) => self.state = state,
            None => tracing::warn!("restore without matching save"),
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.state.transform = self
            .state
            .transform
            .then_local(&Affine::translation(dx, dy));
    }

    fn rotate(&mut self, degrees: f32) {
        self.state.transform = self.state.transform.then_local(&Affine::rotation(degrees));
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.state.transform = self.state.transform.then_local(&Affine::scaling(sx, sy));
    }

    fn select_font(&mut self, family: &str, slant: FontSlant, weight: FontWeight) {
        self.state.font_family = family.to_string();
        self.state.slant = slant;
        self.state.weight = weight;
    }

    fn set_font_size(&mut self, size: f32) {
        self.state.font_size = size;
    }

    fn set_line_width(&mut self, width: f32) {
        self.state.line_width = width;
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.state.current = Point::new(x, y);
    }

    fn show_text(&mut self, text: &str) {
        let extents = self.text_extents(text);
        let transform = self.state.transform;
        let scale = transform.scale_factor();
        if !text.is_empty() {
            self.display_list.push(DisplayCommand::GlyphRun(GlyphRun {
                text: text.to_string(),
                font_family: self.state.font_family.clone(),
                bold: self.state.weight == FontWeight::Bold,
                italic: self.state.slant == FontSlant::Italic,
                font_size_pt: self.state.font_size * scale,
                position: transform.apply(self.state.current),
                rotation_deg: transform.rotation_degrees(),
                width_pt: extents.width * scale,
                color: Color::BLACK,
            }));
        }
        self.state.current.x += extents.width;
    }

    fn text_extents(&self, text: &str) -> TextExtents {
        TextExtents {
            width: metrics::text_width(
                &self.state.font_family,
                self.state.weight == FontWeight::Bold,
                self.state.font_size,
                text,
            ),
            height: metrics::cap_height(self.state.font_size),
        }
    }

    fn line(&mut self, from: Point, to: Point) {
        let transform = self.state.transform;
        self.display_list.push(DisplayCommand::Line {
            start: transform.apply(from),
            end: transform.apply(to),
            stroke: self.stroke(),
        });
    }

    fn rectangle(&mut self, origin: Point, size: Size, style: RectStyle) {
        let transform = self.state.transform;
        let corners = [
            origin,
            Point::new(origin.x + size.width, origin.y),
            Point::new(origin.x + size.width, origin.y + size.height),
            Point::new(origin.x, origin.y + size.height),
        ]
        .map(|corner| transform.apply(corner));
        let (fill, stroke) = match style {
            RectStyle::Filled => (Some(Color::BLACK), None),
            RectStyle::Stroked => (None, Some(self.stroke())),
        };
        self.display_list.push(DisplayCommand::Quad {
            corners,
            fill,
            stroke,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    #[test]
    fn quarter_turn_maps_axes_clockwise() {
        let rotate = Affine::rotation(90.0);
        assert!(approx(rotate.apply(Point::new(1.0, 0.0)), Point::new(0.0, 1.0)));
        assert!(approx(rotate.apply(Point::new(0.0, 1.0)), Point::new(-1.0, 0.0)));
        assert!((rotate.rotation_degrees() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn transforms_compose_in_call_order() {
        let mut canvas = PageCanvas::new();
        canvas.translate(612.0, 0.0);
        canvas.rotate(90.0);
        canvas.move_to(10.0, 20.0);
        canvas.set_font_size(10.0);
        canvas.show_text("X");

        let run = canvas.display_list().glyph_runs().next().unwrap();
        assert!(approx(run.position, Point::new(592.0, 10.0)));
        assert!((run.rotation_deg - 90.0).abs() < 1e-3);
    }

    #[test]
    fn save_restore_brackets_frame_changes() {
        let mut canvas = PageCanvas::new();
        canvas.scale(2.0, 2.0);
        canvas.save();
        canvas.translate(5.0, 5.0);
        canvas.set_font_size(12.0);
        canvas.restore();

        assert_eq!(canvas.transform(), Affine::scaling(2.0, 2.0));
        canvas.move_to(1.0, 1.0);
        canvas.show_text("A");
        let run = canvas.display_list().glyph_runs().next().unwrap();
        assert!(approx(run.position, Point::new(2.0, 2.0)));
        assert_eq!(run.font_size_pt, 20.0);
    }

    #[test]
    fn show_text_advances_current_point() {
        let mut canvas = PageCanvas::new();
        canvas.select_font("Monospace", FontSlant::Normal, FontWeight::Normal);
        canvas.set_font_size(10.0);
        canvas.move_to(0.0, 10.0);
        canvas.show_text("ab");
        canvas.show_text("c");

        let runs: Vec<_> = canvas.display_list().glyph_runs().collect();
        assert!(approx(runs[1].position, Point::new(12.0, 10.0)));
    }

    #[test]
    fn stroked_rectangle_becomes_quad() {
        let mut canvas = PageCanvas::new();
        canvas.set_line_width(0.5);
        canvas.rectangle(Point::new(0.0, 0.0), Size::new(10.0, 4.0), RectStyle::Stroked);
        match &canvas.display_list().commands[0] {
            DisplayCommand::Quad {
                corners,
                fill,
                stroke,
            } => {
                assert!(fill.is_none());
                assert_eq!(stroke.unwrap().width, 0.5);
                assert!(approx(corners[2], Point::new(10.0, 4.0)));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
