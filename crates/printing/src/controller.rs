use std::fmt::Write as _;
use std::io::Write as _;

use image::{codecs::png::PngEncoder, ColorType, ImageBuffer, ImageEncoder, Rgba};
use thiserror::Error;

use crate::display::{Color, DisplayCommand, GlyphRun, Point, PrintDisplayList, Stroke};
use crate::frame::SurfacePlacement;
use crate::job::{Orientation, PrintJobControllerState, PrintJobOptions};
use crate::metrics::{self, FontClass};
use crate::pagination::needs_back_page;
use crate::platform::{PlatformAdapter, PlatformJobHandle, SpoolPage};
use crate::preview::{PreviewCache, PreviewEntry, PrintPreviewKey};
use crate::renderer::{
    render_page, RenderOutcome, RenderRequest, RenderTotals, RenderWarning, Side,
};
use crate::slip_layout::{LayoutConfiguration, SLIP_HEIGHT_PT, SLIP_WIDTH_PT};

type Raster = ImageBuffer<Rgba<u8>, Vec<u8>>;

/// A rendered slip face positioned on a physical page.
/// 已放置於實體頁面上的存款單面。
#[derive(Debug, Clone)]
pub struct SlipPage {
    pub page_number: u32,
    pub side: Side,
    pub display_list: PrintDisplayList,
}

/// Result produced after executing a print job.
/// 列印作業完成後所產生的結果。
#[derive(Debug, Clone)]
pub struct PrintJobResult {
    pub totals: RenderTotals,
    pub pages: Vec<SlipPage>,
    pub pdf_data: Vec<u8>,
    pub warnings: Vec<RenderWarning>,
    pub state: PrintJobControllerState,
}

impl PrintJobResult {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Configuration for preview generation.
/// 建立預覽時所需的設定資訊。
#[derive(Debug)]
pub struct PreviewConfig<'a> {
    pub cache: &'a mut PreviewCache,
    pub zoom_levels: &'a [u32],
}

/// Errors raised while running the print pipeline.
/// 列印管線執行時可能發生的錯誤。
#[derive(Debug, Error)]
pub enum PrintJobError {
    #[error("slip rendering failed: {0}")]
    Render(String),
    #[error("preview rendering failed: {0}")]
    Preview(String),
    #[error("PDF generation failed: {0}")]
    Pdf(String),
    #[error("platform adapter failed: {0}")]
    Platform(String),
}

/// Renders the slip onto paper, writes the PDF and hands it to `adapter`.
/// 端到端執行列印管線：渲染存款單、產生 PDF 並交給平台介面。
///
/// The front page is always produced; the back page only when more than two
/// checks are listed.
pub fn run_print_job<A>(
    request: &RenderRequest<'_>,
    layout: &LayoutConfiguration,
    job_options: &PrintJobOptions,
    adapter: &A,
    preview: Option<PreviewConfig<'_>>,
) -> Result<PrintJobResult, PrintJobError>
where
    A: PlatformAdapter,
    A::Error: std::fmt::Display,
{
    let mut state = PrintJobControllerState::Idle;
    let (page_width, page_height) = job_options.paper.to_points(Orientation::Portrait);
    check_leaf_fits(page_width, page_height, job_options.margin_pt)
        .map_err(|err| fail(job_options, err))?;
    advance(&mut state, PrintJobControllerState::Render, job_options);
    let placement = SurfacePlacement::print(job_options.paper, job_options.margin_pt);

    let mut sides = vec![Side::Front];
    if needs_back_page(request.checks) {
        sides.push(Side::Back);
    }

    let mut pages = Vec::with_capacity(sides.len());
    let mut outcomes = Vec::with_capacity(sides.len());
    for (index, side) in sides.iter().copied().enumerate() {
        let (display_list, outcome) = render_page(side, request, layout, &placement);
        pages.push(SlipPage {
            page_number: index as u32 + 1,
            side,
            display_list,
        });
        outcomes.push(outcome);
    }
    let (totals, warnings) = merge_outcomes(&outcomes);

    if let Some(config) = preview {
        for side in &sides {
            for zoom in config.zoom_levels {
                let (entry, _) = render_preview(*side, request, layout, *zoom)
                    .map_err(|err| fail(job_options, err))?;
                let key = PrintPreviewKey {
                    job_id: job_options.job_id,
                    side: *side,
                    zoom_percent: *zoom,
                };
                config.cache.insert(key, entry);
            }
        }
    }

    let pdf_data = render_pdf_document(&pages, page_width, page_height)
        .map_err(|reason| fail(job_options, PrintJobError::Pdf(reason)))?;

    advance(&mut state, PrintJobControllerState::Spooling, job_options);
    spool_pages(adapter, job_options, &pages, &pdf_data)
        .map_err(|reason| fail(job_options, PrintJobError::Platform(reason)))?;
    advance(&mut state, PrintJobControllerState::Completed, job_options);

    tracing::info!(
        job = %job_options.job_id,
        pages = pages.len(),
        total = %totals.front_total,
        "print job completed"
    );
    Ok(PrintJobResult {
        totals,
        pages,
        pdf_data,
        warnings,
        state,
    })
}

fn advance(
    state: &mut PrintJobControllerState,
    next: PrintJobControllerState,
    job_options: &PrintJobOptions,
) {
    tracing::debug!(job = %job_options.job_id, from = ?*state, to = ?next, "print job state");
    *state = next;
}

fn fail(job_options: &PrintJobOptions, err: PrintJobError) -> PrintJobError {
    tracing::warn!(
        job = %job_options.job_id,
        state = ?PrintJobControllerState::Failed,
        error = %err,
        "print job failed"
    );
    err
}

/// Rasterizes one face of the slip as it appears on screen at `zoom_percent`.
/// 以指定縮放比例產生存款單單面的預覽 PNG。
pub fn render_preview(
    side: Side,
    request: &RenderRequest<'_>,
    layout: &LayoutConfiguration,
    zoom_percent: u32,
) -> Result<(PreviewEntry, RenderOutcome), PrintJobError> {
    let placement = SurfacePlacement::preview(zoom_percent);
    let (display_list, outcome) = render_page(side, request, layout, &placement);
    let (width_pt, height_pt) = placement.surface_size();
    let entry = rasterize_png(&display_list, width_pt, height_pt, zoom_percent)
        .map_err(PrintJobError::Preview)?;
    Ok((entry, outcome))
}

fn check_leaf_fits(page_width: f32, page_height: f32, margin: f32) -> Result<(), PrintJobError> {
    if margin < 0.0
        || margin + SLIP_HEIGHT_PT > page_width
        || margin + SLIP_WIDTH_PT > page_height
    {
        return Err(PrintJobError::Render(format!(
            "slip does not fit a {page_width:.0}x{page_height:.0}pt page with a {margin}pt margin"
        )));
    }
    Ok(())
}

fn merge_outcomes(outcomes: &[RenderOutcome]) -> (RenderTotals, Vec<RenderWarning>) {
    let totals = outcomes
        .first()
        .map(|outcome| outcome.totals)
        .unwrap_or_default();
    let mut warnings: Vec<RenderWarning> = Vec::new();
    for outcome in outcomes {
        if outcome.totals != totals {
            tracing::error!(?outcome.side, "render passes disagree on totals");
        }
        for warning in &outcome.warnings {
            if !warnings.contains(warning) {
                warnings.push(*warning);
            }
        }
    }
    (totals, warnings)
}

fn rasterize_png(
    display_list: &PrintDisplayList,
    width_pt: f32,
    height_pt: f32,
    zoom_percent: u32,
) -> Result<PreviewEntry, String> {
    // Preview surfaces are laid out in screen pixels already.
    let width_px = width_pt.ceil().max(1.0) as u32;
    let height_px = height_pt.ceil().max(1.0) as u32;
    let mut image = ImageBuffer::from_pixel(width_px, height_px, Rgba([255, 255, 255, 255]));

    for command in &display_list.commands {
        match command {
            DisplayCommand::GlyphRun(run) => {
                let corners = glyph_box(run);
                fill_bounds(&mut image, &corners, run.color);
            }
            DisplayCommand::Line { start, end, stroke } => {
                draw_line(&mut image, *start, *end, stroke);
            }
            DisplayCommand::Quad {
                corners,
                fill,
                stroke,
            } => {
                if let Some(color) = fill {
                    fill_bounds(&mut image, corners, *color);
                }
                if let Some(stroke) = stroke {
                    for index in 0..corners.len() {
                        let next = corners[(index + 1) % corners.len()];
                        draw_line(&mut image, corners[index], next, stroke);
                    }
                }
            }
        }
    }

    let mut data = Vec::new();
    PngEncoder::new(&mut data)
        .write_image(image.as_raw(), width_px, height_px, ColorType::Rgba8)
        .map_err(|err| err.to_string())?;

    Ok(PreviewEntry {
        width_px,
        height_px,
        dpi: (72 * zoom_percent.max(10) / 100).max(1),
        data,
    })
}

/// Corners of the box a glyph run occupies above its baseline.
fn glyph_box(run: &GlyphRun) -> [Point; 4] {
    let (sin, cos) = run.rotation_deg.to_radians().sin_cos();
    let height = metrics::cap_height(run.font_size_pt);
    let along = Point::new(cos * run.width_pt, sin * run.width_pt);
    let up = Point::new(sin * height, -cos * height);
    let origin = run.position;
    [
        origin,
        Point::new(origin.x + along.x, origin.y + along.y),
        Point::new(origin.x + along.x + up.x, origin.y + along.y + up.y),
        Point::new(origin.x + up.x, origin.y + up.y),
    ]
}

fn fill_bounds(buffer: &mut Raster, corners: &[Point], color: Color) {
    let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
    let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
    for corner in corners {
        min_x = min_x.min(corner.x);
        min_y = min_y.min(corner.y);
        max_x = max_x.max(corner.x);
        max_y = max_y.max(corner.y);
    }
    let x0 = (min_x.round() as i64).clamp(0, buffer.width() as i64) as u32;
    let y0 = (min_y.round() as i64).clamp(0, buffer.height() as i64) as u32;
    let x1 = (max_x.round() as i64).clamp(0, buffer.width() as i64) as u32;
    let y1 = (max_y.round() as i64).clamp(0, buffer.height() as i64) as u32;
    let rgba = color_to_rgba(color);
    for y in y0..y1.max(y0 + 1).min(buffer.height()) {
        for x in x0..x1.max(x0 + 1).min(buffer.width()) {
            buffer.put_pixel(x, y, rgba);
        }
    }
}

fn draw_line(buffer: &mut Raster, start: Point, end: Point, stroke: &Stroke) {
    let rgba = color_to_rgba(stroke.color);
    let thickness = stroke.width.round().max(1.0) as i64;
    let (dx, dy) = (end.x - start.x, end.y - start.y);
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;
    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        let x = (start.x + dx * t).round() as i64;
        let y = (start.y + dy * t).round() as i64;
        for offset in 0..thickness {
            let (px, py) = if dx.abs() >= dy.abs() {
                (x, y + offset)
            } else {
                (x + offset, y)
            };
            if px >= 0 && py >= 0 && px < buffer.width() as i64 && py < buffer.height() as i64 {
                buffer.put_pixel(px as u32, py as u32, rgba);
            }
        }
    }
}

fn color_to_rgba(color: Color) -> Rgba<u8> {
    Rgba([
        clamp_to_u8(color.r),
        clamp_to_u8(color.g),
        clamp_to_u8(color.b),
        clamp_to_u8(color.a),
    ])
}

fn clamp_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn spool_pages<A>(
    adapter: &A,
    job_options: &PrintJobOptions,
    pages: &[SlipPage],
    document: &[u8],
) -> Result<(), String>
where
    A: PlatformAdapter,
    A::Error: std::fmt::Display,
{
    let mut handle = adapter
        .begin_job(job_options)
        .map_err(|err| err.to_string())?;

    for page in pages {
        let submitted = handle.submit_page(SpoolPage {
            job_id: job_options.job_id,
            page_number: page.page_number,
            side: page.side,
            display_list: page.display_list.clone(),
        });
        if let Err(err) = submitted {
            let reason = err.to_string();
            handle.abort(&reason);
            return Err(reason);
        }
    }

    handle.finish(document).map_err(|err| err.to_string())
}

const PDF_FONTS: [(&str, &str); 3] = [
    ("F1", "Helvetica"),
    ("F2", "Helvetica-Bold"),
    ("F3", "Courier"),
];

fn render_pdf_document(
    pages: &[SlipPage],
    page_width: f32,
    page_height: f32,
) -> Result<Vec<u8>, String> {
    if pages.is_empty() {
        return Err("no slip pages were rendered".to_string());
    }

    let mut builder = PdfBuilder::new();
    let pages_object = builder.reserve();
    let font_resources = PDF_FONTS
        .iter()
        .map(|(name, base_font)| {
            let object = builder.add_object(format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{base_font} /Encoding /WinAnsiEncoding >>"
            ));
            format!("/{name} {object} 0 R")
        })
        .collect::<Vec<_>>()
        .join(" ");

    let mut page_objects = Vec::with_capacity(pages.len());
    for page in pages {
        let content_stream =
            render_page_stream(&page.display_list, page_height).map_err(|err| err.to_string())?;
        let content_object = builder.add_stream(&content_stream);
        let page_object = builder.add_object(format!(
            "<< /Type /Page /Parent {pages_object} 0 R /MediaBox [0 0 {width} {height}] \
             /Resources << /Font << {font_resources} >> >> /Contents {content_object} 0 R >>",
            width = fmt_float(page_width),
            height = fmt_float(page_height),
        ));
        page_objects.push(page_object);
    }

    let kids = page_objects
        .iter()
        .map(|obj| format!("{obj} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");
    builder.fill(
        pages_object,
        format!(
            "<< /Type /Pages /Count {count} /Kids [{kids}] >>",
            count = pages.len()
        ),
    );
    let catalog = builder.add_object(format!("<< /Type /Catalog /Pages {pages_object} 0 R >>"));

    builder.finish(catalog).map_err(|err| err.to_string())
}

fn render_page_stream(
    display_list: &PrintDisplayList,
    page_height: f32,
) -> Result<String, std::fmt::Error> {
    let mut stream = String::new();
    for command in &display_list.commands {
        match command {
            DisplayCommand::GlyphRun(run) => {
                // Page space is y-down with clockwise angles; PDF is y-up.
                let (sin, cos) = run.rotation_deg.to_radians().sin_cos();
                writeln!(
                    &mut stream,
                    "{color} rg\nBT\n/{font} {size} Tf\n{a} {b} {c} {d} {x} {y} Tm\n({text}) Tj\nET",
                    color = rgb_to_pdf(run.color),
                    font = pdf_font(run),
                    size = fmt_float(run.font_size_pt),
                    a = fmt_float(cos),
                    b = fmt_float(-sin),
                    c = fmt_float(sin),
                    d = fmt_float(cos),
                    x = fmt_float(run.position.x),
                    y = fmt_float(page_height - run.position.y),
                    text = pdf_escape_text(&run.text),
                )?;
            }
            DisplayCommand::Line { start, end, stroke } => {
                writeln!(
                    &mut stream,
                    "{color} RG\n{width} w\n{x0} {y0} m {x1} {y1} l S",
                    color = rgb_to_pdf(stroke.color),
                    width = fmt_float(stroke.width),
                    x0 = fmt_float(start.x),
                    y0 = fmt_float(page_height - start.y),
                    x1 = fmt_float(end.x),
                    y1 = fmt_float(page_height - end.y),
                )?;
            }
            DisplayCommand::Quad {
                corners,
                fill,
                stroke,
            } => {
                if let Some(color) = fill {
                    writeln!(&mut stream, "{} rg", rgb_to_pdf(*color))?;
                }
                if let Some(stroke) = stroke {
                    writeln!(
                        &mut stream,
                        "{} RG\n{} w",
                        rgb_to_pdf(stroke.color),
                        fmt_float(stroke.width)
                    )?;
                }
                for (index, corner) in corners.iter().enumerate() {
                    let op = if index == 0 { "m" } else { "l" };
                    write!(
                        &mut stream,
                        "{} {} {op} ",
                        fmt_float(corner.x),
                        fmt_float(page_height - corner.y)
                    )?;
                }
                let paint = match (fill.is_some(), stroke.is_some()) {
                    (true, true) => "B",
                    (true, false) => "f",
                    (false, true) => "S",
                    (false, false) => "n",
                };
                writeln!(&mut stream, "h {paint}")?;
            }
        }
    }
    Ok(stream)
}

fn pdf_font(run: &GlyphRun) -> &'static str {
    match FontClass::of(&run.font_family) {
        FontClass::Sans if run.bold => "F2",
        FontClass::Sans => "F1",
        FontClass::Monospace | FontClass::Micr => "F3",
    }
}

fn fmt_float(value: f32) -> String {
    let value = if value.abs() < 0.0005 { 0.0 } else { value };
    format!("{:.3}", value)
}

fn rgb_to_pdf(color: Color) -> String {
    format!(
        "{:.3} {:.3} {:.3}",
        color.r.clamp(0.0, 1.0),
        color.g.clamp(0.0, 1.0),
        color.b.clamp(0.0, 1.0)
    )
}

/// Escapes a string literal for WinAnsi-encoded Type1 fonts. Characters outside
/// Latin-1 print as `?`.
fn pdf_escape_text(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '(' | ')' | '\\' => {
                output.push('\\');
                output.push(ch);
            }
            ' '..='~' => output.push(ch),
            '\u{a0}'..='\u{ff}' => {
                let _ = write!(output, "\\{:03o}", ch as u32);
            }
            _ => output.push('?'),
        }
    }
    output
}

struct PdfBuilder {
    objects: Vec<Option<String>>,
}

impl PdfBuilder {
    fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Allocates an object number whose body is supplied later with [`Self::fill`].
    fn reserve(&mut self) -> usize {
        self.objects.push(None);
        self.objects.len()
    }

    fn fill(&mut self, number: usize, body: String) {
        if let Some(slot) = self.objects.get_mut(number - 1) {
            *slot = Some(body);
        }
    }

    fn add_object(&mut self, body: impl Into<String>) -> usize {
        self.objects.push(Some(body.into()));
        self.objects.len()
    }

    fn add_stream(&mut self, stream: &str) -> usize {
        self.add_object(format!(
            "<< /Length {} >>\nstream\n{stream}\nendstream",
            stream.len()
        ))
    }

    fn finish(self, root: usize) -> std::io::Result<Vec<u8>> {
        let mut output = Vec::new();
        output.extend_from_slice(b"%PDF-1.4\n%\xFF\xFF\xFF\xFF\n");
        let mut offsets = Vec::with_capacity(self.objects.len());

        for (index, body) in self.objects.iter().enumerate() {
            offsets.push(output.len());
            let body = body.as_deref().unwrap_or("null");
            writeln!(&mut output, "{} 0 obj\n{}\nendobj", index + 1, body)?;
        }

        let xref_start = output.len();
        writeln!(
            &mut output,
            "xref\n0 {}\n0000000000 65535 f ",
            self.objects.len() + 1
        )?;
        for offset in &offsets {
            writeln!(&mut output, "{:010} 00000 n ", offset)?;
        }

        writeln!(
            &mut output,
            "trailer\n<< /Size {} /Root {} 0 R >>",
            self.objects.len() + 1,
            root
        )?;
        writeln!(&mut output, "startxref\n{}\n%%EOF", xref_start)?;

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{PaperId, PaperSize, PrintTarget};
    use crate::platform::MockPlatformAdapter;
    use chrono::NaiveDate;
    use depositslip_core::{Account, Amount, Check};

    fn checks(amounts: &[&str]) -> Vec<Check> {
        amounts
            .iter()
            .map(|text| Check::new(Amount::parse(text).unwrap()))
            .collect()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn two_checks_print_a_single_page() {
        let account = Account::new("4567", "Jane Doe", "011000015");
        let checks = checks(&["100.00", "250.50"]);
        let request = RenderRequest {
            account: Some(&account),
            checks: &checks,
            date: date(),
        };
        let adapter = MockPlatformAdapter::new();
        let result = run_print_job(
            &request,
            &LayoutConfiguration::default(),
            &PrintJobOptions::default(),
            &adapter,
            None,
        )
        .unwrap();

        assert_eq!(result.page_count(), 1);
        assert_eq!(result.totals.front_total.cents(), 35_050);
        let jobs = adapter.drain_jobs();
        assert_eq!(jobs[0].pages.len(), 1);
        assert_eq!(jobs[0].document_len, result.pdf_data.len());
    }

    #[test]
    fn third_check_adds_back_page_and_previews() {
        let account = Account::new("4567", "Jane Doe", "011000015");
        let checks = checks(&["100.00", "250.50", "75.00"]);
        let request = RenderRequest {
            account: Some(&account),
            checks: &checks,
            date: date(),
        };
        let options = PrintJobOptions::new(Some(PrintTarget::new("Mock")), 1);
        let mut cache = PreviewCache::with_capacity(8);
        let result = run_print_job(
            &request,
            &LayoutConfiguration::default(),
            &options,
            &MockPlatformAdapter::new(),
            Some(PreviewConfig {
                cache: &mut cache,
                zoom_levels: &[100, 150],
            }),
        )
        .unwrap();

        let sides: Vec<_> = result.pages.iter().map(|page| page.side).collect();
        assert_eq!(sides, vec![Side::Front, Side::Back]);
        assert_eq!(cache.len(), 4);
        let key = PrintPreviewKey {
            job_id: options.job_id,
            side: Side::Back,
            zoom_percent: 150,
        };
        let entry = cache.get(&key).unwrap();
        assert_eq!(entry.width_px, ((SLIP_WIDTH_PT + 24.0) * 1.5).ceil() as u32);
    }

    #[test]
    fn oversized_margin_is_rejected() {
        let mut options = PrintJobOptions::default();
        options.paper = PaperSize::new(PaperId::Custom, 100.0, 100.0);
        let request = RenderRequest {
            account: None,
            checks: &[],
            date: date(),
        };
        let err = run_print_job(
            &request,
            &LayoutConfiguration::default(),
            &options,
            &MockPlatformAdapter::new(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, PrintJobError::Render(_)));
    }

    #[test]
    fn front_text_is_rotated_on_the_page() {
        let mut list = PrintDisplayList::default();
        list.push(DisplayCommand::GlyphRun(GlyphRun {
            text: "TOTAL (cash)".into(),
            font_family: "Sans".into(),
            bold: true,
            italic: false,
            font_size_pt: 7.0,
            position: Point::new(100.0, 50.0),
            rotation_deg: 90.0,
            width_pt: 30.0,
            color: Color::BLACK,
        }));
        let stream = render_page_stream(&list, 792.0).unwrap();
        assert!(stream.contains("/F2 7.000 Tf"), "{stream}");
        assert!(
            stream.contains("0.000 -1.000 1.000 0.000 100.000 742.000 Tm"),
            "{stream}"
        );
        assert!(stream.contains("(TOTAL \\(cash\\)) Tj"));
    }

    #[test]
    fn micr_and_monospace_map_to_courier() {
        let mut run = GlyphRun {
            text: "A011000015A".into(),
            font_family: "GnuMICR".into(),
            bold: false,
            italic: false,
            font_size_pt: 10.0,
            position: Point::new(0.0, 0.0),
            rotation_deg: 0.0,
            width_pt: 66.0,
            color: Color::BLACK,
        };
        assert_eq!(pdf_font(&run), "F3");
        run.font_family = "Monospace".into();
        assert_eq!(pdf_font(&run), "F3");
        run.font_family = "Sans".into();
        assert_eq!(pdf_font(&run), "F1");
    }

    #[test]
    fn latin1_text_is_escaped_as_octal() {
        assert_eq!(pdf_escape_text("José"), "Jos\\351");
        assert_eq!(pdf_escape_text("東京"), "??");
    }

    #[test]
    fn pdf_references_reserved_pages_object() {
        let pages = vec![SlipPage {
            page_number: 1,
            side: Side::Front,
            display_list: PrintDisplayList::default(),
        }];
        let pdf = render_pdf_document(&pages, 612.0, 792.0).unwrap();
        let text = String::from_utf8_lossy(&pdf);
        assert!(text.contains("1 0 obj\n<< /Type /Pages /Count 1"));
        assert!(text.contains("/Parent 1 0 R"));
        assert!(text.contains("/BaseFont /Courier"));
        assert!(text.trim_end().ends_with("%%EOF"));
    }

    #[test]
    fn preview_marks_text_pixels() {
        let mut list = PrintDisplayList::default();
        list.push(DisplayCommand::GlyphRun(GlyphRun {
            text: "X".into(),
            font_family: "Sans".into(),
            bold: false,
            italic: false,
            font_size_pt: 10.0,
            position: Point::new(10.0, 20.0),
            rotation_deg: 0.0,
            width_pt: 6.0,
            color: Color::BLACK,
        }));
        let entry = rasterize_png(&list, 40.0, 40.0, 100).unwrap();
        let image = image::load_from_memory(&entry.data).unwrap().to_rgba8();
        assert_eq!(image.get_pixel(12, 17).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(30, 30).0, [255, 255, 255, 255]);
        assert_eq!(entry.dpi, 72);
    }
}
