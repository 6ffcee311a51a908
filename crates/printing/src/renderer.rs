//! Slip renderer: turns account data, checks and the layout into drawing calls.
//! 存款單渲染器：將帳戶資料、支票與版面轉換為繪圖呼叫。
//!
//! The caller positions the front frame on its surface (see
//! [`crate::frame::SurfacePlacement`]); the renderer draws in slip points and
//! derives the back frame from the front one by itself, so preview and print
//! share every coordinate.

use chrono::NaiveDate;
use depositslip_core::{format_amount_checked, Account, Amount, Check, MAX_FORMATTABLE_CENTS};

use crate::canvas::PageCanvas;
use crate::display::{Point, PrintDisplayList, Size};
use crate::frame::SurfacePlacement;
use crate::pagination::{
    checks_for_back, checks_for_front, needs_back_subtotal_on_front, FRONT_ROWS,
};
use crate::sink::{DrawingSink, FontSlant, FontWeight, RectStyle};
use crate::slip_layout::{
    LayoutConfiguration, MICR_FONT_SIZE_PT, SLIP_HEIGHT_PT, SLIP_WIDTH_PT,
};

/// Transit symbol in the E-13B MICR face.
pub const MICR_TRANSIT: char = 'A';
/// On-us symbol in the E-13B MICR face.
pub const MICR_ON_US: char = 'C';
/// Branch code printed after the on-us symbol.
pub const MICR_BRANCH_SUFFIX: &str = "000";

const HEADING: &str = "DEPOSIT TICKET";
const HEADING_SIZE_PT: f32 = 12.0;
const HEADING_Y: f32 = 24.0;
const BORDER_INSET: f32 = 4.0;
const FORM_LINE_WIDTH: f32 = 0.75;
const RULE_LINE_WIDTH: f32 = 0.5;
const RULE_DROP: f32 = 3.0;
const FRONT_CAPTION_X: f32 = 250.0;
const BACK_CAPTION_X: f32 = 12.0;
const TOTAL_BOX_WIDTH: f32 = 94.0;
const TOTAL_BOX_HEIGHT: f32 = 20.0;
const BACK_CAPTIONS_TOP: [(&str, f32); 2] = [("CHECKS", 16.0), ("LIST SINGLY", 28.0)];
const BACK_CAPTIONS_TOTAL: [&str; 3] = ["TOTAL", "MUST BE ENTERED", "ON FRONT SIDE"];
const BACK_CAPTION_LEADING: f32 = 12.0;

/// Face of the slip being drawn.
/// 正在繪製的存款單面。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Front,
    Back,
}

/// Inputs for one render pass. Borrowed read-only for the duration of the pass.
/// 單次渲染所需的輸入資料。
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub account: Option<&'a Account>,
    pub checks: &'a [Check],
    /// Printed in the date field as "Month D, YYYY".
    pub date: NaiveDate,
}

/// Where an amount is printed; used to report formatting problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountSlot {
    Row(usize),
    BackSubtotal,
    Total,
}

/// Conditions that leave the slip visibly incomplete without aborting the pass.
/// 不中斷渲染、但會讓存款單內容不完整的狀況。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderWarning {
    NoAccountSelected,
    AmountOutOfRange { slot: AmountSlot },
    /// Back rows from `first_row` on run into the total box.
    RowsPastTotal { first_row: usize },
}

/// Running totals accumulated by a pass.
/// 渲染過程累計的金額。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderTotals {
    /// Rows 0 and 1 only.
    pub front_rows_total: Amount,
    /// Rows 2 and later.
    pub back_subtotal: Amount,
    /// Grand total printed on the front: rows 0-1 plus the back subtotal when present.
    pub front_total: Amount,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutcome {
    pub side: Side,
    pub totals: RenderTotals,
    pub warnings: Vec<RenderWarning>,
}

/// Per-pass state. Built fresh for every call to [`render`] and dropped at the end.
struct RenderContext<'a> {
    side: Side,
    request: &'a RenderRequest<'a>,
    layout: &'a LayoutConfiguration,
    running_total: Amount,
    back_subtotal: Amount,
    warnings: Vec<RenderWarning>,
}

impl<'a> RenderContext<'a> {
    fn new(side: Side, request: &'a RenderRequest<'a>, layout: &'a LayoutConfiguration) -> Self {
        Self {
            side,
            request,
            layout,
            running_total: Amount::ZERO,
            back_subtotal: Amount::ZERO,
            warnings: Vec::new(),
        }
    }

    fn amount_text(&mut self, amount: Amount, slot: AmountSlot) -> String {
        match format_amount_checked(amount.as_f64()) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(%err, ?slot, "amount clamped on slip");
                self.warnings.push(RenderWarning::AmountOutOfRange { slot });
                Amount::from_cents(MAX_FORMATTABLE_CENTS).to_string()
            }
        }
    }

    fn finish(self) -> RenderOutcome {
        let (front_rows_total, back_subtotal) = (self.running_total, self.back_subtotal);
        RenderOutcome {
            side: self.side,
            totals: RenderTotals {
                front_rows_total,
                back_subtotal,
                front_total: front_rows_total + back_subtotal,
            },
            warnings: self.warnings,
        }
    }
}

/// Draws one face of the slip onto `sink`.
/// 將存款單的一面繪製到 `sink`。
///
/// The sink's current transform must map slip points of the front frame. For
/// [`Side::Back`] the frame is turned a quarter counter-clockwise about the
/// leaf's bottom-left corner before drawing, and restored afterwards.
pub fn render(
    side: Side,
    request: &RenderRequest<'_>,
    layout: &LayoutConfiguration,
    sink: &mut dyn DrawingSink,
) -> RenderOutcome {
    tracing::debug!(?side, checks = request.checks.len(), "rendering slip");
    let mut context = RenderContext::new(side, request, layout);
    match side {
        Side::Front => draw_front(&mut context, sink),
        Side::Back => draw_back(&mut context, sink),
    }
    context.finish()
}

/// Renders `side` onto a fresh [`PageCanvas`] placed with `placement`.
pub fn render_page(
    side: Side,
    request: &RenderRequest<'_>,
    layout: &LayoutConfiguration,
    placement: &SurfacePlacement,
) -> (PrintDisplayList, RenderOutcome) {
    let mut canvas = PageCanvas::new();
    canvas.save();
    placement.apply(&mut canvas);
    let outcome = render(side, request, layout, &mut canvas);
    canvas.restore();
    (canvas.into_display_list(), outcome)
}

fn draw_front(context: &mut RenderContext<'_>, sink: &mut dyn DrawingSink) {
    draw_front_static(context.layout, sink);
    draw_account_fields(context, sink);
    draw_micr_line(context, sink);

    let layout = context.layout;
    let checks = context.request.checks;
    select_amount_font(layout, sink);
    for (row, check) in checks_for_front(checks).iter().enumerate() {
        let text = context.amount_text(check.amount, AmountSlot::Row(row));
        show_right_aligned(sink, &text, layout.front.amount_x, layout.front.amount_y(row));
        context.running_total += check.amount;
    }

    context.back_subtotal = checks_for_back(checks).iter().map(|check| check.amount).sum();
    if needs_back_subtotal_on_front(checks) {
        let text = context.amount_text(context.back_subtotal, AmountSlot::BackSubtotal);
        show_right_aligned(sink, &text, layout.front.amount_x, layout.front.subtotal_y);
    }

    let grand_total = context.running_total + context.back_subtotal;
    let text = context.amount_text(grand_total, AmountSlot::Total);
    show_right_aligned(sink, &text, layout.front.amount_x, layout.front.total_y);
}

fn draw_back(context: &mut RenderContext<'_>, sink: &mut dyn DrawingSink) {
    let layout = context.layout;
    let checks = context.request.checks;
    context.running_total = checks_for_front(checks).iter().map(|check| check.amount).sum();

    sink.save();
    sink.translate(0.0, SLIP_HEIGHT_PT);
    sink.rotate(-90.0);

    draw_back_static(layout, sink);

    select_amount_font(layout, sink);
    let last_row_y = layout.back.total_y - layout.back.amount_pitch;
    let mut overflowed = false;
    for (offset, check) in checks_for_back(checks).iter().enumerate() {
        let row = FRONT_ROWS + offset;
        let y = layout.back.amount_y(row);
        if y > last_row_y && !overflowed {
            overflowed = true;
            tracing::warn!(row, rows = checks.len(), "check rows overlap the back total");
            context.warnings.push(RenderWarning::RowsPastTotal { first_row: row });
        }
        let text = context.amount_text(check.amount, AmountSlot::Row(row));
        show_right_aligned(sink, &text, layout.back.amount_x, y);
        context.back_subtotal += check.amount;
    }

    let text = context.amount_text(context.back_subtotal, AmountSlot::BackSubtotal);
    show_right_aligned(sink, &text, layout.back.amount_x, layout.back.total_y);

    sink.restore();
}

fn draw_front_static(layout: &LayoutConfiguration, sink: &mut dyn DrawingSink) {
    let fonts = &layout.fonts;
    let front = &layout.front;

    sink.set_line_width(FORM_LINE_WIDTH);
    sink.rectangle(
        Point::new(BORDER_INSET, BORDER_INSET),
        Size::new(
            SLIP_WIDTH_PT - 2.0 * BORDER_INSET,
            SLIP_HEIGHT_PT - 2.0 * BORDER_INSET,
        ),
        RectStyle::Stroked,
    );

    sink.select_font(&fonts.sans_family, FontSlant::Normal, FontWeight::Bold);
    sink.set_font_size(HEADING_SIZE_PT);
    sink.move_to(front.label_x, HEADING_Y);
    sink.show_text(HEADING);

    sink.select_font(&fonts.sans_family, FontSlant::Normal, FontWeight::Normal);
    sink.set_font_size(fonts.label_size());
    if fonts.print_name_account_labels {
        for (label, y) in [
            ("Name", front.name_y),
            ("Account No", front.account_y),
            ("Date", front.date_y),
        ] {
            sink.move_to(front.label_x, y);
            sink.show_text(label);
        }
    }

    sink.move_to(FRONT_CAPTION_X, front.amount_y(0));
    sink.show_text("CHECKS");
    sink.move_to(FRONT_CAPTION_X, front.subtotal_y);
    sink.show_text("TOTAL FROM OTHER SIDE");
    sink.select_font(&fonts.sans_family, FontSlant::Normal, FontWeight::Bold);
    sink.move_to(FRONT_CAPTION_X, front.total_y);
    sink.show_text("TOTAL");

    sink.set_line_width(RULE_LINE_WIDTH);
    let rule_end = front.amount_x + BORDER_INSET;
    for y in [
        front.amount_y(0),
        front.amount_y(1),
        front.subtotal_y,
    ] {
        sink.line(
            Point::new(FRONT_CAPTION_X, y + RULE_DROP),
            Point::new(rule_end, y + RULE_DROP),
        );
    }
    sink.set_line_width(FORM_LINE_WIDTH);
    sink.rectangle(
        Point::new(rule_end - TOTAL_BOX_WIDTH, front.total_y - TOTAL_BOX_HEIGHT + 6.0),
        Size::new(TOTAL_BOX_WIDTH, TOTAL_BOX_HEIGHT),
        RectStyle::Stroked,
    );
}

fn draw_account_fields(context: &mut RenderContext<'_>, sink: &mut dyn DrawingSink) {
    let fonts = &context.layout.fonts;
    let front = &context.layout.front;

    sink.select_font(&fonts.sans_family, FontSlant::Normal, FontWeight::Normal);
    sink.set_font_size(fonts.sans_size);

    match context.request.account {
        Some(account) => {
            draw_field(sink, front.value_x, front.name_y, &account.name);
            draw_field(sink, front.value_x, front.account_y, &account.number);
        }
        None => {
            tracing::warn!("no account selected; name and account fields left blank");
            context.warnings.push(RenderWarning::NoAccountSelected);
        }
    }
    let date = context.request.date.format("%B %-d, %Y").to_string();
    draw_field(sink, front.value_x, front.date_y, &date);

    sink.set_line_width(RULE_LINE_WIDTH);
    for y in [front.name_y, front.account_y, front.date_y] {
        sink.line(
            Point::new(front.value_x, y + 1.0),
            Point::new(front.value_x + front.underline_width, y + 1.0),
        );
    }
}

fn draw_field(sink: &mut dyn DrawingSink, x: f32, y: f32, value: &str) {
    if value.is_empty() {
        return;
    }
    sink.move_to(x, y);
    sink.show_text(value);
}

fn draw_micr_line(context: &RenderContext<'_>, sink: &mut dyn DrawingSink) {
    let Some(account) = context.request.account else {
        return;
    };
    let front = &context.layout.front;
    sink.select_font(
        &context.layout.fonts.micr_family,
        FontSlant::Normal,
        FontWeight::Normal,
    );
    sink.set_font_size(MICR_FONT_SIZE_PT);
    sink.move_to(front.micr_x, front.micr_y);
    sink.show_text(&micr_line(account));
}

/// Builds the machine-readable line: `⑆routing⑆ account⑈branch`.
/// 組合 MICR 機讀行。
pub fn micr_line(account: &Account) -> String {
    format!(
        "{MICR_TRANSIT}{routing}{MICR_TRANSIT} {number}{MICR_ON_US}{MICR_BRANCH_SUFFIX}",
        routing = account.routing_number.trim(),
        number = account.number.trim(),
    )
}

fn draw_back_static(layout: &LayoutConfiguration, sink: &mut dyn DrawingSink) {
    let fonts = &layout.fonts;
    let back = &layout.back;
    // Back frame: x across the short edge, y down the long edge.
    sink.set_line_width(FORM_LINE_WIDTH);
    sink.rectangle(
        Point::new(BORDER_INSET, BORDER_INSET),
        Size::new(
            SLIP_HEIGHT_PT - 2.0 * BORDER_INSET,
            SLIP_WIDTH_PT - 2.0 * BORDER_INSET,
        ),
        RectStyle::Stroked,
    );

    sink.select_font(&fonts.sans_family, FontSlant::Normal, FontWeight::Bold);
    sink.set_font_size(fonts.label_size());
    for (caption, y) in BACK_CAPTIONS_TOP {
        sink.move_to(BACK_CAPTION_X, y);
        sink.show_text(caption);
    }

    let rule_end = back.amount_x + BORDER_INSET;
    sink.set_line_width(RULE_LINE_WIDTH);
    let last_rule_y = back.total_y - back.amount_pitch;
    let mut row = FRONT_ROWS;
    while back.amount_y(row) + RULE_DROP < last_rule_y {
        let y = back.amount_y(row) + RULE_DROP;
        sink.line(Point::new(BACK_CAPTION_X, y), Point::new(rule_end, y));
        row += 1;
    }

    for (index, caption) in BACK_CAPTIONS_TOTAL.iter().enumerate() {
        sink.move_to(
            BACK_CAPTION_X,
            back.total_y + index as f32 * BACK_CAPTION_LEADING,
        );
        sink.show_text(caption);
    }
    sink.set_line_width(FORM_LINE_WIDTH);
    sink.rectangle(
        Point::new(rule_end - TOTAL_BOX_WIDTH, back.total_y - TOTAL_BOX_HEIGHT + 6.0),
        Size::new(TOTAL_BOX_WIDTH, TOTAL_BOX_HEIGHT),
        RectStyle::Stroked,
    );
}

fn select_amount_font(layout: &LayoutConfiguration, sink: &mut dyn DrawingSink) {
    sink.select_font(
        &layout.fonts.mono_family,
        FontSlant::Normal,
        FontWeight::Normal,
    );
    sink.set_font_size(layout.fonts.mono_size);
}

/// Measures `text` first, then places it so that it ends at `anchor_x`.
fn show_right_aligned(sink: &mut dyn DrawingSink, text: &str, anchor_x: f32, y: f32) {
    let extents = sink.text_extents(text);
    sink.move_to(anchor_x - extents.width, y);
    sink.show_text(text);
}
