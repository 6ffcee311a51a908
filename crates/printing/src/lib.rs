//! Deposit slip rendering and printing pipeline shared by the CLI and other front ends.
//! 存款單渲染與列印管線。

pub mod canvas;
pub mod controller;
pub mod display;
pub mod frame;
pub mod job;
pub mod metrics;
pub mod pagination;
pub mod platform;
pub mod preview;
pub mod renderer;
pub mod sink;
pub mod slip_layout;

pub use canvas::{Affine, PageCanvas};
pub use controller::{
    render_preview, run_print_job, PreviewConfig, PrintJobError, PrintJobResult, SlipPage,
};
pub use display::{Color, DisplayCommand, GlyphRun, Point, PrintDisplayList, Size, Stroke};
pub use frame::{SurfacePlacement, PREVIEW_MARGIN_PT, PRINT_MARGIN_PT};
pub use job::{
    Orientation, PaperId, PaperSize, PrintJobControllerState, PrintJobId, PrintJobOptions,
    PrintTarget,
};
pub use pagination::{
    checks_for_back, checks_for_front, needs_back_page, needs_back_subtotal_on_front, FRONT_ROWS,
};
pub use platform::{
    PlatformAdapter, PlatformJobHandle, SpoolCommandAdapter, SpoolError, SpoolPage,
};
pub use preview::{PreviewCache, PreviewEntry, PrintPreviewKey};
pub use renderer::{
    micr_line, render, render_page, AmountSlot, RenderOutcome, RenderRequest, RenderTotals,
    RenderWarning, Side,
};
pub use sink::{DrawOp, DrawingSink, FontSlant, FontWeight, RecordingSink, RectStyle, TextExtents};
pub use slip_layout::{
    BackLayout, FontSettings, FrontLayout, LayoutConfiguration, MICR_FONT_SIZE_PT,
    SLIP_HEIGHT_PT, SLIP_WIDTH_PT,
};
