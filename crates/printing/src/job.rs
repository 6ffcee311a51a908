use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque identifier for a print job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrintJobId(u64);

impl PrintJobId {
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for PrintJobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PrintJobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "print-job-{}", self.0)
    }
}

/// Orientation of a print page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Supported paper identifiers for quick selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaperId {
    Letter,
    Custom,
}

/// Represents a paper size in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaperSize {
    pub id: PaperId,
    pub width_mm: f32,
    pub height_mm: f32,
}

impl PaperSize {
    pub const fn new(id: PaperId, width_mm: f32, height_mm: f32) -> Self {
        Self {
            id,
            width_mm,
            height_mm,
        }
    }

    /// US letter, 8.5" x 11".
    pub const fn letter() -> Self {
        Self::new(PaperId::Letter, 215.9, 279.4)
    }

    pub const fn to_points(&self, orientation: Orientation) -> (f32, f32) {
        const MM_PER_INCH: f32 = 25.4;
        let width_in = self.width_mm / MM_PER_INCH;
        let height_in = self.height_mm / MM_PER_INCH;
        let width_pt = width_in * 72.0;
        let height_pt = height_in * 72.0;
        match orientation {
            Orientation::Portrait => (width_pt, height_pt),
            Orientation::Landscape => (height_pt, width_pt),
        }
    }
}

/// Printer target metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintTarget {
    pub name: String,
}

impl PrintTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Options supplied when requesting a print job.
/// 送出列印作業時的選項。
#[derive(Debug, Clone)]
pub struct PrintJobOptions {
    pub job_id: PrintJobId,
    pub target: Option<PrintTarget>,
    pub paper: PaperSize,
    /// Distance from the page's top and right edges to the slip leaf.
    pub margin_pt: f32,
    pub copies: u32,
}

impl PrintJobOptions {
    pub fn new(target: Option<PrintTarget>, copies: u32) -> Self {
        Self {
            job_id: PrintJobId::new(),
            target,
            paper: PaperSize::letter(),
            margin_pt: crate::frame::PRINT_MARGIN_PT,
            copies: copies.max(1),
        }
    }
}

impl Default for PrintJobOptions {
    fn default() -> Self {
        Self::new(None, 1)
    }
}

/// Controller state for UI markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintJobControllerState {
    Idle,
    Render,
    Spooling,
    Completed,
    Failed,
}
