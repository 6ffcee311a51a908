//! Named coordinates for every element printed on the deposit slip.
//! 存款單上每個列印元素的具名座標。
//!
//! All values are PostScript points (1/72"). Front coordinates live in the
//! unrotated slip frame: origin at the top-left corner of the leaf, x to the
//! right along the long edge, y growing downward. Back coordinates live in the
//! back frame, which is the front frame turned 90°: x runs across the short
//! edge and y runs down the long edge.

/// Long edge of the slip leaf.
pub const SLIP_WIDTH_PT: f32 = 441.0;
/// Short edge of the slip leaf.
pub const SLIP_HEIGHT_PT: f32 = 198.0;

/// MICR glyphs are always printed at this size so readers can decode them.
/// MICR 字型固定使用此大小以確保機器可讀。
pub const MICR_FONT_SIZE_PT: f32 = 10.0;

/// Font families and sizes shared by both sides.
/// 正反面共用的字型設定。
#[derive(Debug, Clone, PartialEq)]
pub struct FontSettings {
    pub sans_family: String,
    pub sans_size: f32,
    pub mono_family: String,
    pub mono_size: f32,
    pub micr_family: String,
    /// Size of static labels relative to `sans_size`.
    pub label_scale: f32,
    pub print_name_account_labels: bool,
}

impl FontSettings {
    pub fn label_size(&self) -> f32 {
        self.sans_size * self.label_scale
    }
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            sans_family: "Sans".to_string(),
            sans_size: 10.0,
            mono_family: "Monospace".to_string(),
            mono_size: 10.0,
            micr_family: "GnuMICR".to_string(),
            label_scale: 0.7,
            print_name_account_labels: true,
        }
    }
}

/// 正面（未旋轉座標系）的座標。 / Front side coordinates, unrotated frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontLayout {
    pub label_x: f32,
    pub value_x: f32,
    pub name_y: f32,
    pub account_y: f32,
    pub date_y: f32,
    pub micr_x: f32,
    pub micr_y: f32,
    pub first_amount_y: f32,
    /// Vertical distance between successive check rows.
    pub amount_pitch: f32,
    pub subtotal_y: f32,
    pub total_y: f32,
    /// Right edge that amounts are aligned against.
    pub amount_x: f32,
    pub underline_width: f32,
}

impl Default for FrontLayout {
    fn default() -> Self {
        Self {
            label_x: 18.0,
            value_x: 72.0,
            name_y: 48.0,
            account_y: 70.0,
            date_y: 92.0,
            micr_x: 54.0,
            micr_y: 184.0,
            first_amount_y: 48.0,
            amount_pitch: 20.0,
            subtotal_y: 88.0,
            total_y: 130.0,
            amount_x: 423.0,
            underline_width: 160.0,
        }
    }
}

impl FrontLayout {
    pub fn amount_y(&self, row: usize) -> f32 {
        self.first_amount_y + row as f32 * self.amount_pitch
    }
}

/// 背面（旋轉 90° 座標系）的座標。 / Back side coordinates, rotated frame.
#[derive(Debug, Clone, PartialEq)]
pub struct BackLayout {
    pub amount_x: f32,
    pub first_amount_y: f32,
    pub amount_pitch: f32,
    pub total_y: f32,
}

impl Default for BackLayout {
    fn default() -> Self {
        Self {
            amount_x: 184.0,
            first_amount_y: 24.0,
            amount_pitch: 18.0,
            total_y: 396.0,
        }
    }
}

impl BackLayout {
    /// `row` is the index in the full check list, not within the back subset.
    pub fn amount_y(&self, row: usize) -> f32 {
        self.first_amount_y + row as f32 * self.amount_pitch
    }
}

/// Complete slip layout loaded from the configuration store.
/// 從設定儲存載入的完整存款單版面。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutConfiguration {
    pub fonts: FontSettings,
    pub front: FrontLayout,
    pub back: BackLayout,
}
