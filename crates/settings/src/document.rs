//! On-disk JSON shape of the configuration file and its conversion to the model.
//!
//! Every field is optional at the serde level so that a missing field can be
//! reported by its dotted path instead of serde's positional message.

use depositslip_core::Account;
use depositslip_printing::{BackLayout, FontSettings, FrontLayout, LayoutConfiguration};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct ConfigDocument {
    #[serde(default)]
    pub accounts: Vec<AccountRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<LayoutRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct AccountRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct LayoutRecord {
    pub sans_font: Option<String>,
    pub sans_font_size: Option<f32>,
    pub mono_font: Option<String>,
    pub mono_font_size: Option<f32>,
    pub micr_font: Option<String>,
    pub label_scale: Option<f32>,
    pub print_name_account_labels: Option<bool>,
    pub front: Option<FrontRecord>,
    pub back: Option<BackRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct FrontRecord {
    pub label_x: Option<f32>,
    pub value_x: Option<f32>,
    pub name_y: Option<f32>,
    pub account_y: Option<f32>,
    pub date_y: Option<f32>,
    pub micr_x: Option<f32>,
    pub micr_y: Option<f32>,
    pub first_amount_y: Option<f32>,
    pub amount_pitch: Option<f32>,
    pub subtotal_y: Option<f32>,
    pub total_y: Option<f32>,
    pub amount_x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline_width: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct BackRecord {
    pub amount_x: Option<f32>,
    pub first_amount_y: Option<f32>,
    pub amount_pitch: Option<f32>,
    pub total_y: Option<f32>,
}

fn required<T>(value: Option<T>, field: impl Into<String>) -> Result<T, ConfigError> {
    value.ok_or_else(|| ConfigError::MissingField {
        field: field.into(),
    })
}

fn coordinate(value: Option<f32>, field: &str) -> Result<f32, ConfigError> {
    let value = required(value, field)?;
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidField {
            field: field.to_string(),
            expected: "a non-negative number of points",
        });
    }
    Ok(value)
}

fn positive(value: Option<f32>, field: &str) -> Result<f32, ConfigError> {
    let value = required(value, field)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::InvalidField {
            field: field.to_string(),
            expected: "a positive number",
        });
    }
    Ok(value)
}

fn font_name(value: Option<String>, field: &str) -> Result<String, ConfigError> {
    let value = required(value, field)?;
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            field: field.to_string(),
            expected: "a font family name",
        });
    }
    Ok(value)
}

impl AccountRecord {
    pub fn into_account(self, index: usize) -> Result<Account, ConfigError> {
        let field = |name: &str| format!("accounts[{index}].{name}");
        let number = required(self.account, field("account"))?;
        if number.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                field: field("account"),
                expected: "a non-empty account number",
            });
        }
        let name = required(self.name, field("name"))?;
        let routing = required(self.routing, field("routing"))?;
        Ok(Account::new(number, name, routing).with_description(self.description.unwrap_or_default()))
    }

    pub fn from_account(account: &Account) -> Self {
        Self {
            account: Some(account.number.clone()),
            name: Some(account.name.clone()),
            description: Some(account.description.clone()).filter(|text| !text.is_empty()),
            routing: Some(account.routing_number.clone()),
        }
    }
}

impl LayoutRecord {
    pub fn into_layout(self) -> Result<LayoutConfiguration, ConfigError> {
        let fonts = FontSettings {
            sans_family: font_name(self.sans_font, "configuration.sans_font")?,
            sans_size: positive(self.sans_font_size, "configuration.sans_font_size")?,
            mono_family: font_name(self.mono_font, "configuration.mono_font")?,
            mono_size: positive(self.mono_font_size, "configuration.mono_font_size")?,
            micr_family: font_name(self.micr_font, "configuration.micr_font")?,
            label_scale: positive(self.label_scale, "configuration.label_scale")?,
            print_name_account_labels: required(
                self.print_name_account_labels,
                "configuration.print_name_account_labels",
            )?,
        };
        let front = required(self.front, "configuration.front")?.into_front()?;
        let back = required(self.back, "configuration.back")?.into_back()?;
        Ok(LayoutConfiguration { fonts, front, back })
    }

    pub fn from_layout(layout: &LayoutConfiguration) -> Self {
        let fonts = &layout.fonts;
        Self {
            sans_font: Some(fonts.sans_family.clone()),
            sans_font_size: Some(fonts.sans_size),
            mono_font: Some(fonts.mono_family.clone()),
            mono_font_size: Some(fonts.mono_size),
            micr_font: Some(fonts.micr_family.clone()),
            label_scale: Some(fonts.label_scale),
            print_name_account_labels: Some(fonts.print_name_account_labels),
            front: Some(FrontRecord::from_front(&layout.front)),
            back: Some(BackRecord::from_back(&layout.back)),
        }
    }
}

impl FrontRecord {
    fn into_front(self) -> Result<FrontLayout, ConfigError> {
        const P: &str = "configuration.front";
        let underline_width = match self.underline_width {
            Some(width) => positive(Some(width), &format!("{P}.underline_width"))?,
            None => FrontLayout::default().underline_width,
        };
        Ok(FrontLayout {
            label_x: coordinate(self.label_x, &format!("{P}.label_x"))?,
            value_x: coordinate(self.value_x, &format!("{P}.value_x"))?,
            name_y: coordinate(self.name_y, &format!("{P}.name_y"))?,
            account_y: coordinate(self.account_y, &format!("{P}.account_y"))?,
            date_y: coordinate(self.date_y, &format!("{P}.date_y"))?,
            micr_x: coordinate(self.micr_x, &format!("{P}.micr_x"))?,
            micr_y: coordinate(self.micr_y, &format!("{P}.micr_y"))?,
            first_amount_y: coordinate(self.first_amount_y, &format!("{P}.first_amount_y"))?,
            amount_pitch: positive(self.amount_pitch, &format!("{P}.amount_pitch"))?,
            subtotal_y: coordinate(self.subtotal_y, &format!("{P}.subtotal_y"))?,
            total_y: coordinate(self.total_y, &format!("{P}.total_y"))?,
            amount_x: coordinate(self.amount_x, &format!("{P}.amount_x"))?,
            underline_width,
        })
    }

    fn from_front(front: &FrontLayout) -> Self {
        Self {
            label_x: Some(front.label_x),
            value_x: Some(front.value_x),
            name_y: Some(front.name_y),
            account_y: Some(front.account_y),
            date_y: Some(front.date_y),
            micr_x: Some(front.micr_x),
            micr_y: Some(front.micr_y),
            first_amount_y: Some(front.first_amount_y),
            amount_pitch: Some(front.amount_pitch),
            subtotal_y: Some(front.subtotal_y),
            total_y: Some(front.total_y),
            amount_x: Some(front.amount_x),
            underline_width: Some(front.underline_width),
        }
    }
}

impl BackRecord {
    fn into_back(self) -> Result<BackLayout, ConfigError> {
        const P: &str = "configuration.back";
        Ok(BackLayout {
            amount_x: coordinate(self.amount_x, &format!("{P}.amount_x"))?,
            first_amount_y: coordinate(self.first_amount_y, &format!("{P}.first_amount_y"))?,
            amount_pitch: positive(self.amount_pitch, &format!("{P}.amount_pitch"))?,
            total_y: coordinate(self.total_y, &format!("{P}.total_y"))?,
        })
    }

    fn from_back(back: &BackLayout) -> Self {
        Self {
            amount_x: Some(back.amount_x),
            first_amount_y: Some(back.first_amount_y),
            amount_pitch: Some(back.amount_pitch),
            total_y: Some(back.total_y),
        }
    }
}
