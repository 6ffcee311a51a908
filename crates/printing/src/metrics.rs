//! Built-in advance-width tables used to measure text before placing it.
//! 內建的字寬表，於放置文字前量測寬度。
//!
//! The sans family is measured with the standard Helvetica widths, which is
//! what the PDF output falls back to; monospace and MICR faces use a fixed
//! 0.6 em advance.

/// Broad metric class of a font family name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontClass {
    Sans,
    Monospace,
    Micr,
}

impl FontClass {
    pub fn of(family: &str) -> Self {
        let lower = family.to_ascii_lowercase();
        if lower.contains("micr") || lower.contains("e13b") {
            FontClass::Micr
        } else if lower.contains("mono") || lower.contains("courier") {
            FontClass::Monospace
        } else {
            FontClass::Sans
        }
    }
}

const FIXED_ADVANCE: f32 = 0.6;
const CAP_HEIGHT: f32 = 0.718;

/// Advance width of `text` at `size` points.
pub fn text_width(family: &str, bold: bool, size: f32, text: &str) -> f32 {
    let em: f32 = match FontClass::of(family) {
        FontClass::Monospace | FontClass::Micr => text.chars().count() as f32 * FIXED_ADVANCE,
        FontClass::Sans => text
            .chars()
            .map(|ch| helvetica_advance(ch, bold) as f32 / 1000.0)
            .sum(),
    };
    em * size
}

/// Height above the baseline of capital letters at `size` points.
pub fn cap_height(size: f32) -> f32 {
    size * CAP_HEIGHT
}

fn helvetica_advance(ch: char, bold: bool) -> u16 {
    let regular = match ch {
        ' ' | ',' | '.' | '/' | ':' | ';' | '!' | 'f' | 't' | 'I' => 278,
        '0'..='9' | '$' | '#' | '?' | '_' => 556,
        'i' | 'j' | 'l' => 222,
        'r' | '-' | '(' | ')' | '`' => 333,
        'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' | 'J' => 500,
        'm' | 'M' => 833,
        'w' => 722,
        'W' => 944,
        'A' | 'B' | 'E' | 'K' | 'P' | 'S' | 'V' | 'X' | 'Y' | '&' => 667,
        'C' | 'D' | 'H' | 'N' | 'R' | 'U' => 722,
        'F' | 'T' | 'Z' => 611,
        'G' | 'O' | 'Q' => 778,
        'L' => 556,
        '\'' => 191,
        '%' => 889,
        '@' => 1015,
        _ => 556,
    };
    if bold && ch.is_ascii_alphabetic() {
        // Helvetica-Bold is roughly 5% wider for letters; digits keep 556.
        regular + regular / 20
    } else {
        regular
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_family_names() {
        assert_eq!(FontClass::of("GnuMICR"), FontClass::Micr);
        assert_eq!(FontClass::of("DejaVu Sans Mono"), FontClass::Monospace);
        assert_eq!(FontClass::of("Courier New"), FontClass::Monospace);
        assert_eq!(FontClass::of("Sans"), FontClass::Sans);
    }

    #[test]
    fn digits_and_separators_use_helvetica_widths() {
        // "1,000.00": six digits at 556 plus two separators at 278.
        let width = text_width("Sans", false, 10.0, "1,000.00");
        assert!((width - (6.0 * 5.56 + 2.0 * 2.78)).abs() < 1e-3);
    }

    #[test]
    fn fixed_pitch_faces_scale_with_length() {
        assert!((text_width("Monospace", false, 10.0, "250.50") - 36.0).abs() < 1e-4);
        assert!((text_width("GnuMICR", false, 10.0, "A0110A") - 36.0).abs() < 1e-4);
    }
}
