//! Legend entries: a label plus exactly one visual symbol.
//!
//! The symbol is either an icon image or a solid color swatch. Swatches for
//! line features are drawn as a thin strip, area features as a block.
//!
//! Entries deserialize from the job file's `legendData` records:
//!
//! ```
//! use analysekarte::legend::{Color, LegendEntry, Swatch};
//!
//! let entry: LegendEntry = serde_json::from_str(
//!     r##"{"label": "Fluss", "icon": null, "color": "#0000FF", "line": true}"##,
//! ).unwrap();
//! assert_eq!(entry.swatch, Swatch::Color { color: Color::rgb(0, 0, 255), line: true });
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ReportError;

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Components scaled to [0.0, 1.0] for PDF fill operators.
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl FromStr for Color {
    type Err = ReportError;

    /// Parse `#RRGGBB`, `0xRRGGBB` or a bare `RRGGBB`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ReportError::Validation(format!(
                "invalid color '{}': expected #RRGGBB",
                s
            )));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| ReportError::Validation(format!("invalid color '{}': {}", s, e)))
        };
        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// The visual symbol of a legend entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Swatch {
    /// Icon image drawn at a fixed 10mm x 10mm.
    Icon(PathBuf),
    /// Solid rectangle, 12mm wide; 2mm tall for lines, 6mm otherwise.
    Color { color: Color, line: bool },
}

/// One labeled row of the legend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "LegendRecord")]
pub struct LegendEntry {
    pub label: String,
    pub swatch: Swatch,
}

impl LegendEntry {
    /// Entry drawn with an icon image.
    pub fn icon(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            swatch: Swatch::Icon(path.into()),
        }
    }

    /// Entry drawn as an area swatch.
    pub fn area(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            swatch: Swatch::Color { color, line: false },
        }
    }

    /// Entry drawn as a line swatch.
    pub fn line(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            swatch: Swatch::Color { color, line: true },
        }
    }

    /// Build an entry from the loose record fields.
    ///
    /// An icon takes precedence over the color; the color is only parsed
    /// when no icon is given and defaults to black when absent.
    pub fn from_parts(
        label: impl Into<String>,
        icon: Option<PathBuf>,
        color: Option<&str>,
        line: bool,
    ) -> Result<Self, ReportError> {
        let swatch = match icon {
            Some(path) => Swatch::Icon(path),
            None => Swatch::Color {
                color: match color {
                    Some(hex) => hex.parse()?,
                    None => Color::BLACK,
                },
                line,
            },
        };
        Ok(Self {
            label: label.into(),
            swatch,
        })
    }
}

/// Wire shape of a `legendData` record.
#[derive(Debug, Deserialize)]
struct LegendRecord {
    label: String,
    #[serde(default)]
    icon: Option<PathBuf>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    line: bool,
}

impl TryFrom<LegendRecord> for LegendEntry {
    type Error = ReportError;

    fn try_from(record: LegendRecord) -> Result<Self, Self::Error> {
        let LegendRecord {
            label,
            icon,
            color,
            line,
        } = record;
        let context = label.clone();
        LegendEntry::from_parts(label, icon, color.as_deref(), line).map_err(|e| match e {
            ReportError::Validation(msg) => {
                ReportError::Validation(format!("legend entry '{}': {}", context, msg))
            }
            other => other,
        })
    }
}
