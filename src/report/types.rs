//! Flowable types for the report story.
//!
//! A report is a sequence of flowables appended in order. Layout places
//! them top to bottom inside the page frame, starting a new page when one
//! does not fit.

use crate::ir::Font;
use crate::legend::Color;

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
}

/// Paragraph style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    /// Font size in points.
    pub size: f32,
    /// Baseline-to-baseline distance in points.
    pub leading: f32,
    pub align: Align,
    /// Extra space below the paragraph in points.
    pub space_after: f32,
}

impl TextStyle {
    /// Document title: bold, centered.
    pub const TITLE: TextStyle = TextStyle {
        font: Font::HelveticaBold,
        size: 18.0,
        leading: 22.0,
        align: Align::Center,
        space_after: 6.0,
    };

    /// Top-level section heading.
    pub const HEADING: TextStyle = TextStyle {
        font: Font::HelveticaBold,
        size: 18.0,
        leading: 22.0,
        align: Align::Left,
        space_after: 6.0,
    };

    /// Body text.
    pub const NORMAL: TextStyle = TextStyle {
        font: Font::Helvetica,
        size: 10.0,
        leading: 12.0,
        align: Align::Left,
        space_after: 0.0,
    };
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// One element of the report story.
#[derive(Debug, Clone, PartialEq)]
pub enum Flowable {
    /// Wrapped text block.
    Paragraph { text: String, style: TextStyle },
    /// Image drawn at a fixed size, centered horizontally. `image` indexes
    /// the report's image table.
    Image {
        image: usize,
        width: f32,
        height: f32,
    },
    /// Vertical gap in points.
    Spacer(f32),
    /// Continue on a fresh page.
    PageBreak,
    Table(Table),
}

impl Flowable {
    pub fn paragraph(text: impl Into<String>, style: TextStyle) -> Self {
        Flowable::Paragraph {
            text: text.into(),
            style,
        }
    }
}

/// Content of one table cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Structurally empty cell.
    #[default]
    Empty,
    /// Fixed-size image.
    Image {
        image: usize,
        width: f32,
        height: f32,
    },
    /// Fixed-size solid rectangle.
    Swatch {
        color: Color,
        width: f32,
        height: f32,
    },
    /// Wrapped text.
    Paragraph { text: String, style: TextStyle },
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Cell padding in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            left: 6.0,
            right: 6.0,
            top: 3.0,
            bottom: 3.0,
        }
    }
}

/// Grid of cells with fixed column widths. Cell content is vertically
/// centered and left-aligned within the padding.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub col_widths: Vec<f32>,
    pub rows: Vec<Vec<Cell>>,
    pub padding: Padding,
}

impl Table {
    pub fn new(col_widths: Vec<f32>) -> Self {
        Self {
            col_widths,
            rows: Vec::new(),
            padding: Padding::default(),
        }
    }

    pub fn padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Append a row. Short rows are filled with empty cells.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        if row.len() < self.col_widths.len() {
            row.resize(self.col_widths.len(), Cell::Empty);
        }
        self.rows.push(row);
    }

    /// Total table width.
    pub fn width(&self) -> f32 {
        self.col_widths.iter().sum()
    }
}
