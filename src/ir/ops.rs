//! # IR Draw Ops
//!
//! This module defines the intermediate representation for laid-out report
//! pages. Each page is a list of positioned drawing primitives that codegen
//! compiles to a PDF content stream.
//!
//! ## Coordinates
//!
//! All positions are PDF points with the origin at the bottom-left corner of
//! the page. Rectangles and images are anchored at their bottom-left corner,
//! text at the left end of its baseline.

use crate::legend::Color;
use crate::page::PageConfig;

/// Standard Type1 fonts available without embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    /// PDF base font name.
    pub fn base_name(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Resource name used inside content streams.
    pub fn resource_name(self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }
}

/// Draw op - one positioned primitive on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Single line of text starting at (x, baseline y).
    Text {
        x: f32,
        y: f32,
        font: Font,
        size: f32,
        text: String,
    },

    /// Solid filled rectangle.
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },

    /// Raster image, stretched to the given box. `image` indexes the
    /// report's image table.
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        image: usize,
    },
}

/// One laid-out page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Iterate over image ops as (width, height, image index).
    pub fn images(&self) -> impl Iterator<Item = (f32, f32, usize)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Image {
                width,
                height,
                image,
                ..
            } => Some((*width, *height, *image)),
            _ => None,
        })
    }

    /// Concatenated text of all text ops, separated by newlines.
    pub fn text(&self) -> String {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A compiled report: page geometry plus the laid-out pages.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub page: PageConfig,
    pub pages: Vec<Page>,
    /// Document title written to the PDF info dictionary.
    pub title: Option<String>,
}

impl Program {
    pub fn new(page: PageConfig) -> Self {
        Self {
            page,
            pages: Vec::new(),
            title: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
