//! # Intermediate Representation (IR)
//!
//! This module provides the IR layer for report generation. The IR is a
//! list of pages holding positioned draw ops; it sits between the flowable
//! story and the PDF bytes.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌───────────┐
//! │  Flowables  │ ──► │     IR      │ ──► │  Codegen  │
//! │   (story)   │     │ (Vec<Page>) │     │   (PDF)   │
//! └─────────────┘     └─────────────┘     └───────────┘
//! ```
//!
//! Layout decisions (wrapping, page breaks, centering) are resolved before
//! the IR, so tests can inspect geometry without parsing PDF.
//!
//! ## Example
//!
//! ```
//! use analysekarte::ir::{DrawOp, Font, Page, Program};
//! use analysekarte::page::PageConfig;
//!
//! let mut page = Page::new();
//! page.push(DrawOp::Text {
//!     x: 72.0,
//!     y: 770.0,
//!     font: Font::HelveticaBold,
//!     size: 18.0,
//!     text: "Analysekarte".into(),
//! });
//!
//! let mut program = Program::new(PageConfig::A4);
//! program.pages.push(page);
//! let pdf = program.to_pdf(&[]).unwrap();
//! assert!(pdf.starts_with(b"%PDF"));
//! ```

mod codegen;
mod ops;

pub use ops::*;
