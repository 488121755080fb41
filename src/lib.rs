//! # Analysekarte - Map Compositing and Report Library
//!
//! Analysekarte turns a stack of transparent map layers into a printable
//! report. It provides:
//!
//! - **Compositing**: alpha-over blending of raster layers, bottom first
//! - **Report layout**: title, scaled map and a two-column legend on A4
//! - **PDF output**: standard Helvetica fonts, Flate-compressed images
//! - **Jobs**: a JSON description driving both steps
//!
//! ## Quick Start
//!
//! ```no_run
//! use analysekarte::{
//!     compositor,
//!     legend::{Color, LegendEntry},
//!     report,
//! };
//!
//! // Blend the visible layers into one map image
//! let map = compositor::combine(&["basis.png", "wald.png"], "karte_final.png")?;
//!
//! // Describe what the colors mean
//! let legend = vec![
//!     LegendEntry::area("Wald", Color::rgb(0x22, 0x8B, 0x22)),
//!     LegendEntry::line("Bahnstrecke", Color::rgb(255, 0, 0)),
//! ];
//!
//! // Map on page one, legend on page two
//! report::build(&map, &legend, "Analysekarte.pdf", "Analysekarte")?;
//!
//! # Ok::<(), analysekarte::ReportError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`compositor`] | Layer loading and alpha compositing |
//! | [`report`] | Flowables, layout and the map report |
//! | [`ir`] | Laid-out pages and PDF codegen |
//! | [`legend`] | Legend entries and colors |
//! | [`job`] | JSON job driver |
//! | [`page`] | Page geometry |
//! | [`error`] | Error types |

pub mod compositor;
pub mod error;
pub mod ir;
pub mod job;
pub mod legend;
pub mod page;
pub mod report;

// Re-exports for convenience
pub use compositor::combine;
pub use error::ReportError;
pub use job::Job;
pub use legend::{Color, LegendEntry};
pub use page::PageConfig;
pub use report::build;
