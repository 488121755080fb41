//! # Map Report
//!
//! Builds the two-part PDF report: the composited map under a title on the
//! first page, followed by a legend table of swatches or icons with labels.
//!
//! ```no_run
//! use analysekarte::legend::{Color, LegendEntry};
//! use analysekarte::report;
//!
//! let legend = vec![
//!     LegendEntry::area("Wald", Color::rgb(0x22, 0x8B, 0x22)),
//!     LegendEntry::line("Fluss", Color::rgb(0, 0, 255)),
//!     LegendEntry::icon("Schule", "icons/school.png"),
//! ];
//! report::build("karte_final.png", &legend, "Analysekarte.pdf", "Analysekarte")?;
//! # Ok::<(), analysekarte::ReportError>(())
//! ```
//!
//! The report can also be assembled in memory and inspected before it is
//! written:
//!
//! ```
//! use analysekarte::report::{Report, ReportOptions};
//! use image::{Rgba, RgbaImage};
//!
//! let map = RgbaImage::from_pixel(400, 300, Rgba([0, 0, 255, 255]));
//! let report = Report::map_report(map, &[], &ReportOptions::default())?;
//! let program = report.compile();
//! assert_eq!(program.pages.len(), 2);
//! # Ok::<(), analysekarte::ReportError>(())
//! ```

pub mod layout;
pub mod text;
pub mod types;

pub use types::*;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use log::{debug, info};

use crate::error::Result;
use crate::ir::Program;
use crate::legend::{LegendEntry, Swatch};
use crate::page::{MM, PageConfig};

/// Default file name of the generated report.
pub const DEFAULT_REPORT_PATH: &str = "Analysekarte.pdf";

/// Default report title.
pub const DEFAULT_TITLE: &str = "Analysekarte";

/// Default heading above the legend table.
pub const DEFAULT_LEGEND_HEADING: &str = "Legend";

/// Icon cell content size (square).
pub const ICON_SIZE: f32 = 10.0 * MM;

/// Color swatch width.
pub const SWATCH_WIDTH: f32 = 12.0 * MM;

/// Color swatch height for line features.
pub const LINE_SWATCH_HEIGHT: f32 = 2.0 * MM;

/// Color swatch height for area features.
pub const AREA_SWATCH_HEIGHT: f32 = 6.0 * MM;

/// Legend table column widths: symbol, label, symbol, label.
pub const LEGEND_COLUMNS: [f32; 4] = [14.0 * MM, 70.0 * MM, 14.0 * MM, 70.0 * MM];

/// Horizontal padding applied to every legend cell.
pub const LEGEND_CELL_PADDING: f32 = 4.0;

/// Presentation options for the map report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    /// Title on the first page, also written to the PDF metadata.
    pub title: String,
    /// Heading above the legend table.
    pub legend_heading: String,
    pub page: PageConfig,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            legend_heading: DEFAULT_LEGEND_HEADING.to_string(),
            page: PageConfig::A4,
        }
    }
}

impl ReportOptions {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// An append-only report under construction.
///
/// Flowables are appended in order; [`Report::finish`] consumes the report
/// and writes it exactly once.
#[derive(Debug, Clone, Default)]
pub struct Report {
    page: PageConfig,
    title: Option<String>,
    story: Vec<Flowable>,
    images: Vec<RgbaImage>,
}

impl Report {
    /// Create an empty report with the given page geometry.
    pub fn new(page: PageConfig) -> Self {
        Self {
            page,
            ..Default::default()
        }
    }

    /// Set the document title stored in the PDF metadata.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append a flowable to the story.
    pub fn push(&mut self, flowable: Flowable) -> &mut Self {
        self.story.push(flowable);
        self
    }

    /// Register an image and return its index for `Flowable::Image` and
    /// `Cell::Image`.
    pub fn add_image(&mut self, image: RgbaImage) -> usize {
        self.images.push(image);
        self.images.len() - 1
    }

    pub fn image(&self, index: usize) -> Option<&RgbaImage> {
        self.images.get(index)
    }

    /// Lay out the story into pages.
    pub fn compile(&self) -> Program {
        Program {
            page: self.page,
            pages: layout::paginate(&self.story, &self.page),
            title: self.title.clone(),
        }
    }

    /// Render the complete PDF in memory.
    pub fn to_pdf(&self) -> Result<Vec<u8>> {
        self.compile().to_pdf(&self.images)
    }

    /// Render and write the report to `path`.
    ///
    /// The PDF is rendered fully before the file is created, so a failure
    /// leaves no partial output.
    pub fn finish(self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        let bytes = self.to_pdf()?;
        fs::write(path, &bytes)?;
        info!("wrote report {} ({} bytes)", path.display(), bytes.len());
        Ok(path.to_path_buf())
    }

    /// Assemble the map report: title and scaled map on the first page,
    /// legend heading and table after a page break.
    ///
    /// Icons referenced by the legend are loaded here; each distinct path
    /// is embedded once.
    pub fn map_report(
        map: RgbaImage,
        legend: &[LegendEntry],
        options: &ReportOptions,
    ) -> Result<Report> {
        let page = options.page;
        let mut report = Report::new(page).title(&options.title);

        let (width, height) = map.dimensions();
        let scale = page.map_scale(width, height);
        debug!("map {}x{} px, scale {:.4}", width, height, scale);
        let map_index = report.add_image(map);

        let mut icons: HashMap<PathBuf, usize> = HashMap::new();
        let mut icon_images = Vec::new();
        let first_icon = map_index + 1;
        let table = legend_table(legend, |path| {
            if let Some(&index) = icons.get(path) {
                return Ok(index);
            }
            debug!("loading legend icon {}", path.display());
            let icon = image::open(path)?.into_rgba8();
            let index = first_icon + icon_images.len();
            icon_images.push(icon);
            icons.insert(path.to_path_buf(), index);
            Ok(index)
        })?;
        for icon in icon_images {
            report.add_image(icon);
        }

        report
            .push(Flowable::paragraph(&options.title, TextStyle::TITLE))
            .push(Flowable::Spacer(10.0))
            .push(Flowable::Image {
                image: map_index,
                width: width as f32 * scale,
                height: height as f32 * scale,
            })
            .push(Flowable::Spacer(20.0))
            .push(Flowable::PageBreak)
            .push(Flowable::paragraph(&options.legend_heading, TextStyle::HEADING))
            .push(Flowable::Spacer(6.0))
            .push(Flowable::Table(table));

        Ok(report)
    }
}

/// Table cell holding the visual symbol of a legend entry.
///
/// `icon` resolves an icon path to an image index.
pub fn symbol_cell<F>(entry: &LegendEntry, mut icon: F) -> Result<Cell>
where
    F: FnMut(&Path) -> Result<usize>,
{
    Ok(match &entry.swatch {
        Swatch::Icon(path) => Cell::Image {
            image: icon(path)?,
            width: ICON_SIZE,
            height: ICON_SIZE,
        },
        Swatch::Color { color, line } => Cell::Swatch {
            color: *color,
            width: SWATCH_WIDTH,
            height: if *line {
                LINE_SWATCH_HEIGHT
            } else {
                AREA_SWATCH_HEIGHT
            },
        },
    })
}

/// Arrange legend entries two per row, each as a symbol cell followed by a
/// label cell. An odd final entry leaves the row's second half empty.
pub fn legend_table<F>(entries: &[LegendEntry], mut icon: F) -> Result<Table>
where
    F: FnMut(&Path) -> Result<usize>,
{
    let mut table = Table::new(LEGEND_COLUMNS.to_vec()).padding(Padding {
        left: LEGEND_CELL_PADDING,
        right: LEGEND_CELL_PADDING,
        ..Padding::default()
    });

    for pair in entries.chunks(2) {
        let mut row = Vec::with_capacity(LEGEND_COLUMNS.len());
        for entry in pair {
            row.push(symbol_cell(entry, &mut icon)?);
            row.push(Cell::Paragraph {
                text: entry.label.clone(),
                style: TextStyle::NORMAL,
            });
        }
        table.push_row(row);
    }

    Ok(table)
}

/// Build the map report from an image file and write it to `output_path`.
pub fn build<P, Q>(
    map_image_path: P,
    legend_items: &[LegendEntry],
    output_path: Q,
    title: &str,
) -> Result<PathBuf>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    build_with_options(
        map_image_path,
        legend_items,
        output_path,
        &ReportOptions::with_title(title),
    )
}

/// Like [`build`], with full control over the report options.
pub fn build_with_options<P, Q>(
    map_image_path: P,
    legend_items: &[LegendEntry],
    output_path: Q,
    options: &ReportOptions,
) -> Result<PathBuf>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let map_image_path = map_image_path.as_ref();
    debug!("loading map image {}", map_image_path.display());
    let map = image::open(map_image_path)?.into_rgba8();
    Report::map_report(map, legend_items, options)?.finish(output_path)
}
