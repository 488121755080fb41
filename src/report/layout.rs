//! Layout: places the flowable story into page frames.
//!
//! Flowables stack top to bottom inside the body frame of each page. A
//! flowable that does not fit the space left on the current page moves to a
//! new page; tables break between rows. Image flowables shrink uniformly
//! instead when at least half of their height still fits, so a map keeps
//! its page under the title.

use std::mem;

use log::debug;

use super::text::{string_width, wrap};
use super::types::{Align, Cell, Flowable, Table, TextStyle};
use crate::ir::{DrawOp, Page};
use crate::page::PageConfig;

/// Lay out `story` on pages of the given geometry.
///
/// Always returns at least one page. Paragraphs move to a new page as a
/// whole; one taller than the entire frame is split between lines.
pub fn paginate(story: &[Flowable], page: &PageConfig) -> Vec<Page> {
    let mut frame = Frame::new(*page);
    for flowable in story {
        frame.place(flowable);
    }
    frame.finish()
}

/// Fill state of the current page's body frame.
struct Frame {
    page: PageConfig,
    pages: Vec<Page>,
    current: Page,
    /// Height consumed from the top of the frame.
    used: f32,
}

impl Frame {
    fn new(page: PageConfig) -> Self {
        Self {
            page,
            pages: Vec::new(),
            current: Page::new(),
            used: 0.0,
        }
    }

    fn remaining(&self) -> f32 {
        (self.page.frame_height() - self.used).max(0.0)
    }

    /// Y coordinate of the top of the next flowable.
    fn cursor(&self) -> f32 {
        self.page.frame_top() - self.used
    }

    fn at_top(&self) -> bool {
        self.used <= 0.0
    }

    fn advance(&mut self, height: f32) {
        self.used = (self.used + height).min(self.page.frame_height());
    }

    fn new_page(&mut self) {
        debug!("page {} complete", self.pages.len() + 1);
        self.pages.push(mem::take(&mut self.current));
        self.used = 0.0;
    }

    fn finish(mut self) -> Vec<Page> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }

    fn place(&mut self, flowable: &Flowable) {
        match flowable {
            Flowable::Paragraph { text, style } => self.place_paragraph(text, style),
            Flowable::Image {
                image,
                width,
                height,
            } => self.place_image(*image, *width, *height),
            Flowable::Spacer(height) => self.advance(*height),
            Flowable::PageBreak => {
                if !self.at_top() {
                    self.new_page();
                }
            }
            Flowable::Table(table) => self.place_table(table),
        }
    }

    fn place_paragraph(&mut self, text: &str, style: &TextStyle) {
        let width = self.page.frame_width();
        let lines = wrap(text, style.font, style.size, width);
        let height = lines.len() as f32 * style.leading;

        if height > self.remaining() && !self.at_top() {
            self.new_page();
        }

        let left = self.page.frame_left();
        for line in lines {
            // Only a paragraph taller than the frame gets here without room
            if style.leading > self.remaining() && !self.at_top() {
                self.new_page();
            }
            let x = match style.align {
                Align::Left => left,
                Align::Center => {
                    left + (width - string_width(&line, style.font, style.size)).max(0.0) / 2.0
                }
            };
            self.current.push(DrawOp::Text {
                x,
                y: self.cursor() - style.size,
                font: style.font,
                size: style.size,
                text: line,
            });
            self.advance(style.leading);
        }
        self.advance(style.space_after);
    }

    fn place_image(&mut self, image: usize, width: f32, height: f32) {
        let (mut width, mut height) = (width, height);

        let frame_width = self.page.frame_width();
        if width > frame_width {
            height *= frame_width / width;
            width = frame_width;
        }

        if height > self.remaining() && !self.at_top() && self.remaining() < height / 2.0 {
            self.new_page();
        }
        let remaining = self.remaining();
        if height > remaining {
            debug!("shrinking image {} to fit {:.1}pt", image, remaining);
            width *= remaining / height;
            height = remaining;
        }

        let x = self.page.frame_left() + (frame_width - width) / 2.0;
        let y = self.cursor() - height;
        self.current.push(DrawOp::Image {
            x,
            y,
            width,
            height,
            image,
        });
        self.advance(height);
    }

    fn place_table(&mut self, table: &Table) {
        let pad = table.padding;
        let left = self.page.frame_left() + (self.page.frame_width() - table.width()).max(0.0) / 2.0;

        for (row_index, row) in table.rows.iter().enumerate() {
            let measured: Vec<Measured<'_>> = row
                .iter()
                .zip(&table.col_widths)
                .map(|(cell, col_width)| Measured::new(cell, col_width - pad.left - pad.right))
                .collect();

            let content_height = measured.iter().map(|m| m.height).fold(0.0, f32::max);
            let row_height = content_height + pad.top + pad.bottom;

            if row_height > self.remaining() && !self.at_top() {
                debug!("table row {} continues on a new page", row_index);
                self.new_page();
            }

            let row_top = self.cursor();
            let mut x = left;
            for (m, col_width) in measured.into_iter().zip(&table.col_widths) {
                // Vertically centered inside the padded cell
                let top = row_top - pad.top - (content_height - m.height) / 2.0;
                m.draw(&mut self.current, x + pad.left, top);
                x += col_width;
            }
            self.advance(row_height);
        }
    }
}

/// A table cell with its content height resolved.
struct Measured<'a> {
    cell: &'a Cell,
    lines: Vec<String>,
    height: f32,
}

impl<'a> Measured<'a> {
    fn new(cell: &'a Cell, avail_width: f32) -> Self {
        let (lines, height) = match cell {
            Cell::Empty => (Vec::new(), 0.0),
            Cell::Image { height, .. } | Cell::Swatch { height, .. } => (Vec::new(), *height),
            Cell::Paragraph { text, style } => {
                let lines = wrap(text, style.font, style.size, avail_width.max(0.0));
                let height = lines.len() as f32 * style.leading;
                (lines, height)
            }
        };
        Self {
            cell,
            lines,
            height,
        }
    }

    /// Draw the content with its top-left corner at (x, top).
    fn draw(self, page: &mut Page, x: f32, top: f32) {
        match self.cell {
            Cell::Empty => {}
            Cell::Image {
                image,
                width,
                height,
            } => page.push(DrawOp::Image {
                x,
                y: top - height,
                width: *width,
                height: *height,
                image: *image,
            }),
            Cell::Swatch {
                color,
                width,
                height,
            } => page.push(DrawOp::FillRect {
                x,
                y: top - height,
                width: *width,
                height: *height,
                color: *color,
            }),
            Cell::Paragraph { style, .. } => {
                for (i, line) in self.lines.into_iter().enumerate() {
                    page.push(DrawOp::Text {
                        x,
                        y: top - style.size - i as f32 * style.leading,
                        font: style.font,
                        size: style.size,
                        text: line,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legend::Color;
    use crate::report::types::Padding;
    use pretty_assertions::assert_eq;

    fn a4() -> PageConfig {
        PageConfig::A4
    }

    fn para(text: &str) -> Flowable {
        Flowable::paragraph(text, TextStyle::NORMAL)
    }

    #[test]
    fn test_empty_story_has_one_page() {
        let pages = paginate(&[], &a4());
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());
    }

    #[test]
    fn test_paragraph_starts_at_frame_top() {
        let pages = paginate(&[para("Hallo")], &a4());
        match &pages[0].ops[0] {
            DrawOp::Text { x, y, .. } => {
                assert_eq!(*x, a4().frame_left());
                assert!((*y - (a4().frame_top() - 10.0)).abs() < 1e-3);
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_centered_title() {
        let pages = paginate(&[Flowable::paragraph("Karte", TextStyle::TITLE)], &a4());
        let DrawOp::Text { x, .. } = &pages[0].ops[0] else {
            panic!("expected text");
        };
        let width = string_width("Karte", TextStyle::TITLE.font, TextStyle::TITLE.size);
        let expected = a4().frame_left() + (a4().frame_width() - width) / 2.0;
        assert!((x - expected).abs() < 1e-3);
    }

    #[test]
    fn test_page_break_starts_new_page() {
        let pages = paginate(&[para("eins"), Flowable::PageBreak, para("zwei")], &a4());
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].text(), "eins");
        assert_eq!(pages[1].text(), "zwei");
    }

    #[test]
    fn test_page_break_at_top_is_ignored() {
        let pages = paginate(&[Flowable::PageBreak, para("eins"), Flowable::PageBreak], &a4());
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn test_overflowing_paragraphs_flow_to_next_page() {
        // 12pt leading: 728.5pt frame holds 60 single-line paragraphs
        let story: Vec<Flowable> = (0..75).map(|i| para(&format!("Zeile {}", i))).collect();
        let pages = paginate(&story, &a4());
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].ops.len(), 60);
        assert_eq!(pages[1].ops.len(), 15);
    }

    #[test]
    fn test_paragraph_taller_than_frame_splits_between_lines() {
        // 70 words wider than the frame wrap to 70 lines; 60 fill one frame
        let long: String = (0..70)
            .map(|i| format!("{:0>120}", i))
            .collect::<Vec<_>>()
            .join(" ");
        let pages = paginate(&[para(&long)], &a4());
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].ops.len(), 60);
        assert_eq!(pages[1].ops.len(), 10);

        let bottom = a4().margin_y;
        for page in &pages {
            for op in &page.ops {
                let DrawOp::Text { y, .. } = op else {
                    panic!("expected text");
                };
                assert!(*y >= bottom);
            }
        }
        let DrawOp::Text { y, .. } = &pages[1].ops[0] else {
            panic!("expected text");
        };
        assert!((*y - (a4().frame_top() - 10.0)).abs() < 1e-3);
    }

    #[test]
    fn test_image_is_centered() {
        let story = [Flowable::Image {
            image: 0,
            width: 100.0,
            height: 50.0,
        }];
        let pages = paginate(&story, &a4());
        let DrawOp::Image { x, y, width, height, .. } = pages[0].ops[0] else {
            panic!("expected image");
        };
        assert_eq!((width, height), (100.0, 50.0));
        assert!((x - (a4().width - 100.0) / 2.0).abs() < 1e-3);
        assert!((y - (a4().frame_top() - 50.0)).abs() < 1e-3);
    }

    #[test]
    fn test_image_under_title_shrinks_to_fit() {
        let page = a4();
        let side = page.frame_width();
        let story = [
            Flowable::paragraph("Titel", TextStyle::TITLE),
            Flowable::Spacer(10.0),
            Flowable::Image {
                image: 0,
                width: side,
                height: page.frame_height(),
            },
        ];
        let pages = paginate(&story, &page);
        assert_eq!(pages.len(), 1);

        let (width, height, _) = pages[0].images().next().unwrap();
        let available = page.frame_height() - 22.0 - 6.0 - 10.0;
        assert!((height - available).abs() < 1e-3);
        // Aspect ratio preserved
        assert!((width / height - side / page.frame_height()).abs() < 1e-4);
    }

    #[test]
    fn test_image_moves_when_little_space_left() {
        let page = a4();
        let story = [
            Flowable::Spacer(page.frame_height() - 50.0),
            Flowable::Image {
                image: 0,
                width: 100.0,
                height: 200.0,
            },
        ];
        let pages = paginate(&story, &page);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].images().next(), Some((100.0, 200.0, 0)));
    }

    fn swatch_table(rows: usize) -> Table {
        let mut table = Table::new(vec![40.0, 100.0]).padding(Padding {
            left: 4.0,
            right: 4.0,
            top: 3.0,
            bottom: 3.0,
        });
        for i in 0..rows {
            table.push_row(vec![
                Cell::Swatch {
                    color: Color::rgb(255, 0, 0),
                    width: 20.0,
                    height: 10.0,
                },
                Cell::Paragraph {
                    text: format!("Eintrag {}", i),
                    style: TextStyle::NORMAL,
                },
            ]);
        }
        table
    }

    #[test]
    fn test_table_cells_vertically_centered() {
        let pages = paginate(&[Flowable::Table(swatch_table(1))], &a4());
        let page = a4();
        let left = page.frame_left() + (page.frame_width() - 140.0) / 2.0;
        let top = page.frame_top();

        // Row height = max(10, 12) + 6 = 18; swatch is 1pt below the text box top
        assert_eq!(
            pages[0].ops[0],
            DrawOp::FillRect {
                x: left + 4.0,
                y: top - 3.0 - 1.0 - 10.0,
                width: 20.0,
                height: 10.0,
                color: Color::rgb(255, 0, 0),
            }
        );
        let DrawOp::Text { x, y, .. } = &pages[0].ops[1] else {
            panic!("expected text");
        };
        assert!((x - (left + 40.0 + 4.0)).abs() < 1e-3);
        assert!((y - (top - 3.0 - 10.0)).abs() < 1e-3);
    }

    #[test]
    fn test_table_breaks_between_rows() {
        // 18pt rows: 40 fit into 728.5pt
        let pages = paginate(&[Flowable::Table(swatch_table(50))], &a4());
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].ops.len(), 80);
        assert_eq!(pages[1].ops.len(), 20);
    }

    #[test]
    fn test_empty_cells_draw_nothing() {
        let mut table = Table::new(vec![50.0, 50.0]);
        table.push_row(vec![Cell::Empty, Cell::Empty]);
        let pages = paginate(&[Flowable::Table(table)], &a4());
        assert!(pages[0].is_empty());
    }
}
