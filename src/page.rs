//! # Page Configuration
//!
//! Page geometry for the generated report. All lengths are PDF points
//! (1/72 inch), with the origin in the bottom-left corner of the page.
//!
//! ## Usage
//!
//! ```
//! use analysekarte::page::{PageConfig, mm};
//!
//! let page = PageConfig::A4;
//! println!("Body frame: {:.1} x {:.1} pt", page.frame_width(), page.frame_height());
//! assert!((mm(10.0) - 28.3465).abs() < 1e-3);
//! ```

/// Points per millimeter.
pub const MM: f32 = 72.0 / 25.4;

/// Convert millimeters to points.
#[inline]
pub fn mm(value: f32) -> f32 {
    value * MM
}

/// # Page Configuration
///
/// ## Calculations
///
/// ```text
/// frame_width  = width  - 2 * margin_x
/// frame_height = height - 2 * margin_y
///
/// For A4 with 10mm / 20mm margins:
///   frame_width  = 210mm - 20mm = 190mm ≈ 538.6pt
///   frame_height = 297mm - 40mm = 257mm ≈ 728.5pt
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageConfig {
    /// Paper name
    pub name: &'static str,

    /// Page width in points
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Left and right margin in points
    pub margin_x: f32,

    /// Top and bottom margin in points
    pub margin_y: f32,
}

impl PageConfig {
    /// # A4 Portrait
    ///
    /// | Property | Value |
    /// |----------|-------|
    /// | Paper | 210mm x 297mm |
    /// | Horizontal margins | 10mm each |
    /// | Vertical margins | 20mm each |
    pub const A4: PageConfig = PageConfig {
        name: "A4",
        width: 210.0 * MM,
        height: 297.0 * MM,
        margin_x: 10.0 * MM,
        margin_y: 20.0 * MM,
    };

    /// Width of the body frame.
    pub fn frame_width(&self) -> f32 {
        self.width - 2.0 * self.margin_x
    }

    /// Height of the body frame.
    pub fn frame_height(&self) -> f32 {
        self.height - 2.0 * self.margin_y
    }

    /// X coordinate of the frame's left edge.
    pub fn frame_left(&self) -> f32 {
        self.margin_x
    }

    /// Y coordinate of the frame's top edge.
    pub fn frame_top(&self) -> f32 {
        self.height - self.margin_y
    }

    /// Uniform scale that fits a `width` x `height` pixel image into the
    /// page minus 20mm horizontally and 40mm vertically.
    ///
    /// One pixel maps to one point at scale 1.0.
    pub fn map_scale(&self, width: u32, height: u32) -> f32 {
        let avail_w = self.width - mm(20.0);
        let avail_h = self.height - mm(40.0);
        (avail_w / width.max(1) as f32).min(avail_h / height.max(1) as f32)
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::A4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_dimensions() {
        let a4 = PageConfig::A4;
        assert!((a4.width - 595.2756).abs() < 0.01);
        assert!((a4.height - 841.8898).abs() < 0.01);
    }

    #[test]
    fn test_frame_matches_map_area() {
        let a4 = PageConfig::A4;
        assert!((a4.frame_width() - mm(190.0)).abs() < 0.01);
        assert!((a4.frame_height() - mm(257.0)).abs() < 0.01);
    }

    #[test]
    fn test_map_scale_downscales_large_square() {
        let a4 = PageConfig::A4;
        let scale = a4.map_scale(2000, 2000);
        assert!(scale <= 1.0);
        // Width is the binding constraint for a square on portrait paper
        assert!((2000.0 * scale - mm(190.0)).abs() < 0.01);
    }

    #[test]
    fn test_map_scale_upscales_small_image() {
        let scale = PageConfig::A4.map_scale(100, 100);
        assert!(scale > 1.0);
    }

    #[test]
    fn test_map_scale_tall_image_bound_by_height() {
        let a4 = PageConfig::A4;
        let scale = a4.map_scale(100, 1000);
        assert!((1000.0 * scale - mm(257.0)).abs() < 0.01);
    }
}
