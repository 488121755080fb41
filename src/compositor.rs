//! Layer compositing.
//!
//! Stacks transparent raster layers bottom-to-top with Porter-Duff "over"
//! blending. The first layer fixes the canvas size; every later layer is
//! stretched to that size before it is blended.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, Rgba32FImage, RgbaImage};
use log::{debug, info};

use crate::error::{ReportError, Result};

/// Default file name of the composited map.
pub const DEFAULT_MAP_PATH: &str = "karte_final.png";

/// Composite `src` over `dst` using straight (non-premultiplied) alpha.
#[inline]
pub fn alpha_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    match src[3] {
        255 => return src,
        0 => return dst,
        _ => {}
    }

    let src_a = src[3] as f32 / 255.0;
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    let mut out = [0u8; 4];
    for c in 0..3 {
        let value = (src[c] as f32 * src_a + dst[c] as f32 * dst_a * (1.0 - src_a)) / out_a;
        out[c] = value.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba(out)
}

/// Resize `layer` to `width` x `height` with bicubic filtering.
///
/// Resampling runs on premultiplied color so fully transparent pixels do
/// not darken the edges of what remains visible.
pub fn stretch(layer: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let premultiplied = Rgba32FImage::from_fn(layer.width(), layer.height(), |x, y| {
        let [r, g, b, a] = layer.get_pixel(x, y).0.map(|c| c as f32 / 255.0);
        Rgba([r * a, g * a, b * a, a])
    });

    let resized = imageops::resize(&premultiplied, width, height, FilterType::CatmullRom);

    RgbaImage::from_fn(width, height, |x, y| {
        let [r, g, b, a] = resized.get_pixel(x, y).0;
        let a = a.clamp(0.0, 1.0);
        if a <= 0.0 {
            return Rgba([0, 0, 0, 0]);
        }
        let to_u8 = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgba([to_u8(r / a), to_u8(g / a), to_u8(b / a), to_u8(a)])
    })
}

/// Accumulates layers onto a fixed-size RGBA canvas.
#[derive(Debug, Clone)]
pub struct Compositor {
    canvas: RgbaImage,
    layers: usize,
}

impl Compositor {
    /// Start from the bottom layer. Its size becomes the canvas size.
    pub fn new(base: DynamicImage) -> Self {
        let canvas = base.into_rgba8();
        debug!(
            "compositor canvas {}x{}",
            canvas.width(),
            canvas.height()
        );
        Self { canvas, layers: 1 }
    }

    /// Canvas dimensions in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    /// Number of layers composited so far, including the base.
    pub fn layer_count(&self) -> usize {
        self.layers
    }

    /// Blend `layer` over the current canvas.
    pub fn layer(&mut self, layer: DynamicImage) -> &mut Self {
        let (width, height) = self.canvas.dimensions();
        let mut layer = layer.into_rgba8();
        if layer.dimensions() != (width, height) {
            debug!(
                "stretching layer {} from {}x{} to {}x{}",
                self.layers,
                layer.width(),
                layer.height(),
                width,
                height
            );
            layer = stretch(&layer, width, height);
        }

        for (dst, src) in self.canvas.pixels_mut().zip(layer.pixels()) {
            *dst = alpha_over(*dst, *src);
        }
        self.layers += 1;
        self
    }

    /// Consume the compositor and return the canvas.
    pub fn finish(self) -> RgbaImage {
        self.canvas
    }
}

/// Composite already-decoded layers, bottom layer first.
pub fn composite<I>(layers: I) -> Result<RgbaImage>
where
    I: IntoIterator<Item = DynamicImage>,
{
    let mut layers = layers.into_iter();
    let base = layers
        .next()
        .ok_or_else(|| ReportError::Validation("no layers given".into()))?;

    let mut compositor = Compositor::new(base);
    for layer in layers {
        compositor.layer(layer);
    }
    Ok(compositor.finish())
}

/// Load `layer_paths` in order, composite them and write the result to
/// `output_path`. Later paths render on top.
///
/// The output format comes from the extension of `output_path`; an
/// unknown extension is a `Validation` error raised before any layer is
/// read.
pub fn combine<P, Q>(layer_paths: &[P], output_path: Q) -> Result<PathBuf>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let output_path = output_path.as_ref();
    let (first, rest) = layer_paths
        .split_first()
        .ok_or_else(|| ReportError::Validation("no layers given".into()))?;
    ImageFormat::from_path(output_path).map_err(|_| {
        ReportError::Validation(format!(
            "unsupported output format: {}",
            output_path.display()
        ))
    })?;

    let mut compositor = Compositor::new(load_layer(first.as_ref())?);
    for path in rest {
        compositor.layer(load_layer(path.as_ref())?);
    }

    let layers = compositor.layer_count();
    compositor.finish().save(output_path)?;
    info!(
        "composited {} layer(s) into {}",
        layers,
        output_path.display()
    );
    Ok(output_path.to_path_buf())
}

fn load_layer(path: &Path) -> Result<DynamicImage> {
    debug!("loading layer {}", path.display());
    Ok(image::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    fn solid(width: u32, height: u32, color: Rgba<u8>) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, color))
    }

    #[test]
    fn test_alpha_over_opaque_replaces() {
        assert_eq!(alpha_over(BLUE, RED), RED);
    }

    #[test]
    fn test_alpha_over_transparent_keeps_base() {
        assert_eq!(alpha_over(BLUE, CLEAR), BLUE);
    }

    #[test]
    fn test_alpha_over_half_red_on_blue() {
        let out = alpha_over(BLUE, Rgba([255, 0, 0, 128]));
        assert_eq!(out[3], 255);
        assert_eq!(out[0], 128);
        assert_eq!(out[1], 0);
        assert_eq!(out[2], 127);
    }

    #[test]
    fn test_alpha_over_on_transparent_base_keeps_source_color() {
        // Straight alpha: color of a lone translucent pixel is preserved
        let out = alpha_over(CLEAR, Rgba([10, 20, 30, 100]));
        assert_eq!(out, Rgba([10, 20, 30, 100]));
    }

    #[test]
    fn test_composite_empty_is_validation_error() {
        let err = composite(Vec::new()).unwrap_err();
        assert!(matches!(err, ReportError::Validation(_)));
    }

    #[test]
    fn test_composite_keeps_first_layer_size() {
        for n in 1..=4 {
            let layers = (0..n).map(|_| solid(37, 21, BLUE));
            let out = composite(layers).unwrap();
            assert_eq!(out.dimensions(), (37, 21));
        }
    }

    #[test]
    fn test_composite_order_sensitive() {
        let ab = composite(vec![solid(4, 4, BLUE), solid(4, 4, RED)]).unwrap();
        assert!(ab.pixels().all(|p| *p == RED));

        let ba = composite(vec![solid(4, 4, RED), solid(4, 4, BLUE)]).unwrap();
        assert!(ba.pixels().all(|p| *p == BLUE));
    }

    #[test]
    fn test_composite_stretches_mismatched_layer() {
        let out = composite(vec![solid(10, 10, BLUE), solid(3, 7, RED)]).unwrap();
        assert_eq!(out.dimensions(), (10, 10));
        assert!(out.pixels().all(|p| *p == RED));
    }

    #[test]
    fn test_stretch_keeps_edge_color() {
        let layer = RgbaImage::from_fn(2, 1, |x, _| if x == 0 { RED } else { CLEAR });
        let stretched = stretch(&layer, 8, 1);

        let edges: Vec<&Rgba<u8>> = stretched
            .pixels()
            .filter(|p| p[3] > 0 && p[3] < 255)
            .collect();
        assert!(!edges.is_empty());
        for pixel in edges {
            assert_eq!((pixel[0], pixel[1], pixel[2]), (255, 0, 0));
        }
    }

    #[test]
    fn test_stretched_layer_edge_blends_without_darkening() {
        let layer = RgbaImage::from_fn(2, 1, |x, _| if x == 0 { RED } else { CLEAR });
        let stretched = stretch(&layer, 8, 1);
        let out = composite(vec![
            solid(8, 1, BLUE),
            DynamicImage::ImageRgba8(layer),
        ])
        .unwrap();

        for (src, dst) in stretched.pixels().zip(out.pixels()) {
            // Red over blue: red channel tracks the layer's coverage
            assert_eq!(dst[0], src[3]);
            assert_eq!(dst[3], 255);
        }
    }

    #[test]
    fn test_compositor_counts_layers() {
        let mut compositor = Compositor::new(solid(2, 2, BLUE));
        compositor.layer(solid(2, 2, CLEAR)).layer(solid(5, 1, CLEAR));
        assert_eq!(compositor.layer_count(), 3);
        assert_eq!(compositor.dimensions(), (2, 2));
        assert!(compositor.finish().pixels().all(|p| *p == BLUE));
    }

    #[test]
    fn test_combine_empty_paths() {
        let paths: [&str; 0] = [];
        let err = combine(&paths, "unused.png").unwrap_err();
        assert!(matches!(err, ReportError::Validation(_)));
    }

    #[test]
    fn test_combine_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.png");
        let err = combine(&[dir.path().join("missing.png")], &out).unwrap_err();
        assert!(matches!(err, ReportError::Io(_)));
        assert!(!out.exists());
    }

    #[test]
    fn test_combine_corrupt_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.png");
        std::fs::write(&bad, b"not a png").unwrap();
        let err = combine(&[&bad], dir.path().join("out.png")).unwrap_err();
        assert!(matches!(err, ReportError::Decode(_)));
    }

    #[test]
    fn test_combine_unknown_output_extension_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.png");
        solid(4, 4, BLUE).save(&base).unwrap();

        let out = dir.path().join("karte.xyz");
        let err = combine(&[&base], &out).unwrap_err();
        assert!(matches!(err, ReportError::Validation(_)));
        assert!(err.to_string().contains("karte.xyz"));
        assert!(!out.exists());
    }

    #[test]
    fn test_combine_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.png");
        let top = dir.path().join("top.png");
        solid(8, 6, BLUE).save(&base).unwrap();
        solid(8, 6, RED).save(&top).unwrap();

        let out = dir.path().join("karte.png");
        let written = combine(&[&base, &top], &out).unwrap();
        assert_eq!(written, out);

        let result = image::open(&out).unwrap().into_rgba8();
        assert_eq!(result.dimensions(), (8, 6));
        assert!(result.pixels().all(|p| *p == RED));
    }
}
