//! # Code Generation
//!
//! Converts laid-out pages to PDF bytes using `lopdf`.

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::RgbaImage;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};

use super::ops::{DrawOp, Font, Page, Program};
use crate::error::Result;
use crate::report::text::encode_win_ansi;

const PRODUCER: &str = concat!("analysekarte ", env!("CARGO_PKG_VERSION"));

impl Program {
    /// Compile the program to a complete PDF file in memory.
    ///
    /// `images` is the image table that `DrawOp::Image` indexes into.
    pub fn to_pdf(&self, images: &[RgbaImage]) -> Result<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for font in [Font::Helvetica, Font::HelveticaBold] {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_name(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource_name(), font_id);
        }

        let mut xobjects = Dictionary::new();
        for (index, image) in images.iter().enumerate() {
            let image_id = add_image(&mut doc, image)?;
            xobjects.set(image_name(index), image_id);
        }

        let resources_id = doc.add_object(dictionary! {
            "Font" => fonts,
            "XObject" => xobjects,
        });

        let media_box: Vec<Object> = vec![
            Object::Integer(0),
            Object::Integer(0),
            self.page.width.into(),
            self.page.height.into(),
        ];

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let content = Content {
                operations: page_operations(page),
            };
            let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => media_box.clone(),
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut info = dictionary! {
            "Producer" => Object::string_literal(PRODUCER),
        };
        if let Some(title) = &self.title {
            info.set("Title", Object::String(encode_win_ansi(title), StringFormat::Literal));
        }
        let info_id = doc.add_object(info);
        doc.trailer.set("Info", info_id);

        doc.compress();

        let mut out = Vec::new();
        doc.save_to(&mut out)?;
        Ok(out)
    }
}

/// XObject resource name of the image at `index`.
fn image_name(index: usize) -> String {
    format!("Im{}", index)
}

/// Translate one page's draw ops to content stream operations.
fn page_operations(page: &Page) -> Vec<Operation> {
    let mut ops = Vec::new();

    for op in &page.ops {
        match op {
            DrawOp::Text {
                x,
                y,
                font,
                size,
                text,
            } => {
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new(
                    "Tf",
                    vec![font.resource_name().into(), (*size).into()],
                ));
                ops.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
            DrawOp::FillRect {
                x,
                y,
                width,
                height,
                color,
            } => {
                let [r, g, b] = color.to_unit();
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
                ops.push(Operation::new(
                    "re",
                    vec![(*x).into(), (*y).into(), (*width).into(), (*height).into()],
                ));
                ops.push(Operation::new("f", vec![]));
                ops.push(Operation::new("Q", vec![]));
            }
            DrawOp::Image {
                x,
                y,
                width,
                height,
                image,
            } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new(
                    "cm",
                    vec![
                        (*width).into(),
                        Object::Integer(0),
                        Object::Integer(0),
                        (*height).into(),
                        (*x).into(),
                        (*y).into(),
                    ],
                ));
                ops.push(Operation::new("Do", vec![Object::Name(image_name(*image).into_bytes())]));
                ops.push(Operation::new("Q", vec![]));
            }
        }
    }

    ops
}

/// Embed an RGBA image as a DeviceRGB XObject, with a DeviceGray soft mask
/// when any pixel is not fully opaque.
fn add_image(doc: &mut Document, image: &RgbaImage) -> Result<ObjectId> {
    let (width, height) = image.dimensions();
    let pixel_count = (width * height) as usize;

    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);
    for pixel in image.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel.0[3]);
    }

    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width as i64,
        "Height" => height as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
        "Filter" => "FlateDecode",
    };

    if alpha.iter().any(|&a| a != 255) {
        let mask = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            },
            deflate(&alpha)?,
        )
        .with_compression(false);
        let mask_id = doc.add_object(mask);
        dict.set("SMask", mask_id);
    }

    let stream = Stream::new(dict, deflate(&rgb)?).with_compression(false);
    Ok(doc.add_object(stream))
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
