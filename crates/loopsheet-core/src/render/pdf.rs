//! lopdf-backed [`DocumentRenderer`].

use std::collections::HashMap;

use image::imageops::FilterType;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::{debug, trace};

use super::{text_width, Align, Color, DocumentRenderer, Result, TextStyle, LETTER_SIZE};
use crate::error::RenderError;
use crate::images::LoopImage;

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// Writes US Letter pages with the standard Helvetica fonts.
///
/// Drawing before the first `new_page` starts a page implicitly. Each SKU's
/// image is embedded once and reused.
pub struct PdfRenderer {
    document: Document,
    pages: Vec<Vec<Operation>>,
    images: HashMap<String, EmbeddedImage>,
    thumbnail_size: u32,
}

struct EmbeddedImage {
    name: String,
    id: ObjectId,
    width: u32,
    height: u32,
}

impl PdfRenderer {
    pub fn new() -> Self {
        Self {
            document: Document::with_version("1.5"),
            pages: Vec::new(),
            images: HashMap::new(),
            thumbnail_size: 160,
        }
    }

    /// Longest side, in pixels, images are downscaled to before embedding.
    pub fn with_thumbnail_size(mut self, size: u32) -> Self {
        self.thumbnail_size = size.max(1);
        self
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn ops(&mut self) -> &mut Vec<Operation> {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn embed(&mut self, sku: &str, image: &LoopImage) -> Result<&EmbeddedImage> {
        if !self.images.contains_key(sku) {
            let decoded = image::load_from_memory_with_format(&image.bytes, image.format).map_err(|e| {
                RenderError::Image {
                    sku: sku.to_string(),
                    reason: e.to_string(),
                }
            })?;

            let rgb = decoded
                .resize(self.thumbnail_size, self.thumbnail_size, FilterType::Triangle)
                .to_rgb8();
            let (width, height) = rgb.dimensions();

            let stream = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width as i64,
                    "Height" => height as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                },
                rgb.into_raw(),
            );
            let id = self.document.add_object(stream);
            let name = format!("Im{}", self.images.len() + 1);
            trace!("Embedded image for SKU {} as {} ({}x{})", sku, name, width, height);

            self.images.insert(
                sku.to_string(),
                EmbeddedImage {
                    name,
                    id,
                    width,
                    height,
                },
            );
        }

        self.images.get(sku).ok_or_else(|| RenderError::Image {
            sku: sku.to_string(),
            reason: "image was not embedded".to_string(),
        })
    }

    /// Assemble the page tree and serialize the document.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }

        let mut doc = self.document;
        let pages_id = doc.new_object_id();

        let regular = doc.add_object(font("Helvetica"));
        let bold = doc.add_object(font("Helvetica-Bold"));

        let mut xobjects = Dictionary::new();
        for image in self.images.values() {
            xobjects.set(image.name.as_bytes().to_vec(), Object::Reference(image.id));
        }

        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                REGULAR_FONT => regular,
                BOLD_FONT => bold,
            },
            "XObject" => xobjects,
        });

        let mut kids = Vec::with_capacity(self.pages.len());
        for operations in self.pages {
            let content = Content { operations }
                .encode()
                .map_err(|e| RenderError::Pdf(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let page_count = kids.len();
        let (width, height) = LETTER_SIZE;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count as i64,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;

        debug!(
            "Wrote PDF: {} pages, {} images, {} bytes",
            page_count,
            self.images.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentRenderer for PdfRenderer {
    fn page_size(&self) -> (f32, f32) {
        LETTER_SIZE
    }

    fn new_page(&mut self) {
        self.pages.push(Vec::new());
    }

    fn text(&mut self, x: f32, y: f32, text: &str, style: &TextStyle) {
        if text.is_empty() {
            return;
        }

        let x = match style.align {
            Align::Left => x,
            Align::Center => x - text_width(text, style.size) / 2.0,
            Align::Right => x - text_width(text, style.size),
        };
        let y = LETTER_SIZE.1 - y;
        let font = if style.bold { BOLD_FONT } else { REGULAR_FONT };

        let ops = self.ops();
        ops.push(Operation::new("BT", vec![]));
        ops.push(fill_color(style.color));
        ops.push(Operation::new("Tf", vec![font.into(), style.size.into()]));
        ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(win_ansi(text), StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let bottom = LETTER_SIZE.1 - y - height;
        let Color(r, g, b) = color;

        let ops = self.ops();
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new(
            "RG",
            vec![channel(r).into(), channel(g).into(), channel(b).into()],
        ));
        ops.push(Operation::new("w", vec![0.5_f32.into()]));
        ops.push(Operation::new(
            "re",
            vec![x.into(), bottom.into(), width.into(), height.into()],
        ));
        ops.push(Operation::new("S", vec![]));
        ops.push(Operation::new("Q", vec![]));
    }

    fn image(&mut self, sku: &str, image: &LoopImage, x: f32, y: f32, width: f32, height: f32) -> Result<()> {
        let embedded = self.embed(sku, image)?;
        let name = embedded.name.clone();
        let (iw, ih) = (embedded.width as f32, embedded.height as f32);

        let scale = (width / iw).min(height / ih);
        let (w, h) = (iw * scale, ih * scale);
        let left = x + (width - w) / 2.0;
        let bottom = LETTER_SIZE.1 - (y + (height - h) / 2.0) - h;

        let ops = self.ops();
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new(
            "cm",
            vec![w.into(), 0.into(), 0.into(), h.into(), left.into(), bottom.into()],
        ));
        ops.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
        ops.push(Operation::new("Q", vec![]));
        Ok(())
    }
}

fn font(base: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn channel(value: u8) -> f32 {
    value as f32 / 255.0
}

fn fill_color(Color(r, g, b): Color) -> Operation {
    Operation::new(
        "rg",
        vec![channel(r).into(), channel(g).into(), channel(b).into()],
    )
}

/// Encode for the standard fonts' WinAnsiEncoding; unmapped chars become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '\u{20ac}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::ImageStore;
    use pretty_assertions::assert_eq;

    fn loaded(bytes: &[u8]) -> Document {
        Document::load_mem(bytes).unwrap()
    }

    fn image_objects(doc: &Document) -> usize {
        doc.objects
            .values()
            .filter(|object| match object {
                Object::Stream(stream) => stream
                    .dict
                    .get(b"Subtype")
                    .and_then(|o| o.as_name())
                    .map(|name| name == b"Image")
                    .unwrap_or(false),
                _ => false,
            })
            .count()
    }

    #[test]
    fn test_pages_and_text() {
        let mut renderer = PdfRenderer::new();
        renderer.new_page();
        renderer.text(306.0, 72.0, "Pack 361 Adventure Loops", &TextStyle::title());
        renderer.rect(15.75, 36.0, 189.0, 72.0, Color::BORDER);
        renderer.new_page();
        renderer.text(54.0, 100.0, "Total loops: 4", &TextStyle::body().bold());
        assert_eq!(renderer.page_count(), 2);

        let bytes = renderer.finish().unwrap();
        assert!(crate::pdf::is_pdf(&bytes));

        let doc = loaded(&bytes);
        assert_eq!(doc.get_pages().len(), 2);
        assert!(doc.extract_text(&[1]).unwrap().contains("Pack 361"));
        assert!(doc.extract_text(&[2]).unwrap().contains("Total loops"));
    }

    #[test]
    fn test_implicit_and_empty_pages() {
        let mut renderer = PdfRenderer::new();
        renderer.text(72.0, 72.0, "Blaine R", &TextStyle::body());
        assert_eq!(renderer.page_count(), 1);
        assert_eq!(loaded(&renderer.finish().unwrap()).get_pages().len(), 1);

        let empty = PdfRenderer::new().finish().unwrap();
        assert_eq!(loaded(&empty).get_pages().len(), 1);
    }

    #[test]
    fn test_image_embedded_once() {
        let mut store = ImageStore::new();
        let mut png = Vec::new();
        image::RgbImage::from_pixel(400, 200, image::Rgb([255, 102, 0]))
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        store.insert("619938", png).unwrap();
        let image = store.get("619938").unwrap();

        let mut renderer = PdfRenderer::new().with_thumbnail_size(64);
        renderer.new_page();
        renderer.image("619938", image, 54.0, 54.0, 32.0, 32.0).unwrap();
        renderer.image("619938", image, 54.0, 100.0, 32.0, 32.0).unwrap();

        let embedded = &renderer.images["619938"];
        assert_eq!((embedded.width, embedded.height), (64, 32));

        let doc = loaded(&renderer.finish().unwrap());
        assert_eq!(image_objects(&doc), 1);
    }

    #[test]
    fn test_undecodable_image_is_an_error() {
        let image = LoopImage {
            bytes: b"\x89PNG\r\n\x1a\nbroken".to_vec(),
            format: image::ImageFormat::Png,
        };
        let mut renderer = PdfRenderer::new();
        let err = renderer.image("619938", &image, 0.0, 0.0, 10.0, 10.0).unwrap_err();
        assert!(matches!(err, RenderError::Image { sku, .. } if sku == "619938"));
    }

    #[test]
    fn test_win_ansi() {
        assert_eq!(win_ansi("Bobcat (Bear)"), b"Bobcat (Bear)".to_vec());
        assert_eq!(win_ansi("\u{2022} Café"), vec![0x95, b' ', b'C', b'a', b'f', 0xe9]);
        assert_eq!(win_ansi("\u{4e2d}"), b"?".to_vec());
    }
}
