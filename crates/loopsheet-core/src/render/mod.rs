//! Output documents: shopping guide and label sheets.
//!
//! Layout code talks to a [`DocumentRenderer`] in points with a top-left
//! origin; [`PdfRenderer`] turns that into a PDF.

mod guide;
mod labels;
mod pdf;

pub use guide::{GuideLayout, GuideRow, GuideSection, ShoppingGuide};
pub use labels::{Label, LabelMode, LabelPosition, LabelSheet, LabelTemplate, LABEL_TEMPLATES};
pub use pdf::PdfRenderer;

use crate::error::RenderError;
use crate::images::LoopImage;

/// Result type for render operations.
pub type Result<T> = std::result::Result<T, RenderError>;

pub const POINTS_PER_INCH: f32 = 72.0;

/// US Letter, in points.
pub const LETTER_SIZE: (f32, f32) = (612.0, 792.0);

/// RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0, 0, 0);
    pub const GRAY: Color = Color(90, 90, 90);
    pub const SCOUT_BLUE: Color = Color(0, 63, 135);
    pub const ORANGE: Color = Color(255, 102, 0);
    pub const BORDER: Color = Color(200, 200, 200);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Font, size, color and alignment for a run of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub color: Color,
    pub align: Align,
}

impl TextStyle {
    pub fn title() -> Self {
        Self {
            size: 20.0,
            bold: true,
            color: Color::SCOUT_BLUE,
            align: Align::Center,
        }
    }

    pub fn heading() -> Self {
        Self {
            size: 14.0,
            bold: true,
            color: Color::ORANGE,
            align: Align::Left,
        }
    }

    pub fn body() -> Self {
        Self {
            size: 10.0,
            bold: false,
            color: Color::BLACK,
            align: Align::Left,
        }
    }

    pub fn small() -> Self {
        Self {
            size: 8.0,
            bold: false,
            color: Color::GRAY,
            align: Align::Left,
        }
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

/// Paginated canvas the guide and label layouts draw on.
///
/// Coordinates are points from the top-left corner of the current page;
/// `y` of a text call is its baseline.
pub trait DocumentRenderer {
    /// Page width and height in points.
    fn page_size(&self) -> (f32, f32);

    /// Start a new page; later calls draw on it.
    fn new_page(&mut self);

    fn text(&mut self, x: f32, y: f32, text: &str, style: &TextStyle);

    /// Stroke a rectangle outline.
    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);

    /// Draw an image scaled to fit inside the box, keeping its aspect ratio.
    fn image(&mut self, sku: &str, image: &LoopImage, x: f32, y: f32, width: f32, height: f32)
        -> Result<()>;
}

/// Rough Helvetica advance width, used for alignment and clipping.
pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5
}

/// Shorten `text` with "..." so it fits in `max_width`.
pub fn fit_text(text: &str, size: f32, max_width: f32) -> String {
    if text_width(text, size) <= max_width {
        return text.to_string();
    }

    let max_chars = ((max_width / (size * 0.5)) as usize).saturating_sub(3);
    let mut short: String = text.chars().take(max_chars).collect();
    short.push_str("...");
    short
}
