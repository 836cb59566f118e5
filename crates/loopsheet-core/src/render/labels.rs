//! Adhesive label sheets.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{fit_text, Color, DocumentRenderer, TextStyle, POINTS_PER_INCH};
use crate::error::RenderError;
use crate::images::ImageStore;
use crate::models::config::LabelConfig;
use crate::models::order::{Order, Scout};
use crate::order::{classify, Den};

/// Label stock geometry. Lengths are inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelTemplate {
    pub code: &'static str,
    pub cols: u32,
    pub rows: u32,
    pub width: f32,
    pub height: f32,
    pub left_margin: f32,
    pub top_margin: f32,
}

/// Known label stock.
pub const LABEL_TEMPLATES: [LabelTemplate; 5] = [
    LabelTemplate::new("8160", 3, 10, 2.625, 1.0),
    LabelTemplate::new("5160", 3, 10, 2.625, 1.0),
    LabelTemplate::new("8163", 2, 5, 4.0, 2.0),
    LabelTemplate::new("5163", 2, 5, 4.0, 2.0),
    LabelTemplate::new("8164", 2, 3, 4.0, 3.33),
];

/// Where a label lands on the sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPosition {
    /// Zero-based page index.
    pub page: usize,
    pub col: u32,
    pub row: u32,
    /// Left edge, inches from the page's left side.
    pub x: f32,
    /// Top edge, inches from the page's top.
    pub y: f32,
}

impl LabelTemplate {
    const fn new(code: &'static str, cols: u32, rows: u32, width: f32, height: f32) -> Self {
        Self {
            code,
            cols,
            rows,
            width,
            height,
            left_margin: 0.21875,
            top_margin: 0.5,
        }
    }

    /// Find a template by stock code.
    pub fn lookup(code: &str) -> Result<Self, RenderError> {
        LABEL_TEMPLATES
            .iter()
            .find(|t| t.code == code.trim())
            .copied()
            .ok_or_else(|| RenderError::UnknownTemplate(code.to_string()))
    }

    pub fn per_page(&self) -> usize {
        (self.cols * self.rows) as usize
    }

    /// Row-major placement of the `index`-th label.
    pub fn position(&self, index: usize) -> LabelPosition {
        let per_page = self.per_page();
        let slot = index % per_page;
        let col = (slot % self.cols as usize) as u32;
        let row = (slot / self.cols as usize) as u32;

        LabelPosition {
            page: index / per_page,
            col,
            row,
            x: self.left_margin + col as f32 * self.width,
            y: self.top_margin + row as f32 * self.height,
        }
    }
}

/// What each label represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMode {
    /// One label per scout-adventure pairing.
    #[default]
    PerAdventure,
    /// One label per scout listing every adventure.
    PerScout,
}

/// Content of one label.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub scout: String,
    pub den: Den,
    /// Adventure names; one entry in per-adventure mode.
    pub adventures: Vec<String>,
    /// SKU whose image goes on the label (per-adventure mode only).
    pub sku: Option<String>,
}

/// All labels for an order on a given stock.
#[derive(Debug, Clone)]
pub struct LabelSheet {
    pub pack_number: String,
    pub template: LabelTemplate,
    pub mode: LabelMode,
    pub labels: Vec<Label>,
}

impl LabelSheet {
    /// Lay out labels for every scout in first-seen order.
    pub fn build(order: &Order, template: LabelTemplate, mode: LabelMode) -> Self {
        let labels: Vec<Label> = match mode {
            LabelMode::PerAdventure => order
                .scouts
                .iter()
                .flat_map(|scout| {
                    scout.adventures.iter().map(|adventure| Label {
                        scout: scout.name.clone(),
                        den: classify(&adventure.sku),
                        adventures: vec![adventure.name.clone()],
                        sku: Some(adventure.sku.clone()),
                    })
                })
                .collect(),
            LabelMode::PerScout => order
                .scouts
                .iter()
                .map(|scout| Label {
                    scout: scout.name.clone(),
                    den: scout_den(scout),
                    adventures: scout.adventures.iter().map(|a| a.name.clone()).collect(),
                    sku: None,
                })
                .collect(),
        };

        debug!(
            "Built {} labels on {} stock ({:?})",
            labels.len(),
            template.code,
            mode
        );

        Self {
            pack_number: order.pack_number.clone(),
            template,
            mode,
            labels,
        }
    }

    pub fn page_count(&self) -> usize {
        self.labels.len().div_ceil(self.template.per_page())
    }

    /// Draw every label, starting a new page whenever the grid fills.
    pub fn draw<R: DocumentRenderer + ?Sized>(
        &self,
        renderer: &mut R,
        images: &ImageStore,
        options: &LabelConfig,
    ) {
        let t = &self.template;
        let (w, h) = (t.width * POINTS_PER_INCH, t.height * POINTS_PER_INCH);
        let pad = 6.0;
        let mut current_page = None;

        for (index, label) in self.labels.iter().enumerate() {
            let pos = t.position(index);
            if current_page != Some(pos.page) {
                renderer.new_page();
                current_page = Some(pos.page);
            }

            let (x, y) = (pos.x * POINTS_PER_INCH, pos.y * POINTS_PER_INCH);
            if options.draw_borders {
                renderer.rect(x, y, w, h, Color::BORDER);
            }

            // Square image on the right, as tall as the label allows
            let mut text_width = w - 2.0 * pad;
            if options.include_images {
                if let Some((sku, image)) = label
                    .sku
                    .as_deref()
                    .and_then(|sku| images.get(sku).map(|image| (sku, image)))
                {
                    let side = (h - 2.0 * pad).min(w / 3.0);
                    match renderer.image(sku, image, x + w - pad - side, y + pad, side, side) {
                        Ok(()) => text_width -= side + pad,
                        Err(e) => warn!("Skipping image on label for {}: {}", label.scout, e),
                    }
                }
            }

            self.draw_text(renderer, label, x + pad, y + pad, text_width, h - 2.0 * pad);
        }

        if self.labels.is_empty() {
            renderer.new_page();
            renderer.text(
                t.left_margin * POINTS_PER_INCH,
                t.top_margin * POINTS_PER_INCH + 12.0,
                "No scouts found in the order.",
                &TextStyle::body(),
            );
        }
    }

    fn draw_text<R: DocumentRenderer + ?Sized>(
        &self,
        renderer: &mut R,
        label: &Label,
        x: f32,
        top: f32,
        width: f32,
        height: f32,
    ) {
        let name_style = TextStyle::body().bold().with_color(Color::SCOUT_BLUE);
        let mut y = top + name_style.size;
        renderer.text(x, y, &fit_text(&label.scout, name_style.size, width), &name_style);

        match self.mode {
            LabelMode::PerAdventure => {
                let body = TextStyle::body().with_size(8.0);
                if let Some(adventure) = label.adventures.first() {
                    y += body.size + 2.0;
                    renderer.text(x, y, &fit_text(adventure, body.size, width), &body);
                }
                let small = TextStyle::small().with_size(6.5);
                y += small.size + 2.0;
                if y <= top + height {
                    let den = format!("{} - Pack {}", label.den, self.pack_number);
                    renderer.text(x, y, &fit_text(&den, small.size, width), &small);
                }
            }
            LabelMode::PerScout => {
                let item = TextStyle::body().with_size(7.0);
                let line_height = item.size + 1.5;
                let fits = ((top + height - y) / line_height).max(0.0) as usize;

                let shown = if label.adventures.len() > fits {
                    fits.saturating_sub(1)
                } else {
                    label.adventures.len()
                };

                for adventure in &label.adventures[..shown] {
                    y += line_height;
                    let line = format!("\u{2022} {}", adventure);
                    renderer.text(x, y, &fit_text(&line, item.size, width), &item);
                }

                let hidden = label.adventures.len() - shown;
                if hidden > 0 && fits > 0 {
                    y += line_height;
                    renderer.text(x, y, &format!("+{} more", hidden), &item);
                }
            }
        }
    }
}

/// Den most of a scout's adventures belong to; ties go to the earlier den.
fn scout_den(scout: &Scout) -> Den {
    let mut counts = [0usize; Den::ALL.len()];
    for adventure in &scout.adventures {
        let den = classify(&adventure.sku);
        if let Some(i) = Den::ALL.iter().position(|d| *d == den) {
            counts[i] += 1;
        }
    }

    let mut best = Den::CubScout;
    let mut best_count = 0;
    for (den, count) in Den::ALL.iter().zip(counts) {
        if count > best_count {
            best = *den;
            best_count = count;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::LineItem;
    use crate::order::OrderAggregator;
    use crate::render::testing::{Op, RecordingRenderer};
    use pretty_assertions::assert_eq;

    fn order() -> Order {
        let names = |n: &[&str]| n.iter().map(|s| s.to_string()).collect();
        OrderAggregator::new().aggregate(
            "361",
            &[
                LineItem::new(2, "619938", "Air of the Wolf", names(&["Blaine R", "Charlie R"])),
                LineItem::new(1, "619939", "Code of the Wolf", names(&["Blaine R"])),
                LineItem::new(1, "660252", "Bobcat (Bear)", names(&["Ethan Y"])),
            ],
        )
    }

    #[test]
    fn test_template_table() {
        let t = LabelTemplate::lookup("5160").unwrap();
        assert_eq!((t.cols, t.rows, t.width, t.height), (3, 10, 2.625, 1.0));
        assert_eq!(LabelTemplate::lookup("8160").unwrap().per_page(), 30);
        assert_eq!(LabelTemplate::lookup("8163").unwrap().per_page(), 10);
        assert_eq!(LabelTemplate::lookup("5163").unwrap().height, 2.0);
        assert_eq!(LabelTemplate::lookup("8164").unwrap().height, 3.33);
        for t in LABEL_TEMPLATES {
            assert_eq!(t.left_margin, 0.21875);
            assert_eq!(t.top_margin, 0.5);
        }
        assert!(matches!(
            LabelTemplate::lookup("9999"),
            Err(RenderError::UnknownTemplate(code)) if code == "9999"
        ));
    }

    #[test]
    fn test_grid_positions() {
        let t = LabelTemplate::lookup("8164").unwrap();

        let first = t.position(0);
        assert_eq!((first.page, first.col, first.row), (0, 0, 0));
        assert_eq!((first.x, first.y), (0.21875, 0.5));

        let third = t.position(3);
        assert_eq!((third.page, third.col, third.row), (0, 1, 1));
        assert_eq!((third.x, third.y), (4.21875, 0.5 + 3.33));

        let next_page = t.position(6);
        assert_eq!((next_page.page, next_page.col, next_page.row), (1, 0, 0));
    }

    #[test]
    fn test_per_adventure_labels() {
        let sheet = LabelSheet::build(&order(), LabelTemplate::lookup("5160").unwrap(), LabelMode::PerAdventure);

        let pairs: Vec<(&str, &str)> = sheet
            .labels
            .iter()
            .map(|l| (l.scout.as_str(), l.adventures[0].as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Blaine R", "Air of the Wolf"),
                ("Blaine R", "Code of the Wolf"),
                ("Charlie R", "Air of the Wolf"),
                ("Ethan Y", "Bobcat (Bear)"),
            ]
        );
        assert_eq!(sheet.labels[3].den, Den::Bear);
        assert_eq!(sheet.page_count(), 1);
    }

    #[test]
    fn test_per_scout_labels() {
        let sheet = LabelSheet::build(&order(), LabelTemplate::lookup("8163").unwrap(), LabelMode::PerScout);

        assert_eq!(sheet.labels.len(), 3);
        assert_eq!(sheet.labels[0].adventures, vec!["Air of the Wolf", "Code of the Wolf"]);
        assert_eq!(sheet.labels[0].den, Den::Wolf);
        assert_eq!(sheet.labels[2].den, Den::Bear);
        assert!(sheet.labels.iter().all(|l| l.sku.is_none()));
    }

    #[test]
    fn test_draw_paginates() {
        let mut order = order();
        let adventures = order.scouts[0].adventures.clone();
        for i in 0..5 {
            let mut scout = Scout::new(format!("Scout{} X", i));
            scout.adventures = adventures.clone();
            order.scouts.push(scout);
        }
        // 4 + 5 * 2 = 14 labels on 6-up stock
        let sheet = LabelSheet::build(&order, LabelTemplate::lookup("8164").unwrap(), LabelMode::PerAdventure);
        assert_eq!(sheet.labels.len(), 14);
        assert_eq!(sheet.page_count(), 3);

        let mut renderer = RecordingRenderer::default();
        sheet.draw(&mut renderer, &ImageStore::new(), &LabelConfig::default());

        assert_eq!(renderer.pages(), 3);
        let rects = renderer.rects();
        assert_eq!(rects.len(), 14);
        assert_eq!(rects[0], (0.21875 * 72.0, 36.0, 288.0, 3.33 * 72.0));
        assert!(renderer.ops.iter().all(|op| !matches!(op, Op::Image { .. })));
    }

    #[test]
    fn test_draw_images_when_available() {
        let mut images = ImageStore::new();
        let mut png = Vec::new();
        image::RgbImage::new(2, 2)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        images.insert("619938", png).unwrap();

        let sheet = LabelSheet::build(&order(), LabelTemplate::lookup("8163").unwrap(), LabelMode::PerAdventure);
        let mut renderer = RecordingRenderer::default();
        sheet.draw(&mut renderer, &images, &LabelConfig::default());

        let drawn: Vec<&Op> = renderer
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Image { .. }))
            .collect();
        assert_eq!(drawn.len(), 2);
        assert!(renderer.texts().contains(&"Wolf - Pack 361"));
    }

    #[test]
    fn test_per_scout_overflow() {
        let mut order = Order::new("361");
        let mut scout = Scout::new("Ishan Y");
        for i in 0..20 {
            scout.adventures.push(crate::models::order::AdventureRef {
                sku: "660252".to_string(),
                name: format!("Adventure {}", i),
                qty: 1,
            });
        }
        order.scouts.push(scout);

        let sheet = LabelSheet::build(&order, LabelTemplate::lookup("5160").unwrap(), LabelMode::PerScout);
        let mut renderer = RecordingRenderer::default();
        sheet.draw(&mut renderer, &ImageStore::new(), &LabelConfig::default());

        let texts = renderer.texts();
        assert!(texts.iter().any(|t| t.starts_with('+') && t.ends_with("more")));
        assert!(texts.len() < 20);
    }

    #[test]
    fn test_empty_order() {
        let sheet = LabelSheet::build(&Order::new("361"), LabelTemplate::lookup("5160").unwrap(), LabelMode::PerScout);
        let mut renderer = RecordingRenderer::default();
        sheet.draw(&mut renderer, &ImageStore::new(), &LabelConfig::default());
        assert_eq!(renderer.pages(), 1);
        assert_eq!(sheet.page_count(), 0);
    }
}
