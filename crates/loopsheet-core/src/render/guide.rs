//! Shopping guide: what to buy, grouped by den, with totals.

use chrono::Local;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{fit_text, text_width, Align, Color, DocumentRenderer, TextStyle};
use crate::images::ImageStore;
use crate::models::config::GuideConfig;
use crate::models::order::Order;
use crate::order::{classify, Den};

const MARGIN: f32 = 54.0;
const FOOTER_GAP: f32 = 36.0;
const THUMBNAIL: f32 = 32.0;

/// How guide rows are grouped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuideLayout {
    /// One section per den, in classification order.
    #[default]
    ByDen,
    /// A single table ordered by SKU.
    Flat,
}

/// One SKU on the guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuideRow {
    pub sku: String,
    pub name: String,
    pub qty: u32,
    pub scouts: Vec<String>,
    pub unit_price: Decimal,
    pub total: Decimal,
}

/// Rows under one heading. `den` is `None` in the flat layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuideSection {
    pub den: Option<Den>,
    pub rows: Vec<GuideRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingGuide {
    pub pack_number: String,
    pub layout: GuideLayout,
    pub sections: Vec<GuideSection>,
    pub total_loops: u32,
    pub total_cost: Decimal,
}

impl ShoppingGuide {
    pub fn build(order: &Order, layout: GuideLayout) -> Self {
        let rows: Vec<GuideRow> = order
            .summary
            .iter()
            .map(|(sku, entry)| GuideRow {
                sku: sku.clone(),
                name: entry.name.clone(),
                qty: entry.qty,
                scouts: entry.scout_names.clone(),
                unit_price: entry.unit_price,
                total: entry.total(),
            })
            .collect();

        let sections = match layout {
            GuideLayout::Flat if rows.is_empty() => Vec::new(),
            GuideLayout::Flat => vec![GuideSection { den: None, rows }],
            GuideLayout::ByDen => Den::ALL
                .iter()
                .map(|den| GuideSection {
                    den: Some(*den),
                    rows: rows.iter().filter(|r| classify(&r.sku) == *den).cloned().collect(),
                })
                .filter(|section| !section.rows.is_empty())
                .collect(),
        };

        Self {
            pack_number: order.pack_number.clone(),
            layout,
            sections,
            total_loops: order.total_loops(),
            total_cost: order.total_cost(),
        }
    }

    pub fn title(&self) -> String {
        format!("Pack {} Adventure Loops", self.pack_number)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Draw the guide, breaking pages as rows run out of room.
    pub fn draw<R: DocumentRenderer + ?Sized>(
        &self,
        renderer: &mut R,
        images: &ImageStore,
        options: &GuideConfig,
    ) {
        let generated = Local::now().format("%B %-d, %Y").to_string();
        let mut page = GuidePage::start(renderer, &generated);
        let width = page.width;

        renderer.text(width / 2.0, page.y, &self.title(), &TextStyle::title());
        page.y += 22.0;
        renderer.text(
            width / 2.0,
            page.y,
            "Shopping Guide",
            &TextStyle::heading().with_color(Color::GRAY).aligned(Align::Center),
        );
        page.y += 30.0;

        if self.is_empty() {
            renderer.text(MARGIN, page.y, "No adventure loops found in this order.", &TextStyle::body());
            page.finish(renderer);
            return;
        }

        let columns = Columns::new(width, options);
        let row_height = if options.include_images { THUMBNAIL + 6.0 } else { 16.0 };

        self.draw_header(renderer, &columns, &mut page, options);

        for section in &self.sections {
            if let Some(den) = section.den {
                if page.ensure(renderer, 22.0 + row_height) {
                    self.draw_header(renderer, &columns, &mut page, options);
                }
                page.y += 6.0;
                renderer.text(MARGIN, page.y, den.name(), &TextStyle::heading());
                page.y += 16.0;
            }

            for row in &section.rows {
                if page.ensure(renderer, row_height) {
                    self.draw_header(renderer, &columns, &mut page, options);
                }
                self.draw_row(renderer, images, &columns, &mut page, row, row_height, options);
            }
        }

        page.ensure(renderer, 48.0);
        page.y += 12.0;
        let totals = TextStyle::body().bold();
        renderer.text(MARGIN, page.y, &format!("Total loops: {}", self.total_loops), &totals);
        if options.show_prices {
            renderer.text(
                width - MARGIN,
                page.y,
                &format!("Total cost: ${:.2}", self.total_cost),
                &totals.clone().aligned(Align::Right),
            );
        }

        debug!(
            "Drew shopping guide for pack {} ({} sections, {} pages)",
            self.pack_number,
            self.sections.len(),
            page.number
        );
        page.finish(renderer);
    }

    fn draw_header<R: DocumentRenderer + ?Sized>(
        &self,
        renderer: &mut R,
        columns: &Columns,
        page: &mut GuidePage<'_>,
        options: &GuideConfig,
    ) {
        let style = TextStyle::small().bold();
        renderer.text(columns.qty, page.y, "Qty", &style);
        renderer.text(columns.sku, page.y, "SKU", &style);
        renderer.text(columns.name, page.y, "Adventure", &style);
        renderer.text(columns.scouts, page.y, "Scouts", &style);
        if options.show_prices {
            renderer.text(columns.total, page.y, "Total", &style.clone().aligned(Align::Right));
        }
        page.y += 14.0;
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_row<R: DocumentRenderer + ?Sized>(
        &self,
        renderer: &mut R,
        images: &ImageStore,
        columns: &Columns,
        page: &mut GuidePage<'_>,
        row: &GuideRow,
        row_height: f32,
        options: &GuideConfig,
    ) {
        let body = TextStyle::body();
        let baseline = page.y + row_height / 2.0 + body.size / 3.0;

        if options.include_images {
            if let Some(image) = images.get(&row.sku) {
                if let Err(e) = renderer.image(&row.sku, image, MARGIN, page.y, THUMBNAIL, THUMBNAIL) {
                    warn!("Skipping image for SKU {}: {}", row.sku, e);
                }
            }
        }

        renderer.text(columns.qty, baseline, &row.qty.to_string(), &body);
        renderer.text(columns.sku, baseline, &row.sku, &body);
        renderer.text(
            columns.name,
            baseline,
            &fit_text(&row.name, body.size, columns.scouts - columns.name - 8.0),
            &body,
        );

        let scouts = TextStyle::small();
        renderer.text(
            columns.scouts,
            baseline,
            &fit_text(&row.scouts.join(", "), scouts.size, columns.scouts_width),
            &scouts,
        );

        if options.show_prices {
            renderer.text(
                columns.total,
                baseline,
                &format!("${:.2}", row.total),
                &body.clone().aligned(Align::Right),
            );
        }

        page.y += row_height;
    }
}

/// Left edges of each column; `total` is a right edge.
struct Columns {
    qty: f32,
    sku: f32,
    name: f32,
    scouts: f32,
    scouts_width: f32,
    total: f32,
}

impl Columns {
    fn new(page_width: f32, options: &GuideConfig) -> Self {
        let left = if options.include_images { MARGIN + THUMBNAIL + 8.0 } else { MARGIN };
        let total = page_width - MARGIN;
        let price_width = if options.show_prices { text_width("$000.00", 10.0) + 8.0 } else { 0.0 };
        let scouts = left + 250.0;

        Self {
            qty: left,
            sku: left + 28.0,
            name: left + 80.0,
            scouts,
            scouts_width: (total - price_width - scouts).max(0.0),
            total,
        }
    }
}

/// Tracks the write position and stamps the footer when a page ends.
struct GuidePage<'a> {
    number: usize,
    y: f32,
    width: f32,
    height: f32,
    generated: &'a str,
}

impl<'a> GuidePage<'a> {
    fn start<R: DocumentRenderer + ?Sized>(renderer: &mut R, generated: &'a str) -> Self {
        renderer.new_page();
        let (width, height) = renderer.page_size();
        Self {
            number: 1,
            y: MARGIN + 18.0,
            width,
            height,
            generated,
        }
    }

    /// Make room for `needed` points, breaking the page if necessary.
    /// Returns true if a new page was started.
    fn ensure<R: DocumentRenderer + ?Sized>(&mut self, renderer: &mut R, needed: f32) -> bool {
        if self.y + needed <= self.height - MARGIN - FOOTER_GAP / 2.0 {
            return false;
        }

        self.finish(renderer);
        renderer.new_page();
        self.number += 1;
        self.y = MARGIN;
        true
    }

    fn finish<R: DocumentRenderer + ?Sized>(&self, renderer: &mut R) {
        let y = self.height - FOOTER_GAP;
        let style = TextStyle::small();
        renderer.text(MARGIN, y, &format!("Generated {}", self.generated), &style);
        renderer.text(
            self.width - MARGIN,
            y,
            &format!("Page {}", self.number),
            &style.clone().aligned(Align::Right),
        );
    }
}
