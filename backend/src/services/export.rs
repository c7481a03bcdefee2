//! PDF export of the sales and analytics report
//!
//! A4 portrait. Page 1 carries the header band and the key-metrics grid,
//! page 2 the trend chart and the category breakdown. Category rows that do
//! not fit continue on extra pages. Every page gets a footer with its page
//! number and the confidentiality notice.

use chrono::{DateTime, FixedOffset};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use shared::models::MetricSnapshot;
use shared::render::{category_bars, report_subtitle, summary_lines, CategoryBar, REPORT_TITLE};
use shared::types::{MonthFilter, TrendRange};

use crate::config::ReportingConfig;
use crate::error::{AppError, AppResult};
use crate::services::chart::{render_trend_chart, CHART_HEIGHT, CHART_WIDTH};

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 40.0;
const FOOTER_LIMIT: f32 = 80.0;
const CATEGORY_ROW_HEIGHT: f32 = 36.0;
const BAR_WIDTH: f32 = 400.0;

type Color = (f32, f32, f32);

const BRAND: Color = (0.486, 0.227, 0.929);
const WHITE: Color = (1.0, 1.0, 1.0);
const TEXT: Color = (0.13, 0.13, 0.16);
const MUTED: Color = (0.45, 0.45, 0.5);
const PANEL: Color = (0.95, 0.95, 0.97);

#[derive(Clone, Copy)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

/// Everything printed into one exported report
pub struct ReportExport<'a> {
    pub snapshot: &'a MetricSnapshot,
    pub range: TrendRange,
    pub month: MonthFilter,
    pub generated_at: DateTime<FixedOffset>,
}

/// Drawing operations for a single page
#[derive(Default)]
struct PageCanvas {
    ops: Vec<Operation>,
}

impl PageCanvas {
    fn fill_color(&mut self, (r, g, b): Color) {
        self.ops
            .push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
    }

    fn rect(&mut self, color: Color, x: f32, y: f32, width: f32, height: f32) {
        self.fill_color(color);
        self.ops.push(Operation::new(
            "re",
            vec![x.into(), y.into(), width.into(), height.into()],
        ));
        self.ops.push(Operation::new("f", vec![]));
    }

    fn text(&mut self, font: Font, size: f32, color: Color, x: f32, y: f32, text: &str) {
        self.fill_color(color);
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new(
            "Tf",
            vec![font.resource().into(), size.into()],
        ));
        self.ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        self.ops
            .push(Operation::new("Tj", vec![Object::string_literal(text)]));
        self.ops.push(Operation::new("ET", vec![]));
    }

    fn image(&mut self, name: &str, x: f32, y: f32, width: f32, height: f32) {
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new(
            "cm",
            vec![
                width.into(),
                0.into(),
                0.into(),
                height.into(),
                x.into(),
                y.into(),
            ],
        ));
        self.ops.push(Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]));
        self.ops.push(Operation::new("Q", vec![]));
    }
}

fn summary_page(export: &ReportExport, settings: &ReportingConfig) -> PageCanvas {
    let mut page = PageCanvas::default();

    // Header band
    page.rect(BRAND, 0.0, PAGE_HEIGHT - 110.0, PAGE_WIDTH, 110.0);
    page.text(Font::Bold, 22.0, WHITE, MARGIN, PAGE_HEIGHT - 50.0, REPORT_TITLE);
    page.text(
        Font::Regular,
        12.0,
        WHITE,
        MARGIN,
        PAGE_HEIGHT - 72.0,
        &report_subtitle(export.range, export.month),
    );
    page.text(Font::Regular, 10.0, WHITE, MARGIN, PAGE_HEIGHT - 92.0, &settings.brand_name);

    page.text(
        Font::Regular,
        10.0,
        MUTED,
        MARGIN,
        PAGE_HEIGHT - 135.0,
        &format!("Generated: {}", export.generated_at.format("%Y-%m-%d %H:%M")),
    );

    page.text(Font::Bold, 16.0, TEXT, MARGIN, PAGE_HEIGHT - 175.0, "Key Metrics");

    // Two-column grid
    let column_width = (PAGE_WIDTH - 2.0 * MARGIN - 20.0) / 2.0;
    let top = PAGE_HEIGHT - 215.0;
    for (i, line) in summary_lines(export.snapshot, &settings.currency).iter().enumerate() {
        let x = MARGIN + (i % 2) as f32 * (column_width + 20.0);
        let y = top - (i / 2) as f32 * 44.0;
        page.rect(PANEL, x, y - 10.0, column_width, 32.0);
        page.text(Font::Regular, 11.0, TEXT, x + 10.0, y + 2.0, line);
    }

    page
}

fn category_row(page: &mut PageCanvas, bar: &CategoryBar, y: f32) {
    page.text(Font::Regular, 10.0, TEXT, MARGIN, y, &bar.label);
    page.rect(PANEL, MARGIN, y - 14.0, BAR_WIDTH, 8.0);
    let filled = BAR_WIDTH * bar.percentage.min(100) as f32 / 100.0;
    if filled > 0.0 {
        page.rect(BRAND, MARGIN, y - 14.0, filled, 8.0);
    }
}

/// Chart page followed by as many category continuation pages as needed
fn analysis_pages(export: &ReportExport) -> Vec<PageCanvas> {
    let mut pages = Vec::new();
    let mut page = PageCanvas::default();

    page.text(Font::Bold, 16.0, TEXT, MARGIN, PAGE_HEIGHT - 52.0, "Sales Trend Analysis");
    let chart_width = PAGE_WIDTH - 2.0 * MARGIN;
    let chart_height = chart_width * CHART_HEIGHT as f32 / CHART_WIDTH as f32;
    let chart_bottom = PAGE_HEIGHT - 70.0 - chart_height;
    page.image("Im1", MARGIN, chart_bottom, chart_width, chart_height);
    if export.snapshot.sales_trend.is_empty() {
        page.text(
            Font::Regular,
            10.0,
            MUTED,
            MARGIN,
            chart_bottom - 16.0,
            "No sales recorded in this period",
        );
    }

    let mut y = chart_bottom - 50.0;
    page.text(Font::Bold, 16.0, TEXT, MARGIN, y, "Category Distribution");
    y -= 30.0;

    let bars = category_bars(export.snapshot);
    if bars.is_empty() {
        page.text(Font::Regular, 10.0, MUTED, MARGIN, y, "No categories found");
    }

    for bar in &bars {
        if y < FOOTER_LIMIT {
            pages.push(std::mem::take(&mut page));
            page.text(
                Font::Bold,
                16.0,
                TEXT,
                MARGIN,
                PAGE_HEIGHT - 52.0,
                "Category Distribution (continued)",
            );
            y = PAGE_HEIGHT - 82.0;
        }
        category_row(&mut page, bar, y);
        y -= CATEGORY_ROW_HEIGHT;
    }

    pages.push(page);
    pages
}

fn footer(page: &mut PageCanvas, number: usize, total: usize, notice: &str) {
    page.rect(PANEL, MARGIN, 50.0, PAGE_WIDTH - 2.0 * MARGIN, 0.75);
    page.text(Font::Regular, 8.0, MUTED, MARGIN, 32.0, notice);
    page.text(
        Font::Regular,
        8.0,
        MUTED,
        PAGE_WIDTH - MARGIN - 60.0,
        32.0,
        &format!("Page {} of {}", number, total),
    );
}

fn lopdf_error(e: lopdf::Error) -> AppError {
    AppError::ExportFailed(e.to_string())
}

/// Render the report to PDF bytes
pub fn render_pdf(export: &ReportExport, settings: &ReportingConfig) -> AppResult<Vec<u8>> {
    let mut pages = vec![summary_page(export, settings)];
    pages.extend(analysis_pages(export));
    let total = pages.len();
    for (i, page) in pages.iter_mut().enumerate() {
        footer(page, i + 1, total, &settings.confidentiality_notice);
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });

    let chart = render_trend_chart(&export.snapshot.sales_trend);
    let (width, height) = chart.dimensions();
    let chart_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        chart.into_raw(),
    ));

    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
        "XObject" => dictionary! {
            "Im1" => chart_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(total);
    for page in pages {
        let content = Content {
            operations: page.ops,
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().map_err(lopdf_error)?,
        ));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => total as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
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
        .map_err(|e| AppError::ExportFailed(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use shared::models::{CategoryShare, TrendPoint};

    fn snapshot(categories: usize) -> MetricSnapshot {
        MetricSnapshot {
            total_sales: Decimal::from(175),
            order_count: 3,
            average_order_value: Decimal::new(5833, 2),
            buyer_count: 2,
            seller_count: 4,
            buyer_engagement: 1,
            seller_engagement: 50,
            sales_trend: vec![TrendPoint {
                name: "14:00".to_string(),
                sales: Decimal::from(175),
                orders: 3,
            }],
            top_categories: (0..categories)
                .map(|i| CategoryShare {
                    name: format!("Category {}", i),
                    percentage: 5,
                    stock_count: 10,
                })
                .collect(),
            ..MetricSnapshot::default()
        }
    }

    fn generated_at() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(330 * 60)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 31, 18, 30, 0)
            .unwrap()
    }

    fn render(snapshot: &MetricSnapshot) -> Document {
        let export = ReportExport {
            snapshot,
            range: TrendRange::Yearly,
            month: MonthFilter::Month(3),
            generated_at: generated_at(),
        };
        let bytes = render_pdf(&export, &ReportingConfig::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        Document::load_mem(&bytes).unwrap()
    }

    #[test]
    fn test_report_has_summary_and_analysis_pages() {
        let doc = render(&snapshot(3));
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_empty_report_still_renders() {
        let doc = render(&MetricSnapshot::default());
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_long_category_list_overflows() {
        let doc = render(&snapshot(40));
        assert!(doc.get_pages().len() > 2);
    }
}
