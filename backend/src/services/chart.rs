//! Raster sales trend chart embedded in exported reports
//!
//! Bars show sales per bucket, the line on top shows order counts. Both are
//! scaled to their own maximum.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use rust_decimal::prelude::ToPrimitive;

use shared::models::TrendPoint;

pub const CHART_WIDTH: u32 = 800;
pub const CHART_HEIGHT: u32 = 400;

const MARGIN: u32 = 40;
const GRID_LINES: u32 = 4;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([226, 226, 234]);
const AXIS: Rgb<u8> = Rgb([90, 90, 100]);
pub const BAR: Rgb<u8> = Rgb([124, 58, 237]);
const LINE: Rgb<u8> = Rgb([16, 185, 129]);

/// Render the trend as an RGB image of `CHART_WIDTH` x `CHART_HEIGHT`
pub fn render_trend_chart(points: &[TrendPoint]) -> RgbImage {
    let mut img = RgbImage::from_pixel(CHART_WIDTH, CHART_HEIGHT, BACKGROUND);

    let left = MARGIN as f32;
    let right = (CHART_WIDTH - MARGIN) as f32;
    let top = MARGIN as f32;
    let bottom = (CHART_HEIGHT - MARGIN) as f32;
    let plot_height = bottom - top;

    for i in 1..=GRID_LINES {
        let y = bottom - plot_height * i as f32 / GRID_LINES as f32;
        draw_line_segment_mut(&mut img, (left, y), (right, y), GRID);
    }

    if !points.is_empty() {
        let sales: Vec<f64> = points
            .iter()
            .map(|p| p.sales.to_f64().unwrap_or(0.0).max(0.0))
            .collect();
        let max_sales = sales.iter().cloned().fold(0.0, f64::max);
        let max_orders = points.iter().map(|p| p.orders).max().unwrap_or(0);

        let slot = (right - left) / points.len() as f32;
        let bar_width = ((slot * 0.6) as u32).max(1);

        let mut previous: Option<(f32, f32)> = None;
        for (i, (point, value)) in points.iter().zip(&sales).enumerate() {
            let centre = left + slot * (i as f32 + 0.5);

            if max_sales > 0.0 {
                let height = (value / max_sales * plot_height as f64) as u32;
                if height > 0 {
                    let x = (centre - bar_width as f32 / 2.0) as i32;
                    let y = bottom as i32 - height as i32;
                    draw_filled_rect_mut(&mut img, Rect::at(x, y).of_size(bar_width, height), BAR);
                }
            }

            let ratio = if max_orders == 0 {
                0.0
            } else {
                point.orders as f32 / max_orders as f32
            };
            let current = (centre, bottom - plot_height * ratio);
            if let Some(prev) = previous {
                draw_line_segment_mut(&mut img, prev, current, LINE);
            }
            previous = Some(current);
        }
    }

    // Axes last so bars never cover them
    draw_line_segment_mut(&mut img, (left, top), (left, bottom), AXIS);
    draw_line_segment_mut(&mut img, (left, bottom), (right, bottom), AXIS);

    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn point(name: &str, sales: i64, orders: u64) -> TrendPoint {
        TrendPoint {
            name: name.to_string(),
            sales: Decimal::from(sales),
            orders,
        }
    }

    #[test]
    fn test_empty_chart_has_no_bars() {
        let img = render_trend_chart(&[]);
        assert_eq!(img.dimensions(), (CHART_WIDTH, CHART_HEIGHT));
        assert!(img.pixels().all(|p| *p != BAR));
    }

    #[test]
    fn test_tallest_bar_reaches_plot_top() {
        let img = render_trend_chart(&[point("January", 50, 1), point("February", 100, 3)]);

        // Second slot centre, just below the top margin
        let slot = (CHART_WIDTH - 2 * MARGIN) / 2;
        let x = MARGIN + slot + slot / 2;
        assert_eq!(*img.get_pixel(x, MARGIN + 2), BAR);

        // First bar is half as tall
        let x = MARGIN + slot / 2;
        assert_eq!(*img.get_pixel(x, MARGIN + 2), BACKGROUND);
        assert_eq!(*img.get_pixel(x, CHART_HEIGHT - MARGIN - 2), BAR);
    }
}
