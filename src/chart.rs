//! Bar charts of category totals, as an SVG document or as text for the terminal.

use crate::aggregate::CategoryTotals;
use crate::{utils, Result};
use std::path::Path;
use svg::node::element::{Line, Rectangle, Text};
use svg::Document;

/// Shown instead of a chart when there is nothing to draw.
pub const NO_EXPENSES: &str = "No expenses to chart.";

const TITLE: &str = "Expenses by Category";
const X_LABEL: &str = "Categories";
const Y_LABEL: &str = "Amount ($)";

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 110.0;
const Y_TICKS: usize = 5;
const BAR_FILL: &str = "steelblue";

/// One bar per category, height equal to the category total.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    bars: Vec<(String, f64)>,
}

impl BarChart {
    pub fn from_totals(totals: &CategoryTotals) -> Self {
        Self {
            bars: totals
                .iter()
                .map(|e| (e.category().to_string(), e.total().to_f64()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// The value range covered by the y axis. Zero is always inside it.
    fn range(&self) -> (f64, f64) {
        let (min, max) = self
            .bars
            .iter()
            .fold((0.0_f64, 0.0_f64), |(min, max), (_, v)| {
                (min.min(*v), max.max(*v))
            });
        if max == min {
            (min, min + 1.0)
        } else {
            (min, max)
        }
    }

    /// Draws the chart with a dashed horizontal grid and category labels under each bar.
    pub fn to_svg(&self) -> Document {
        let (ymin, ymax) = self.range();
        let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let resize_y = |y: f64| MARGIN_TOP + (ymax - y) / (ymax - ymin) * plot_height;
        let slot = plot_width / self.bars.len().max(1) as f64;

        let mut document = Document::new()
            .set("viewBox", (0.0, 0.0, WIDTH, HEIGHT))
            .set("width", WIDTH)
            .set("height", HEIGHT)
            .set("font-family", "sans-serif")
            .add(
                Text::new()
                    .set("x", WIDTH / 2.0)
                    .set("y", MARGIN_TOP / 2.0)
                    .set("text-anchor", "middle")
                    .set("font-size", 18)
                    .add(svg::node::Text::new(TITLE)),
            );

        for tick in 0..=Y_TICKS {
            let value = ymin + (ymax - ymin) * tick as f64 / Y_TICKS as f64;
            let y = resize_y(value);
            document = document
                .add(
                    Line::new()
                        .set("x1", MARGIN_LEFT)
                        .set("x2", MARGIN_LEFT + plot_width)
                        .set("y1", y)
                        .set("y2", y)
                        .set("stroke", "gray")
                        .set("stroke-dasharray", "4 4")
                        .set("stroke-opacity", 0.6),
                )
                .add(
                    Text::new()
                        .set("x", MARGIN_LEFT - 8.0)
                        .set("y", y + 4.0)
                        .set("text-anchor", "end")
                        .set("font-size", 11)
                        .add(svg::node::Text::new(format_num::format_num!(",.2", value))),
                );
        }

        for (ix, (category, value)) in self.bars.iter().enumerate() {
            let x = MARGIN_LEFT + ix as f64 * slot + slot * 0.1;
            let top = resize_y(value.max(0.0));
            let height = (resize_y(*value) - resize_y(0.0)).abs();
            let label_x = x + slot * 0.4;
            let label_y = MARGIN_TOP + plot_height + 16.0;
            document = document
                .add(
                    Rectangle::new()
                        .set("x", x)
                        .set("y", top)
                        .set("width", slot * 0.8)
                        .set("height", height)
                        .set("fill", BAR_FILL),
                )
                .add(
                    Text::new()
                        .set("x", label_x)
                        .set("y", label_y)
                        .set("text-anchor", "end")
                        .set("font-size", 12)
                        .set("transform", format!("rotate(-30 {label_x} {label_y})"))
                        .add(svg::node::Text::new(category.as_str())),
                );
        }

        let axis = |x1: f64, y1: f64, x2: f64, y2: f64| {
            Line::new()
                .set("x1", x1)
                .set("y1", y1)
                .set("x2", x2)
                .set("y2", y2)
                .set("stroke", "black")
                .set("stroke-width", 1.5)
        };
        let zero = resize_y(0.0);
        let y_label_x = MARGIN_LEFT / 4.0;
        let y_label_y = MARGIN_TOP + plot_height / 2.0;
        document
            .add(axis(
                MARGIN_LEFT,
                MARGIN_TOP,
                MARGIN_LEFT,
                MARGIN_TOP + plot_height,
            ))
            .add(axis(MARGIN_LEFT, zero, MARGIN_LEFT + plot_width, zero))
            .add(
                Text::new()
                    .set("x", MARGIN_LEFT + plot_width / 2.0)
                    .set("y", HEIGHT - 10.0)
                    .set("text-anchor", "middle")
                    .set("font-size", 14)
                    .add(svg::node::Text::new(X_LABEL)),
            )
            .add(
                Text::new()
                    .set("x", y_label_x)
                    .set("y", y_label_y)
                    .set("text-anchor", "middle")
                    .set("font-size", 14)
                    .set("transform", format!("rotate(-90 {y_label_x} {y_label_y})"))
                    .add(svg::node::Text::new(Y_LABEL)),
            )
    }

    /// Writes the SVG chart to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        utils::write(path, self.to_svg().to_string())
    }

    /// Horizontal bars scaled so the largest magnitude fills `width` characters. Negative totals
    /// are drawn with `-` instead of `#`.
    pub fn to_terminal(&self, width: usize) -> String {
        let label_width = self
            .bars
            .iter()
            .map(|(c, _)| c.chars().count())
            .max()
            .unwrap_or(0);
        let largest = self.bars.iter().map(|(_, v)| v.abs()).fold(0.0, f64::max);

        self.bars
            .iter()
            .map(|(category, value)| {
                let len = if largest > 0.0 {
                    (value.abs() / largest * width as f64).round() as usize
                } else {
                    0
                };
                let fill = if *value < 0.0 { "-" } else { "#" };
                format!(
                    "{category:<label_width$} | {} {}",
                    fill.repeat(len),
                    format_num::format_num!(",.2", *value)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
