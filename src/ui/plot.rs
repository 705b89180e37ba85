use std::f32::consts::TAU;

use eframe::egui::{self, Color32, Pos2, RichText, Sense, Shape, Stroke, Ui};
use egui_plot::{Bar, BarChart, Plot};

use crate::color::{red_yellow_green, ColorMap};
use crate::data::charts::{Bucket, CategoryCount, CountryMeans, GroupMean};
use crate::format::usd;

const CHART_HEIGHT: f32 = 280.0;
const BAR_COLOR: Color32 = Color32::from_rgb(0x4C, 0x78, 0xA8);

// ---------------------------------------------------------------------------
// Top job titles (horizontal bars)
// ---------------------------------------------------------------------------

pub fn top_job_titles(ui: &mut Ui, means: &[GroupMean]) {
    ui.label(RichText::new(format!("Top {} job titles by mean salary", means.len())).strong());

    let bars: Vec<Bar> = means
        .iter()
        .enumerate()
        .map(|(i, g)| {
            Bar::new(i as f64, g.mean)
                .name(format!("{}: {}", g.group, usd(g.mean)))
                .fill(BAR_COLOR)
                .width(0.7)
        })
        .collect();
    let labels: Vec<String> = means.iter().map(|g| g.group.clone()).collect();

    Plot::new("top_job_titles")
        .height(CHART_HEIGHT)
        .x_axis_label("Mean annual salary (USD)")
        .y_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

/// Axis tick label for integer positions of a categorical axis.
fn category_label(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Salary histogram
// ---------------------------------------------------------------------------

pub fn salary_histogram(ui: &mut Ui, buckets: &[Bucket]) {
    ui.label(RichText::new("Annual salary distribution").strong());

    let bars: Vec<Bar> = buckets
        .iter()
        .map(|b| {
            let width = if b.width() > 0.0 { b.width() } else { 1.0 };
            Bar::new(b.center(), b.count as f64)
                .width(width)
                .name(format!("{} – {}: {}", usd(b.lower), usd(b.upper), b.count))
                .fill(BAR_COLOR)
        })
        .collect();

    Plot::new("salary_histogram")
        .height(CHART_HEIGHT)
        .x_axis_label("Salary range (USD)")
        .y_axis_label("Count")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Remote-work donut
// ---------------------------------------------------------------------------

/// Angular extent of one donut slice, in radians from the 12 o'clock position.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub start: f32,
    pub end: f32,
}

/// Lay out slices proportionally to `share`, clockwise and contiguous.
pub fn donut_slices(counts: &[CategoryCount]) -> Vec<Slice> {
    let mut start = 0.0_f32;
    counts
        .iter()
        .map(|c| {
            let end = start + c.share as f32 * TAU;
            let slice = Slice { start, end };
            start = end;
            slice
        })
        .collect()
}

pub fn remote_donut(ui: &mut Ui, counts: &[CategoryCount], colors: Option<&ColorMap>) {
    ui.label(RichText::new("Share of remote work types").strong());

    let color_of = |c: &CategoryCount| {
        colors.map_or(BAR_COLOR, |m| m.color_for_text(&c.value))
    };

    ui.horizontal(|ui: &mut Ui| {
        let size = CHART_HEIGHT.min(ui.available_width() * 0.6);
        let (rect, _) = ui.allocate_exact_size(egui::vec2(size, size), Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let outer = size / 2.0 - 4.0;
        let inner = outer * 0.5;
        // 12 o'clock, clockwise in screen coordinates.
        let at = |r: f32, a: f32| -> Pos2 {
            let a = a - TAU / 4.0;
            center + egui::vec2(a.cos(), a.sin()) * r
        };

        for (count, slice) in counts.iter().zip(donut_slices(counts)) {
            let color = color_of(count);
            let steps = ((slice.end - slice.start) / (TAU / 96.0)).ceil().max(1.0) as usize;
            let step = (slice.end - slice.start) / steps as f32;
            for i in 0..steps {
                let a0 = slice.start + step * i as f32;
                let a1 = a0 + step;
                painter.add(Shape::convex_polygon(
                    vec![at(outer, a0), at(outer, a1), at(inner, a1), at(inner, a0)],
                    color,
                    Stroke::NONE,
                ));
            }
        }

        ui.vertical(|ui: &mut Ui| {
            for c in counts {
                ui.label(
                    RichText::new(format!("■ {} – {:.1}% ({})", c.value, c.share * 100.0, c.count))
                        .color(color_of(c)),
                );
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Country means for one job title
// ---------------------------------------------------------------------------

pub fn country_means(ui: &mut Ui, means: &CountryMeans) {
    let (job_title, countries) = match means {
        CountryMeans::NoMatch { job_title } => {
            super::panels::warning(
                ui,
                &format!("Job title '{job_title}' not found for the selected filters."),
            );
            return;
        }
        CountryMeans::Means { job_title, countries } => (job_title, countries),
    };

    ui.label(RichText::new(format!("Mean salary of {job_title} by country")).strong());

    let lo = countries.iter().map(|c| c.mean).fold(f64::INFINITY, f64::min);
    let hi = countries.iter().map(|c| c.mean).fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;

    let bars: Vec<Bar> = countries
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let t = if span > 0.0 { (c.mean - lo) / span } else { 1.0 };
            Bar::new(i as f64, c.mean)
                .name(format!("{}: {}", c.group, usd(c.mean)))
                .fill(red_yellow_green(t))
                .width(0.7)
        })
        .collect();
    let labels: Vec<String> = countries.iter().map(|c| c.group.clone()).collect();

    Plot::new("country_means")
        .height(CHART_HEIGHT)
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .y_axis_label("Mean salary (USD)")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(value: &str, share: f64) -> CategoryCount {
        CategoryCount {
            value: value.to_string(),
            count: 0,
            share,
        }
    }

    #[test]
    fn slices_cover_the_circle() {
        let slices = donut_slices(&[count("remoto", 0.5), count("hibrido", 0.25), count("presencial", 0.25)]);
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].start, 0.0);
        assert_eq!(slices[1].start, slices[0].end);
        assert!((slices[2].end - TAU).abs() < 1e-5);
    }

    #[test]
    fn category_labels_only_on_integer_ticks() {
        let labels = vec!["BRA".to_string(), "USA".to_string()];
        assert_eq!(category_label(&labels, 1.0), "USA");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 7.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }
}
