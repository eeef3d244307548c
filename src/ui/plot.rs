use std::collections::BTreeMap;
use std::f32::consts::{FRAC_PI_2, TAU};

use chrono::{Datelike, NaiveDate};
use eframe::egui::{self, Align2, Color32, FontId, RichText, ScrollArea, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points, VLine,
};

use session_analyzer::analysis::distribution::Histogram;
use session_analyzer::analysis::frequency::FrequencyTable;
use session_analyzer::analysis::paired::PairedSeries;
use session_analyzer::config::AnalyzerConfig;
use session_analyzer::report::SessionReport;

use crate::color;
use crate::ui::panels::unavailable;

/// Pie slices at or below this share get no percentage label.
const PIE_LABEL_MIN_PERCENT: f64 = 5.0;

// ---------------------------------------------------------------------------
// Top values: ranked summary, frequency table, pie chart
// ---------------------------------------------------------------------------

pub fn top_values(ui: &mut Ui, report: &SessionReport, config: &AnalyzerConfig) {
    let table = match &report.top_values {
        Ok(t) => t,
        Err(e) => return unavailable(ui, "Top Values", &e.to_string()),
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(format!("Top {} Values", config.top_values.top_k));
        for line in table.summary_lines(config.top_values.top_k) {
            ui.label(RichText::new(line).size(14.0));
        }
    });
    ui.separator();

    let shown = match config.top_values.table_rows {
        Some(n) => table.top(n),
        None => &table.entries[..],
    };
    ScrollArea::vertical()
        .id_salt("frequency_table")
        .max_height(220.0)
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("frequency_grid")
                .striped(true)
                .num_columns(3)
                .show(ui, |ui: &mut Ui| {
                    ui.strong(&table.column);
                    ui.strong("Count");
                    ui.strong("%");
                    ui.end_row();
                    for entry in shown {
                        ui.label(entry.value.to_string());
                        ui.label(entry.count.to_string());
                        ui.label(format!("{:.1}", entry.percentage));
                        ui.end_row();
                    }
                });
        });
    ui.separator();

    pie_chart(ui, table);
}

/// Pie of every value with a legend to its right.
fn pie_chart(ui: &mut Ui, table: &FrequencyTable) {
    if table.is_empty() {
        ui.label("No values to chart.");
        return;
    }
    ui.label(RichText::new(format!("Distribution of {}", table.column)).strong());

    let colors = color::generate_palette(table.entries.len());
    ui.horizontal(|ui: &mut Ui| {
        let side = ui.available_height().min(ui.available_width() * 0.6).max(120.0);
        let (response, painter) = ui.allocate_painter(egui::vec2(side, side), egui::Sense::hover());
        let center = response.rect.center();
        let radius = side * 0.45;
        let point = |angle: f32, r: f32| center + r * egui::vec2(angle.cos(), angle.sin());

        // Start at twelve o'clock and go clockwise.
        let mut start = -FRAC_PI_2;
        for (entry, &fill) in table.entries.iter().zip(&colors) {
            let sweep = TAU * (entry.percentage / 100.0) as f32;

            // Convex fans of at most a quarter turn each.
            let chunks = (sweep / FRAC_PI_2).ceil().max(1.0) as usize;
            for c in 0..chunks {
                let a0 = start + sweep * c as f32 / chunks as f32;
                let a1 = start + sweep * (c + 1) as f32 / chunks as f32;
                let steps = 16;
                let mut pts = vec![center];
                pts.extend((0..=steps).map(|s| point(a0 + (a1 - a0) * s as f32 / steps as f32, radius)));
                painter.add(egui::Shape::convex_polygon(pts, fill, Stroke::NONE));
            }
            painter.line_segment([center, point(start, radius)], Stroke::new(1.0, Color32::WHITE));

            if entry.percentage > PIE_LABEL_MIN_PERCENT {
                painter.text(
                    point(start + sweep / 2.0, radius * 0.65),
                    Align2::CENTER_CENTER,
                    format!("{:.1}%", entry.percentage),
                    FontId::proportional(12.0),
                    Color32::BLACK,
                );
            }
            start += sweep;
        }

        ScrollArea::vertical()
            .id_salt("pie_legend")
            .show(ui, |ui: &mut Ui| {
                ui.strong(&table.column);
                for (entry, &c) in table.entries.iter().zip(&colors) {
                    ui.horizontal(|ui: &mut Ui| {
                        ui.label(RichText::new("■").color(c));
                        ui.label(entry.value.to_string());
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Entries over time
// ---------------------------------------------------------------------------

fn date_to_x(d: NaiveDate) -> f64 {
    d.num_days_from_ce() as f64
}

fn x_to_date(x: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

pub fn entries_over_time(ui: &mut Ui, report: &SessionReport) {
    let series = match &report.entries_over_time {
        Ok(s) => s,
        Err(e) => return unavailable(ui, "Number of entries per week", &e.to_string()),
    };

    ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui: &mut Ui| {
        ui.label(series.average_label());
    });
    if series.buckets.is_empty() {
        return unavailable(ui, "Number of entries per week", "No rows with a valid date");
    }

    let points: Vec<[f64; 2]> = series
        .buckets
        .iter()
        .map(|b| [date_to_x(b.week_start), b.entry_count as f64])
        .collect();
    let durations: BTreeMap<i64, Option<f64>> = series
        .buckets
        .iter()
        .map(|b| (date_to_x(b.week_start) as i64, b.mean_duration))
        .collect();

    Plot::new("entries_per_week")
        .x_axis_label("Week start date")
        .y_axis_label("Count")
        .x_axis_formatter(|mark, _range| {
            x_to_date(mark.value)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        })
        .label_formatter(move |_name, value| {
            let Some(date) = x_to_date(value.x) else {
                return String::new();
            };
            let mean = durations
                .get(&(value.x.round() as i64))
                .copied()
                .flatten()
                .map(|m| format!("\nmean duration: {m:.1} min"))
                .unwrap_or_default();
            format!("week of {}\n{:.0} entries{mean}", date.format("%Y-%m-%d"), value.y)
        })
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .name("Entries")
                    .width(2.0),
            );
            plot_ui.points(Points::new(PlotPoints::from(points)).radius(4.0));
        });
}

// ---------------------------------------------------------------------------
// Histograms
// ---------------------------------------------------------------------------

/// Bars of `hist` coloured by `colors`, with mean and median markers.
fn histogram_plot(
    ui: &mut Ui,
    id: &str,
    hist: &Histogram,
    colors: &[Color32],
    x_label: &str,
    height: f32,
) {
    let bars: Vec<Bar> = hist
        .bars()
        .zip(colors.iter().copied().chain(std::iter::repeat(Color32::GRAY)))
        .map(|((left, width, count), fill)| {
            Bar::new(left + width / 2.0, count as f64)
                .width(width)
                .fill(fill)
                .stroke(Stroke::new(1.0, Color32::BLACK))
        })
        .collect();
    let (lo, hi) = hist.display_range();
    let mean = hist.summary.mean;
    let median = hist.summary.median;

    Plot::new(id.to_string())
        .height(height)
        .legend(Legend::default())
        .x_axis_label(x_label.to_string())
        .y_axis_label("Count")
        .include_x(lo)
        .include_x(hi)
        .include_y(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
            plot_ui.vline(
                VLine::new(mean)
                    .color(Color32::from_rgb(40, 70, 220))
                    .width(2.0)
                    .name(format!("Mean: {mean:.2}")),
            );
            plot_ui.vline(
                VLine::new(median)
                    .color(Color32::from_rgb(150, 40, 170))
                    .width(2.0)
                    .name(format!("Median: {median:.2}")),
            );
        });
}

pub fn quality_histogram(ui: &mut Ui, report: &SessionReport) {
    let hist = match &report.quality_histogram {
        Ok(h) => h,
        Err(e) => return unavailable(ui, "Qualite Score Histogram", &e.to_string()),
    };
    ui.heading(format!("{} Distribution", hist.column));
    ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui: &mut Ui| {
        ui.label(format!(
            "Mean: {:.3}    Median: {:.3}",
            hist.summary.mean, hist.summary.median
        ));
    });
    let colors = color::cool_to_warm(hist.counts.len());
    let height = ui.available_height();
    histogram_plot(ui, "quality_histogram", hist, &colors, "Score", height);
}

pub fn grades(ui: &mut Ui, report: &SessionReport) {
    let title = "Practitioner Grade Distribution (0-5)";
    let hist = match &report.grades {
        Ok(h) => h,
        Err(e) => return unavailable(ui, title, &e.to_string()),
    };
    ui.heading(title);
    let colors = color::red_to_green(hist.counts.len());
    let height = (ui.available_height() - 40.0).max(150.0);
    histogram_plot(ui, "grade_histogram", hist, &colors, "Grade", height);

    let s = &hist.summary;
    let std_dev = s
        .std_dev
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "n/a".to_string());
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(
            RichText::new(format!(
                "Total Grades: {}  |  Mean: {:.2}  |  Median: {:.2}  |  Std Dev: {std_dev}  |  \
                 Range: [{:.2} - {:.2}]",
                s.count, s.mean, s.median, s.min, s.max
            ))
            .size(14.0),
        );
    });
}

// ---------------------------------------------------------------------------
// Paired comparison
// ---------------------------------------------------------------------------

const PATIENT_LABEL: &str = "Patient";
const PROFESSIONAL_LABEL: &str = "Professional";

fn series_bars(series: &PairedSeries, name: &str, color: Color32) -> Option<BarChart> {
    let hist = series.histogram.as_ref()?;
    let bars = hist
        .bars()
        .map(|(left, width, count)| Bar::new(left + width / 2.0, count as f64).width(width))
        .collect();
    Some(BarChart::new(bars).name(name).color(color.gamma_multiply(0.6)))
}

fn series_box(series: &PairedSeries, x: f64, name: &str, color: Color32) -> Option<BoxElem> {
    let b = series.boxplot.as_ref()?;
    Some(
        BoxElem::new(
            x,
            BoxSpread::new(b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker),
        )
        .name(name)
        .fill(color.gamma_multiply(0.3))
        .stroke(Stroke::new(1.5, color))
        .box_width(0.5),
    )
}

pub fn interactions(ui: &mut Ui, report: &SessionReport) {
    let cmp = match &report.interactions {
        Ok(c) => c,
        Err(e) => return unavailable(ui, "Interactions by Session", &e.to_string()),
    };

    ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui: &mut Ui| {
        ui.label(cmp.stats.summary_line(PATIENT_LABEL, PROFESSIONAL_LABEL));
    });

    let half = (ui.available_height() / 2.0 - 10.0).max(120.0);

    ui.label(RichText::new("Interactions by Session").strong());
    Plot::new("interactions_by_session")
        .height(half)
        .legend(Legend::default())
        .x_axis_label("Session")
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            let sides = [
                (&cmp.a, PATIENT_LABEL, color::SERIES_A),
                (&cmp.b, PROFESSIONAL_LABEL, color::SERIES_B),
            ];
            for (series, name, c) in sides {
                let points: PlotPoints = series
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| [i as f64, v])
                    .collect();
                plot_ui.line(Line::new(points).name(name).color(c).width(1.5));
            }
        });

    ui.columns(2, |cols| {
        cols[0].label(RichText::new("Distribution Comparison").strong());
        Plot::new("interactions_distribution")
            .legend(Legend::default())
            .x_axis_label("Count")
            .y_axis_label("Frequency")
            .show(&mut cols[0], |plot_ui| {
                for chart in [
                    series_bars(&cmp.a, PATIENT_LABEL, color::SERIES_A),
                    series_bars(&cmp.b, PROFESSIONAL_LABEL, color::SERIES_B),
                ]
                .into_iter()
                .flatten()
                {
                    plot_ui.bar_chart(chart);
                }
            });

        cols[1].label(RichText::new("Boxplot Comparison").strong());
        Plot::new("interactions_boxplot")
            .legend(Legend::default())
            .y_axis_label("Count")
            .show_x(false)
            .show(&mut cols[1], |plot_ui| {
                let sides = [
                    (&cmp.a, 1.0, PATIENT_LABEL, color::SERIES_A),
                    (&cmp.b, 2.0, PROFESSIONAL_LABEL, color::SERIES_B),
                ];
                for (series, x, name, c) in sides {
                    if let Some(elem) = series_box(series, x, name, c) {
                        plot_ui.box_plot(BoxPlot::new(vec![elem]).name(name).color(c));
                    }
                    if let Some(b) = &series.boxplot {
                        if !b.outliers.is_empty() {
                            let pts: PlotPoints = b.outliers.iter().map(|&v| [x, v]).collect();
                            plot_ui.points(Points::new(pts).color(c).radius(3.0));
                        }
                    }
                }
            });
    });
}
