use chrono::{Datelike, NaiveDate};
use eframe::egui::Ui;
use egui_plot::{GridInput, GridMark, Line, LineStyle, Plot, PlotBounds, PlotPoints};

use crate::color::ColorMap;
use crate::data::project::{ACTUAL_VALUES_LABEL, ChartSpec, PlotLine};

// ---------------------------------------------------------------------------
// Forecast plot (central panel)
// ---------------------------------------------------------------------------

/// Dates are plotted as days since the common era, which round-trips through
/// chrono for axis labels.
fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn x_to_label(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Render a chart specification in the central panel.
pub fn forecast_plot(ui: &mut Ui, spec: &ChartSpec, colors: &ColorMap) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(&spec.title);
    });

    let axis = spec.axis;
    let mut plot = Plot::new("forecast_plot")
        .legend(egui_plot::Legend::default())
        .x_axis_label("Date")
        .y_axis_label("Value")
        .x_axis_formatter(|mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
            x_to_label(mark.value)
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    if let Some(axis) = axis {
        let step = axis.y_tick_step;
        plot = plot.y_grid_spacer(move |input: GridInput| {
            let (lo, hi) = input.bounds;
            let mut marks = Vec::new();
            let mut v = (lo / step).floor() * step;
            while v <= hi {
                marks.push(GridMark {
                    value: v,
                    step_size: step,
                });
                v += step;
            }
            marks
        });
    }

    let x_bounds = spec
        .lines
        .iter()
        .flat_map(|l| l.points.iter().map(|(d, _)| date_to_x(*d)))
        .fold(None::<(f64, f64)>, |acc, x| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
        });

    plot.show(ui, |plot_ui| {
        // Fixed axis policy: floor at zero, ceiling snapped to the tick unit.
        if let (Some(axis), Some((x_lo, x_hi))) = (axis, x_bounds) {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                [x_lo, axis.y_min],
                [x_hi, axis.y_max],
            ));
        }

        for line in &spec.lines {
            draw_line(plot_ui, line, colors);
        }
    });
}

/// Draw one spec line, splitting on nulls so gaps stay gaps. Only the first
/// segment carries the legend name to avoid duplicate entries.
fn draw_line(plot_ui: &mut egui_plot::PlotUi, line: &PlotLine, colors: &ColorMap) {
    let color = if line.dashed {
        colors.color_for(&line.label)
    } else {
        ColorMap::GROUND_TRUTH
    };

    let mut named = false;
    for segment in segments(line) {
        if segment.is_empty() {
            continue;
        }
        let points: PlotPoints = segment.into_iter().collect();
        let mut plotted = Line::new(points).color(color).width(2.0);
        if line.dashed {
            plotted = plotted.style(LineStyle::dashed_loose());
        }
        if !named {
            plotted = plotted.name(&line.label);
            named = true;
        }
        plot_ui.line(plotted);
    }
    // A fully-null line still deserves its legend entry.
    if !named && line.label == ACTUAL_VALUES_LABEL {
        plot_ui.line(Line::new(PlotPoints::new(Vec::new())).name(&line.label));
    }
}

/// Runs of consecutive non-null points.
fn segments(line: &PlotLine) -> Vec<Vec<[f64; 2]>> {
    let mut out = Vec::new();
    let mut current: Vec<[f64; 2]> = Vec::new();
    for (date, value) in &line.points {
        match value {
            Some(v) => current.push([date_to_x(*date), *v]),
            None => {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_axis_mapping_round_trips() {
        let d = date(2024, 2, 29);
        assert_eq!(x_to_label(date_to_x(d)), "2024-02-29");
    }

    #[test]
    fn nulls_split_a_line_into_segments() {
        let line = PlotLine {
            label: "m".into(),
            points: vec![
                (date(2024, 1, 1), Some(1.0)),
                (date(2024, 1, 2), None),
                (date(2024, 1, 3), Some(3.0)),
                (date(2024, 1, 4), Some(4.0)),
            ],
            dashed: true,
        };
        let segs = segments(&line);
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].len(), 1);
        assert_eq!(segs[1].len(), 2);
    }

    #[test]
    fn all_null_line_has_no_segments() {
        let line = PlotLine {
            label: "m".into(),
            points: vec![(date(2024, 1, 1), None), (date(2024, 1, 2), None)],
            dashed: true,
        };
        assert!(segments(&line).is_empty());
    }
}
