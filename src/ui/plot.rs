use eframe::egui::Ui;
use egui_plot::{Legend, Line, MarkerShape, Plot, PlotPoints, Points, uniform_grid_spacer};

use crate::data::aggregate::{BandPanel, Series};
use crate::state::{AppState, PlotView};

/// Room taken by a subplot's title row.
const TITLE_HEIGHT: f32 = 22.0;

// ---------------------------------------------------------------------------
// Band grid (central panel)
// ---------------------------------------------------------------------------

/// Render the 2×3 grid of band plots in the central panel.
pub fn band_grid(ui: &mut Ui, state: &AppState) {
    if state.session.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to compare groups  (File → Open…)");
        });
        return;
    }
    let Some(view) = &state.view else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Select groups on the left, then press Compare Selected");
        });
        return;
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(&view.title);
    });

    let spacing = ui.spacing().item_spacing.y;
    let cell_height = ((ui.available_height() - spacing) / 2.0).max(120.0);

    for (row, panels) in view.comparison.panels.chunks(3).enumerate() {
        ui.columns(3, |cols: &mut [Ui]| {
            for (col, (col_ui, panel)) in cols.iter_mut().zip(panels).enumerate() {
                let first = row == 0 && col == 0;
                band_plot(col_ui, panel, view, cell_height, first && view.legend);
            }
        });
    }
}

fn band_plot(ui: &mut Ui, panel: &BandPanel, view: &PlotView, height: f32, legend: bool) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.strong(panel.band.title());
    });

    let electrodes: Vec<String> = panel.electrodes().into_iter().map(str::to_string).collect();
    let hover_electrodes = electrodes.clone();

    let mut plot = Plot::new(("band_plot", panel.band, view.generation))
        .height((height - TITLE_HEIGHT).max(80.0))
        .x_axis_label("Electrode")
        .y_axis_label("Amplitude")
        .show_grid(true)
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .x_axis_formatter(move |mark, _range| electrode_label(&electrodes, mark.value))
        .label_formatter(move |name, point| {
            let electrode = electrode_label(&hover_electrodes, point.x.round());
            if name.is_empty() {
                format!("{electrode}\n{:.3}", point.y)
            } else {
                format!("{name}\n{electrode}: {:.3}", point.y)
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true);

    if legend {
        plot = plot.legend(Legend::default());
    }

    plot.show(ui, |plot_ui| {
        for series in &panel.series {
            let color = view.colors.color_for(&series.group);
            let name = if series.rows == 0 {
                format!("{} (no rows)", series.group)
            } else {
                series.group.clone()
            };

            // Keep the legend entry for groups without any value.
            if !series.has_values() {
                plot_ui.line(Line::new(PlotPoints::new(Vec::new())).name(&name).color(color));
                continue;
            }

            let segments = segments(series);
            let markers: Vec<[f64; 2]> = segments.iter().flatten().copied().collect();
            for segment in segments {
                plot_ui.line(
                    Line::new(PlotPoints::new(segment))
                        .name(&name)
                        .color(color)
                        .width(1.5),
                );
            }
            plot_ui.points(
                Points::new(PlotPoints::new(markers))
                    .name(&name)
                    .color(color)
                    .shape(MarkerShape::Circle)
                    .radius(3.0),
            );
        }
    });
}

/// Split a series into runs of defined means, as `[electrode index, mean]`.
/// Undefined means end a run, leaving a gap in the drawn line.
fn segments(series: &Series) -> Vec<Vec<[f64; 2]>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (i, point) in series.points.iter().enumerate() {
        match point.mean {
            Some(mean) => current.push([i as f64, mean]),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Tick label for an x position: the electrode at that integer index.
fn electrode_label(electrodes: &[String], x: f64) -> String {
    let idx = x.round();
    if idx < 0.0 || (x - idx).abs() > 1e-6 {
        return String::new();
    }
    electrodes.get(idx as usize).cloned().unwrap_or_default()
}
