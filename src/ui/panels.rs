use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – group selector
// ---------------------------------------------------------------------------

/// Render the left group-selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Groups");
    ui.separator();

    let Some(session) = &state.session else {
        ui.label("No dataset loaded.");
        return;
    };
    let labels = session.group_labels().to_vec();

    ui.label(format!("Select groups to compare ({}):", session.records.group_column()));

    ScrollArea::vertical()
        .id_salt("group_list")
        .max_height(ui.available_height() * 0.55)
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            for label in &labels {
                let mut checked = state.is_selected(label);
                let text = match state.selection.iter().position(|g| g == label) {
                    Some(pos) => format!("{label}  #{}", pos + 1),
                    None => label.clone(),
                };
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_group(label);
                }
            }
        });

    ui.separator();

    let n_selected = state.selection.len();
    ui.horizontal_wrapped(|ui: &mut Ui| {
        if ui
            .add_enabled(n_selected > 0, egui::Button::new("Compare Selected"))
            .clicked()
        {
            if let Err(e) = state.show_comparison() {
                state.status_message = Some(e.to_string());
            }
        }
        if ui
            .add_enabled(n_selected == 1, egui::Button::new("Single View"))
            .clicked()
        {
            if let Err(e) = state.show_single() {
                state.status_message = Some(e.to_string());
            }
        }
        if ui
            .add_enabled(n_selected > 0, egui::Button::new("Clear Selection"))
            .clicked()
        {
            state.clear_selection();
        }
    });

    ui.add_space(8.0);
    statistics(ui, state);
}

/// Sample size of every selected group.
fn statistics(ui: &mut Ui, state: &AppState) {
    ui.strong("Statistics");
    ui.separator();

    let sizes = state.sample_sizes();
    if sizes.is_empty() {
        ui.label("Select groups to see sample sizes");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::remainder())
        .column(Column::auto())
        .header(18.0, |mut header| {
            header.col(|ui| {
                ui.strong("Group");
            });
            header.col(|ui| {
                ui.strong("Samples");
            });
        })
        .body(|mut body| {
            for (group, n) in &sizes {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(group);
                    });
                    row.col(|ui| {
                        let text = RichText::new(n.to_string());
                        ui.label(if *n == 0 { text.color(Color32::RED) } else { text });
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(session) = &state.session {
            ui.label(session.summary());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open EEG band-power table")
        .add_filter("Supported files", &["csv", "tsv", "tab", "parquet", "pq", "json"])
        .add_filter("CSV / TSV", &["csv", "tsv", "tab"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
