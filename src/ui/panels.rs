use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use super::to_color32;
use crate::state::AppState;
use sleepscope::data::loader::Source;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dashboard) = &state.dashboard else {
        ui.label("No dataset loaded.");
        return;
    };
    let Some(session) = &state.session else {
        return;
    };

    // Clone what we need so we can mutate state below.
    let categories = dashboard.summary().categories.clone();
    let selected = session.state().selected.clone();
    let range = session.state().range;
    let scale = session.scale().clone();
    let applied = session.applied_bounds();
    let size_col = state.config.columns.size.clone();
    let step = state.config.slider.step;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Category selection ----
            let header = format!(
                "Feeding strategies  ({}/{})",
                selected.len(),
                categories.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("categories")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_none();
                        }
                    });

                    for cat in &categories {
                        let mut checked = selected.contains(&cat.value);
                        let color = state
                            .dashboard
                            .as_ref()
                            .map(|d| to_color32(d.dataset().color_of(&cat.value)))
                            .unwrap_or(Color32::GRAY);
                        let text = RichText::new(&cat.label).color(color);
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_category(&cat.value);
                        }
                    }
                });
            ui.separator();

            // ---- Log-scaled range ----
            ui.strong(format!("Range of values for {size_col}"));
            let (mut lo, mut hi) = (range.lo(), range.hi());
            let lo_changed = ui
                .add_enabled(
                    scale.enabled,
                    egui::Slider::new(&mut lo, 0.0..=1.0).step_by(step).text("from"),
                )
                .changed();
            let hi_changed = ui
                .add_enabled(
                    scale.enabled,
                    egui::Slider::new(&mut hi, 0.0..=1.0).step_by(step).text("to"),
                )
                .changed();
            if lo_changed || hi_changed {
                state.set_range(lo, hi);
            }

            // Tick labels follow the bounds of the current selection.
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for mark in &scale.marks {
                    ui.small(format!("{:.1}→{}", mark.position, mark.label));
                }
            });
            match applied {
                Ok(b) => {
                    ui.small(format!("Applied: {:.3} – {:.3}", b.min, b.max));
                }
                Err(e) => {
                    ui.small(RichText::new(e.to_string()).color(Color32::RED));
                }
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
            if ui.button("Reload from URL").clicked() {
                state.load_configured();
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(dash), Some(session)) = (&state.dashboard, &state.session) {
            let summary = dash.summary();
            ui.label(format!(
                "{} rows loaded ({} without category dropped), {} visible",
                summary.rows,
                summary.dropped,
                session.view().len()
            ));
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
        .set_title("Open dataset")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.load(&Source::Path(path));
    }
}
