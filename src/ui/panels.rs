use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{self, emath::Numeric, Color32, RichText, Ui};

use crate::data::export::{FILTERED_FILE, RECOMMENDATIONS_FILE};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Listings");
    ui.separator();

    let Some(bounds) = state.dataset.as_ref().map(|ds| ds.bounds) else {
        ui.label("No dataset loaded.");
        return;
    };

    let step = state.config.price_step;
    let mut changed = false;

    changed |= range_sliders(
        ui,
        "Price Range ($)",
        &mut state.controls.price,
        bounds.price,
        Some(step),
    );
    ui.add_space(6.0);
    changed |= range_sliders(
        ui,
        "Bedrooms",
        &mut state.controls.bedrooms,
        bounds.bedrooms,
        Some(1.0),
    );
    ui.add_space(6.0);
    changed |= range_sliders(
        ui,
        "Bathrooms",
        &mut state.controls.bathrooms,
        bounds.bathrooms,
        Some(0.25),
    );

    ui.add_space(8.0);
    if ui.button("🔄 Reset Filters").clicked() {
        state.reset_filters();
    } else if changed {
        state.refilter();
    }
}

/// A min and a max slider over `bounds`. Each handle's range stops at the
/// other handle, so the pair never inverts.
fn range_sliders<T: Numeric>(
    ui: &mut Ui,
    label: &str,
    value: &mut (T, T),
    bounds: (T, T),
    step: Option<f64>,
) -> bool {
    ui.strong(label);
    let (lo, hi) = bounds;
    let (mut min, mut max) = *value;
    let mut changed = false;

    let mut min_slider = egui::Slider::new(&mut min, lo..=max).text("min");
    if let Some(step) = step {
        min_slider = min_slider.step_by(step);
    }
    changed |= ui.add(min_slider).changed();

    let mut max_slider = egui::Slider::new(&mut max, min..=hi).text("max");
    if let Some(step) = step {
        max_slider = max_slider.step_by(step);
    }
    changed |= ui.add(max_slider).changed();

    if min == max {
        ui.label(RichText::new("single value selected").weak());
    }

    *value = (min, max);
    changed
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

        if let (Some(ds), Some(insights)) = (&state.dataset, &state.insights) {
            ui.label(format!(
                "{} listings loaded, {} visible",
                ds.len(),
                insights.view.len()
            ));
        }
        if let Some(path) = &state.source_path {
            ui.separator();
            ui.label(RichText::new(path.display().to_string()).weak());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open listings")
        .add_filter("Supported files", &["csv", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}

/// Which CSV artifact to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Recommendations,
    Filtered,
}

/// Ask for a destination and write the chosen export there.
pub fn save_export_dialog(state: &mut AppState, kind: ExportKind) {
    let default_name = match kind {
        ExportKind::Recommendations => RECOMMENDATIONS_FILE,
        ExportKind::Filtered => FILTERED_FILE,
    };
    let Some(path) = rfd::FileDialog::new()
        .set_title("Save CSV")
        .set_file_name(default_name)
        .add_filter("CSV", &["csv"])
        .save_file()
    else {
        return;
    };

    let result = write_export(state, kind, &path);

    match result {
        Ok(len) => {
            log::info!("Exported {len} bytes to {}", path.display());
            state.status_message = None;
        }
        Err(e) => {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Export failed: {e:#}"));
        }
    }
}

fn write_export(state: &AppState, kind: ExportKind, path: &Path) -> Result<usize> {
    let bytes = match kind {
        ExportKind::Recommendations => state.recommendations_export()?,
        ExportKind::Filtered => state.filtered_export()?,
    };
    std::fs::write(path, &bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(bytes.len())
}
