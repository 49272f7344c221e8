use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::insights::Insights;
use crate::data::stats::Aggregate;
use crate::ui::panels::ExportKind;

// ---------------------------------------------------------------------------
// Number formatting
// ---------------------------------------------------------------------------

/// Round to a whole number and group thousands with commas.
fn thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn money(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("${}", thousands(v)))
}

fn area(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), thousands)
}

// ---------------------------------------------------------------------------
// KPIs and insight text
// ---------------------------------------------------------------------------

fn metric(ui: &mut Ui, title: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.label(RichText::new(title).weak());
            ui.heading(value);
        });
    });
}

/// KPI row, insight bullets, and the market commentary.
pub fn kpis(ui: &mut Ui, insights: &Insights) {
    ui.strong("KPIs");
    let Aggregate::Summary(s) = &insights.aggregate else {
        ui.label("No data for the current selection.");
        return;
    };

    let avg_price = s.price.mean();
    let median_price = s.price.median();
    let avg_area = s.living_area.mean();

    ui.columns(4, |cols: &mut [Ui]| {
        metric(&mut cols[0], "Average Price", money(avg_price));
        metric(&mut cols[1], "Median Price", money(median_price));
        metric(&mut cols[2], "Average Living Area (sqft)", area(avg_area));
        metric(&mut cols[3], "Total Listings", thousands(s.count as f64));
    });

    ui.add_space(6.0);
    ui.label("Based on the selected filters:");
    ui.label(format!("• There are {} listings available.", thousands(s.count as f64)));
    ui.label(format!("• Average price is {}.", money(avg_price)));
    ui.label(format!("• Median price is {}.", money(median_price)));
    ui.label(format!("• Average living area is {} sqft.", area(avg_area)));
    if s.price.excluded > 0 || s.living_area.excluded > 0 {
        ui.label(
            RichText::new(format!(
                "{} listings without a price and {} without a living area are left out of these figures.",
                s.price.excluded, s.living_area.excluded
            ))
            .weak(),
        );
    }

    if let Some(commentary) = insights.commentary {
        ui.label(RichText::new(commentary.tip()).italics());
    }
}

// ---------------------------------------------------------------------------
// Recommendation table
// ---------------------------------------------------------------------------

fn unranked_note(excluded: usize) -> String {
    format!("{excluded} listings have no price per sqft and are not ranked.")
}

/// Best-value table plus download buttons. Returns the export the user
/// asked for, if any.
pub fn recommendations(ui: &mut Ui, insights: &Insights) -> Option<ExportKind> {
    ui.strong("Top Recommendations");
    let entries = &insights.ranking.entries;
    ui.label(format!(
        "Showing top {} best-value listings based on price per sqft.",
        entries.len()
    ));
    if insights.ranking.excluded > 0 {
        ui.label(
            RichText::new(unranked_note(insights.ranking.excluded)).weak(),
        );
    }

    TableBuilder::new(ui)
        .id_salt("recommendations")
        .striped(true)
        .vscroll(false)
        .columns(Column::auto().at_least(80.0), 6)
        .header(20.0, |mut header| {
            for title in [
                "id",
                "price",
                "bedrooms",
                "bathrooms",
                "sqft_living",
                "price_per_sqft",
            ] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for e in entries {
                let l = &e.listing;
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(l.id.to_string());
                    });
                    row.col(|ui| {
                        ui.label(money(l.price));
                    });
                    row.col(|ui| {
                        ui.label(l.bedrooms.to_string());
                    });
                    row.col(|ui| {
                        ui.label(l.bathrooms.to_string());
                    });
                    row.col(|ui| {
                        ui.label(area(l.sqft_living));
                    });
                    row.col(|ui| {
                        ui.label(format!("${:.2}", e.price_per_area));
                    });
                });
            }
        });

    let mut export = None;
    ui.horizontal(|ui: &mut Ui| {
        if ui
            .add_enabled(!entries.is_empty(), egui::Button::new("Download Recommendations as CSV"))
            .clicked()
        {
            export = Some(ExportKind::Recommendations);
        }
        if ui.button("Download All Filtered Data").clicked() {
            export = Some(ExportKind::Filtered);
        }
    });
    export
}
