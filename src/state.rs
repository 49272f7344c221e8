use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::color::{BedroomColors, PriceScale};
use crate::config::DashboardConfig;
use crate::data::export::{filtered_csv, recommendations_csv};
use crate::data::filter::{FilterError, FilterRange, FilterSet};
use crate::data::insights::Insights;
use crate::data::loader::{is_missing_input, load_file};
use crate::data::model::{Dataset, DatasetBounds};

// ---------------------------------------------------------------------------
// Filter controls – slider positions
// ---------------------------------------------------------------------------

/// Raw slider positions for the three filterable fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterControls {
    pub price: (f64, f64),
    pub bedrooms: (u32, u32),
    pub bathrooms: (f64, f64),
}

impl FilterControls {
    /// Sliders spanning the whole dataset.
    pub fn spanning(bounds: &DatasetBounds) -> Self {
        FilterControls {
            price: bounds.price,
            bedrooms: bounds.bedrooms,
            bathrooms: bounds.bathrooms,
        }
    }

    /// Validate the slider pairs into a [`FilterSet`].
    pub fn to_filter_set(&self) -> Result<FilterSet, FilterError> {
        Ok(FilterSet {
            price: Some(FilterRange::new("price", self.price.0, self.price.1)?),
            bedrooms: Some(FilterRange::new("bedrooms", self.bedrooms.0, self.bedrooms.1)?),
            bathrooms: Some(FilterRange::new("bathrooms", self.bathrooms.0, self.bathrooms.1)?),
        })
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset, shared read-only with every derived view.
    pub dataset: Option<Arc<Dataset>>,

    /// Path the current dataset was loaded from.
    pub source_path: Option<PathBuf>,

    /// Current slider positions.
    pub controls: FilterControls,

    /// Outputs for the current controls (recomputed on change).
    pub insights: Option<Insights>,

    /// Colour scales fixed at load time.
    pub price_scale: Option<PriceScale>,
    pub bedroom_colors: Option<BedroomColors>,

    /// Startup failure that prevents any computation.
    pub fatal_error: Option<String>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            dataset: None,
            source_path: None,
            controls: FilterControls::spanning(&DatasetBounds::default()),
            insights: None,
            price_scale: None,
            bedroom_colors: None,
            fatal_error: None,
            status_message: None,
        }
    }

    /// Load the configured data file. A missing file is fatal.
    pub fn load_startup(&mut self) {
        let path = self.config.data_path.clone();
        self.load(&path);
    }

    /// Load a file and make it the current dataset.
    ///
    /// A missing input becomes the fatal error; other failures keep the
    /// current dataset and only set the status message.
    pub fn load(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => {
                self.source_path = Some(path.to_path_buf());
                self.set_dataset(dataset);
            }
            Err(e) if is_missing_input(&e) && self.dataset.is_none() => {
                log::error!("{e}");
                self.fatal_error = Some(e.to_string());
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset, reset filters, and compute insights.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        let bounds = dataset.bounds;
        self.price_scale = Some(PriceScale::new(bounds.price.0, bounds.price.1));
        self.bedroom_colors = Some(BedroomColors::new(
            dataset.listings.iter().map(|l| l.bedrooms),
        ));
        self.dataset = Some(Arc::new(dataset));
        self.fatal_error = None;
        self.status_message = None;
        self.reset_filters();
    }

    /// Restore sliders to the full dataset bounds.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.controls = FilterControls::spanning(&ds.bounds);
            self.refilter();
        }
    }

    /// Recompute insights after a control change.
    ///
    /// Invalid controls are rejected: the previous insights stay and the
    /// reason is shown as a status message.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        match self.controls.to_filter_set() {
            Ok(filters) => {
                self.insights = Some(Insights::compute(ds, &filters, self.config.histogram_bins));
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("Rejected filter: {e}");
                self.status_message = Some(e.to_string());
            }
        }
    }

    /// CSV bytes of the current recommendations.
    pub fn recommendations_export(&self) -> Result<Vec<u8>> {
        let insights = self.insights.as_ref().context("no insights computed")?;
        recommendations_csv(&insights.ranking.entries)
    }

    /// CSV bytes of the current filtered view.
    pub fn filtered_export(&self) -> Result<Vec<u8>> {
        let insights = self.insights.as_ref().context("no insights computed")?;
        filtered_csv(&insights.view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::listing;
    use crate::data::stats::Aggregate;

    fn state_with_data() -> AppState {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_dataset(Dataset::from_listings(
            vec![
                listing(1, 100.0, 50.0, 2, 1.0),
                listing(2, 300.0, 100.0, 2, 2.0),
                listing(3, 200.0, 0.0, 3, 1.0),
            ],
            Vec::new(),
        ));
        state
    }

    #[test]
    fn new_dataset_starts_unfiltered() {
        let state = state_with_data();
        assert_eq!(state.controls.price, (100.0, 300.0));
        assert_eq!(state.controls.bedrooms, (2, 3));
        assert_eq!(state.insights.as_ref().unwrap().view.len(), 3);
    }

    #[test]
    fn narrowing_controls_recomputes() {
        let mut state = state_with_data();
        state.controls.bedrooms = (3, 3);
        state.refilter();
        let insights = state.insights.as_ref().unwrap();
        assert_eq!(insights.view.len(), 1);
        assert!(insights.ranking.entries.is_empty());
    }

    #[test]
    fn inverted_controls_are_rejected_and_previous_insights_kept() {
        let mut state = state_with_data();
        state.controls.price = (250.0, 150.0);
        state.refilter();
        assert!(state
            .status_message
            .as_deref()
            .unwrap()
            .contains("invalid price range"));
        assert_eq!(state.insights.as_ref().unwrap().view.len(), 3);
    }

    #[test]
    fn reset_restores_full_bounds() {
        let mut state = state_with_data();
        state.controls.price = (1_000_000.0, 2_000_000.0);
        state.refilter();
        assert_eq!(state.insights.as_ref().unwrap().aggregate, Aggregate::NoData);

        state.reset_filters();
        assert_eq!(state.insights.as_ref().unwrap().view.len(), 3);
    }

    #[test]
    fn missing_startup_file_is_fatal() {
        let mut state = AppState::new(DashboardConfig {
            data_path: PathBuf::from("/no/such/listings.csv"),
            ..DashboardConfig::default()
        });
        state.load_startup();
        assert_eq!(
            state.fatal_error.as_deref(),
            Some("File not found: /no/such/listings.csv")
        );
        assert!(state.dataset.is_none());
        assert!(state.insights.is_none());
    }

    #[test]
    fn missing_file_after_startup_is_only_a_status() {
        let mut state = state_with_data();
        state.load(Path::new("/no/such/listings.csv"));
        assert!(state.fatal_error.is_none());
        assert!(state.status_message.is_some());
        assert!(state.dataset.is_some());
    }

    #[test]
    fn exports_follow_current_insights() {
        let state = state_with_data();
        let rec = String::from_utf8(state.recommendations_export().unwrap()).unwrap();
        assert_eq!(rec.lines().count(), 3);
        let all = String::from_utf8(state.filtered_export().unwrap()).unwrap();
        assert_eq!(all.lines().count(), 4);

        let empty = AppState::new(DashboardConfig::default());
        assert!(empty.recommendations_export().is_err());
    }
}
