use std::path::{Path, PathBuf};

use crate::color::ColorMap;
use crate::data::filter::{
    occupation_options, sleep_range, FilterCriteria, OccupationFilter, ALL_OCCUPATIONS,
};
use crate::data::loader::load_dataset;
use crate::data::model::Dataset;
use crate::error::LoadError;
use crate::view::{render, ViewModel};

/// Chart tab shown in the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartTab {
    #[default]
    Scatter,
    AgeAndGender,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<Dataset>,

    /// Where `dataset` came from.
    pub source: Option<PathBuf>,

    /// Occupation selector entries, `"All"` first.
    pub occupation_options: Vec<String>,

    /// Slider bounds; None when no row has a sleep duration.
    pub sleep_bounds: Option<(i64, i64)>,

    pub selected_occupation: String,

    /// Minimum sleep duration in whole hours.
    pub min_sleep: i64,

    /// Result of the latest pipeline run.
    pub view: Option<ViewModel>,

    /// Occupation colours for the scatter plot and selector.
    pub occupation_colors: Option<ColorMap>,

    /// Gender colours for the box plot.
    pub gender_colors: Option<ColorMap>,

    pub chart_tab: ChartTab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    default_min_sleep: i64,
}

impl AppState {
    pub fn new(default_min_sleep: i64) -> Self {
        Self {
            dataset: None,
            source: None,
            occupation_options: Vec::new(),
            sleep_bounds: None,
            selected_occupation: ALL_OCCUPATIONS.to_string(),
            min_sleep: default_min_sleep,
            view: None,
            occupation_colors: None,
            gender_colors: None,
            chart_tab: ChartTab::default(),
            status_message: None,
            default_min_sleep,
        }
    }

    /// Load `path`, replacing the current dataset or reporting the failure.
    pub fn load(&mut self, path: &Path) {
        match load_dataset(path) {
            Ok(dataset) => self.set_dataset(dataset, Some(path.to_path_buf())),
            Err(e) => self.set_load_error(&e),
        }
    }

    /// Ingest a newly loaded dataset, reset the controls and re-render.
    pub fn set_dataset(&mut self, dataset: Dataset, source: Option<PathBuf>) {
        self.occupation_options = occupation_options(&dataset);
        self.sleep_bounds = sleep_range(&dataset);
        self.selected_occupation = ALL_OCCUPATIONS.to_string();
        self.min_sleep = match self.sleep_bounds {
            Some((lo, hi)) => self.default_min_sleep.clamp(lo, hi),
            None => self.default_min_sleep,
        };

        self.occupation_colors = Some(ColorMap::new(
            self.occupation_options
                .iter()
                .skip(1)
                .map(String::as_str),
        ));
        let mut genders: Vec<&str> = dataset.iter().filter_map(|r| r.gender.as_deref()).collect();
        genders.sort_unstable();
        genders.dedup();
        self.gender_colors = Some(ColorMap::new(genders));

        self.dataset = Some(dataset);
        self.source = source;
        self.status_message = None;
        self.refresh();
    }

    /// Drop the current dataset and everything derived from it, then show
    /// why loading failed.
    pub fn set_load_error(&mut self, err: &LoadError) {
        log::error!("Failed to load data: {err}");
        self.dataset = None;
        self.source = None;
        self.view = None;
        self.occupation_options.clear();
        self.sleep_bounds = None;
        self.selected_occupation = ALL_OCCUPATIONS.to_string();
        self.min_sleep = self.default_min_sleep;
        self.occupation_colors = None;
        self.gender_colors = None;
        self.status_message = Some(format!("No data available. {err}"));
    }

    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new(
            OccupationFilter::from_selection(&self.selected_occupation),
            self.min_sleep as f64,
        )
    }

    /// Re-run the pipeline for the current controls.
    pub fn refresh(&mut self) {
        self.view = self
            .dataset
            .as_ref()
            .map(|ds| render(ds, &self.criteria()));
    }

    pub fn select_occupation(&mut self, occupation: &str) {
        if self.selected_occupation != occupation {
            self.selected_occupation = occupation.to_string();
            self.refresh();
        }
    }

    pub fn set_min_sleep(&mut self, hours: i64) {
        if self.min_sleep != hours {
            self.min_sleep = hours;
            self.refresh();
        }
    }
}
