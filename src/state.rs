use std::path::Path;

use crate::color::{ColorMap, SINGLE_VIEW_COLOR};
use crate::config::AnalysisConfig;
use crate::data::aggregate::{CompareError, Comparison};
use crate::data::session::Session;

// ---------------------------------------------------------------------------
// Plot view: a computed comparison plus how to draw it
// ---------------------------------------------------------------------------

/// A comparison ready for the plot panel.
pub struct PlotView {
    pub title: String,
    pub comparison: Comparison,
    pub colors: ColorMap,
    /// Whether the first subplot carries a legend.
    pub legend: bool,
    /// Bumped on every new view so plots reset their bounds.
    pub generation: u64,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Column prefixes, montage and grouping column used for every load.
    pub config: AnalysisConfig,

    /// Loaded dataset (None until a file is loaded).
    pub session: Option<Session>,

    /// Selected group labels, in the order they were picked.
    pub selection: Vec<String>,

    /// Currently displayed plot.
    pub view: Option<PlotView>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    generation: u64,
}

impl AppState {
    pub fn new(config: AnalysisConfig, session: Option<Session>) -> Self {
        Self {
            config,
            session,
            ..Default::default()
        }
    }

    /// Replace the dataset; selection and plot belong to the old one.
    pub fn set_session(&mut self, session: Session) {
        self.session = Some(session);
        self.selection.clear();
        self.view = None;
        self.status_message = None;
    }

    /// Load a new file. On failure the current session is kept.
    pub fn open(&mut self, path: &Path) {
        match Session::open(path, &self.config) {
            Ok(session) => self.set_session(session),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    pub fn is_selected(&self, group: &str) -> bool {
        self.selection.iter().any(|g| g == group)
    }

    /// Toggle a group, appending it to the end of the selection when added.
    pub fn toggle_group(&mut self, group: &str) {
        if let Some(pos) = self.selection.iter().position(|g| g == group) {
            self.selection.remove(pos);
        } else {
            self.selection.push(group.to_string());
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Row count of each selected group.
    pub fn sample_sizes(&self) -> Vec<(String, usize)> {
        match &self.session {
            Some(session) => session.sample_sizes(&self.selection),
            None => Vec::new(),
        }
    }

    /// Compare every selected group.
    pub fn show_comparison(&mut self) -> Result<(), CompareError> {
        let Some(comparison) = self.compare_selection()? else {
            return Ok(());
        };
        let colors = ColorMap::new(&comparison.groups);
        self.set_view(
            "EEG Waves Comparison Across Groups".to_string(),
            comparison,
            colors,
            true,
        );
        Ok(())
    }

    /// Single-group view; only available with exactly one selected group.
    pub fn show_single(&mut self) -> Result<(), CompareError> {
        if self.selection.len() != 1 {
            return Ok(());
        }
        let Some(comparison) = self.compare_selection()? else {
            return Ok(());
        };
        let colors = ColorMap::uniform(&comparison.groups, SINGLE_VIEW_COLOR);
        let title = format!("Average EEG Waves by Group: {}", comparison.groups[0]);
        self.set_view(title, comparison, colors, false);
        Ok(())
    }

    /// `None` without a loaded dataset.
    fn compare_selection(&self) -> Result<Option<Comparison>, CompareError> {
        match &self.session {
            Some(session) => session.compare(&self.selection).map(Some),
            None => Ok(None),
        }
    }

    fn set_view(&mut self, title: String, comparison: Comparison, colors: ColorMap, legend: bool) {
        self.generation += 1;
        self.view = Some(PlotView {
            title,
            comparison,
            colors,
            legend,
            generation: self.generation,
        });
        self.status_message = None;
    }
}
