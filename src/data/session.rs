use std::path::{Path, PathBuf};

use anyhow::Result;

use super::aggregate::{self, CompareError, Comparison};
use super::filter;
use super::loader::load_file;
use super::model::{Band, RecordSet};
use super::resolver::{self, ColumnMapping};
use crate::config::AnalysisConfig;

/// A loaded dataset together with its resolved column mapping.
///
/// Immutable after [`Session::open`]; every query borrows it.
#[derive(Debug, Clone)]
pub struct Session {
    pub source: PathBuf,
    pub config: AnalysisConfig,
    pub records: RecordSet,
    pub mapping: ColumnMapping,
}

impl Session {
    /// Load `path` and resolve its columns against `config`.
    pub fn open(path: &Path, config: &AnalysisConfig) -> Result<Self> {
        let records = load_file(path, &config.group_column)?;
        Ok(Self::from_records(path.to_path_buf(), config.clone(), records))
    }

    pub fn from_records(source: PathBuf, config: AnalysisConfig, records: RecordSet) -> Self {
        if records.is_empty() {
            log::warn!("{} has no data rows", source.display());
        }
        let mapping = resolver::resolve(records.schema(), &config.bands, &config.montage);
        for band in Band::ALL {
            let n = mapping.electrodes(band).len();
            if n == 0 {
                log::warn!("No columns resolved for band {band}");
            } else {
                log::info!("{band}: {n} of {} electrodes", config.montage.len());
            }
        }
        Session {
            source,
            config,
            records,
            mapping,
        }
    }

    /// Top-bar line: `<file>: <n> recordings, <k> groups, <m>/<total> band columns`.
    pub fn summary(&self) -> String {
        let name = self
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!(
            "{name}: {} recordings, {} groups, {}/{} band columns",
            self.records.len(),
            self.group_labels().len(),
            self.mapping.column_count(),
            self.config.bands.len() * self.config.montage.len()
        )
    }

    pub fn group_labels(&self) -> &[String] {
        self.records.group_labels()
    }

    pub fn compare(&self, groups: &[String]) -> Result<Comparison, CompareError> {
        aggregate::compare(&self.records, &self.mapping, groups)
    }

    pub fn sample_sizes(&self, groups: &[String]) -> Vec<(String, usize)> {
        filter::sample_sizes(&self.records, groups)
    }
}
