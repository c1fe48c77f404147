use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Band – one of the six canonical EEG frequency ranges
// ---------------------------------------------------------------------------

/// EEG frequency band. Declaration order is the plotting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Delta,
    Theta,
    Alpha,
    Beta,
    HighBeta,
    Gamma,
}

impl Band {
    /// All bands in plotting order (row-major over the 2×3 grid).
    pub const ALL: [Band; 6] = [
        Band::Delta,
        Band::Theta,
        Band::Alpha,
        Band::Beta,
        Band::HighBeta,
        Band::Gamma,
    ];

    /// Lowercase identifier, as used in column names and config files.
    pub fn name(self) -> &'static str {
        match self {
            Band::Delta => "delta",
            Band::Theta => "theta",
            Band::Alpha => "alpha",
            Band::Beta => "beta",
            Band::HighBeta => "highbeta",
            Band::Gamma => "gamma",
        }
    }

    /// Subplot title.
    pub fn title(self) -> &'static str {
        match self {
            Band::Delta => "Delta",
            Band::Theta => "Theta",
            Band::Alpha => "Alpha",
            Band::Beta => "Beta",
            Band::HighBeta => "Highbeta",
            Band::Gamma => "Gamma",
        }
    }

    /// Column prefix used by the psychiatric EEG band-power export.
    pub fn default_prefix(self) -> &'static str {
        match self {
            Band::Delta => "AB.A.delta",
            Band::Theta => "AB.B.theta",
            Band::Alpha => "AB.C.alpha",
            Band::Beta => "AB.D.beta",
            Band::HighBeta => "AB.E.highbeta",
            Band::Gamma => "AB.F.gamma",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// RecordSet – the complete loaded table
// ---------------------------------------------------------------------------

/// The loaded dataset in columnar form. Read-only once built.
///
/// Every column except the grouping column is stored as numbers; a cell that
/// was empty or did not parse is `None` and is skipped when averaging.
#[derive(Debug, Clone)]
pub struct RecordSet {
    /// Name of the categorical grouping column.
    group_column: String,
    /// Trimmed header names in file order (includes the grouping column).
    schema: Vec<String>,
    /// Group label of each row.
    groups: Vec<String>,
    /// Numeric columns: column_name → one cell per row.
    values: BTreeMap<String, Vec<Option<f64>>>,
    /// Distinct group labels, sorted lexicographically.
    group_labels: Vec<String>,
}

impl RecordSet {
    /// Assemble a record set from parsed columns.
    ///
    /// Callers guarantee that every column in `values` has `groups.len()`
    /// cells.
    pub fn from_columns(
        group_column: String,
        schema: Vec<String>,
        groups: Vec<String>,
        values: BTreeMap<String, Vec<Option<f64>>>,
    ) -> Self {
        debug_assert!(values.values().all(|col| col.len() == groups.len()));

        let group_labels: Vec<String> = groups
            .iter()
            .cloned()
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();

        RecordSet {
            group_column,
            schema,
            groups,
            values,
            group_labels,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group_column(&self) -> &str {
        &self.group_column
    }

    /// Trimmed column names in file order.
    pub fn schema(&self) -> &[String] {
        &self.schema
    }

    /// Group label of every row, in row order.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Sorted distinct group labels.
    pub fn group_labels(&self) -> &[String] {
        &self.group_labels
    }

    /// Cells of a numeric column, if present.
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.values.get(name).map(Vec::as_slice)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_labels_are_sorted_and_distinct() {
        let groups: Vec<String> = ["Mood", "Anxiety", "Mood", "Healthy", "Anxiety"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rs = RecordSet::from_columns(
            "main.disorder".into(),
            vec!["main.disorder".into()],
            groups,
            BTreeMap::new(),
        );
        assert_eq!(rs.group_labels(), ["Anxiety", "Healthy", "Mood"]);
        assert_eq!(rs.len(), 5);
    }

    #[test]
    fn band_order_and_serde_names() {
        assert_eq!(Band::ALL[0], Band::Delta);
        assert_eq!(Band::ALL[5], Band::Gamma);
        assert_eq!(serde_json::to_string(&Band::HighBeta).unwrap(), "\"highbeta\"");
        let parsed: Band = serde_json::from_str("\"theta\"").unwrap();
        assert_eq!(parsed, Band::Theta);
        assert_eq!(Band::HighBeta.title(), "Highbeta");
    }
}
