use thiserror::Error;

use super::filter::rows_for_group;
use super::model::{Band, RecordSet};
use super::resolver::ColumnMapping;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompareError {
    #[error("no groups selected")]
    EmptySelection,
}

/// Mean power of one electrode for one group. `None` when no value was
/// available: the group has no rows, or every cell was missing.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub electrode: String,
    pub mean: Option<f64>,
}

/// One plotted line: a group's per-electrode means within a band.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub group: String,
    /// Rows that matched the group.
    pub rows: usize,
    /// One point per resolved electrode, in montage order.
    pub points: Vec<SeriesPoint>,
}

impl Series {
    /// Whether at least one electrode has a value to draw.
    pub fn has_values(&self) -> bool {
        self.points.iter().any(|p| p.mean.is_some())
    }
}

/// All series of one band, in selection order.
#[derive(Debug, Clone, PartialEq)]
pub struct BandPanel {
    pub band: Band,
    pub series: Vec<Series>,
}

impl BandPanel {
    /// Electrode axis of this panel; identical for every series.
    pub fn electrodes(&self) -> Vec<&str> {
        self.series
            .first()
            .map(|s| s.points.iter().map(|p| p.electrode.as_str()).collect())
            .unwrap_or_default()
    }
}

/// The full 2×3 grid: one panel per band in [`Band::ALL`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub groups: Vec<String>,
    pub panels: Vec<BandPanel>,
}

impl Comparison {
    pub fn panel(&self, band: Band) -> Option<&BandPanel> {
        self.panels.iter().find(|p| p.band == band)
    }

    /// Series of `group` in `band`, if that group was compared.
    pub fn series(&self, band: Band, group: &str) -> Option<&Series> {
        self.panel(band)?.series.iter().find(|s| s.group == group)
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Average every resolved column over the rows of each requested group.
///
/// Groups keep the order given; electrodes keep the mapping's montage
/// order. A single group goes through exactly the same path.
pub fn compare(
    records: &RecordSet,
    mapping: &ColumnMapping,
    groups: &[String],
) -> Result<Comparison, CompareError> {
    if groups.is_empty() {
        return Err(CompareError::EmptySelection);
    }

    let group_rows: Vec<(&String, Vec<usize>)> = groups
        .iter()
        .map(|g| (g, rows_for_group(records, g)))
        .collect();

    for (group, rows) in &group_rows {
        if rows.is_empty() {
            log::warn!("group '{group}' has no rows; its series will be empty");
        }
    }

    let panels = Band::ALL
        .iter()
        .map(|&band| {
            let columns = mapping.electrodes(band);
            let series = group_rows
                .iter()
                .map(|(group, rows)| Series {
                    group: (*group).clone(),
                    rows: rows.len(),
                    points: columns
                        .iter()
                        .map(|ec| SeriesPoint {
                            electrode: ec.electrode.clone(),
                            mean: records
                                .column(&ec.column)
                                .and_then(|cells| mean_of(cells, rows)),
                        })
                        .collect(),
                })
                .collect();
            BandPanel { band, series }
        })
        .collect();

    log::debug!(
        "compared {} group(s) over {} band columns",
        groups.len(),
        mapping.column_count()
    );

    Ok(Comparison {
        groups: groups.to_vec(),
        panels,
    })
}

/// Arithmetic mean of the present cells at `rows`; `None` if there are none.
fn mean_of(cells: &[Option<f64>], rows: &[usize]) -> Option<f64> {
    let (sum, n) = rows
        .iter()
        .filter_map(|&i| cells.get(i).copied().flatten())
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::config::AnalysisConfig;
    use crate::data::resolver::resolve;

    /// Builds a record set from (group, cells) rows; cells follow `schema`.
    fn record_set(schema: &[&str], rows: &[(&str, Vec<Option<f64>>)]) -> RecordSet {
        let mut values: BTreeMap<String, Vec<Option<f64>>> = BTreeMap::new();
        for (ci, col) in schema.iter().enumerate() {
            values.insert(col.to_string(), rows.iter().map(|(_, cells)| cells[ci]).collect());
        }
        let mut full_schema = vec!["main.disorder".to_string()];
        full_schema.extend(schema.iter().map(|s| s.to_string()));
        RecordSet::from_columns(
            "main.disorder".into(),
            full_schema,
            rows.iter().map(|(g, _)| g.to_string()).collect(),
            values,
        )
    }

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn fixture() -> (RecordSet, ColumnMapping) {
        let schema = [
            "AB.A.delta.FP1",
            "AB.A.delta.Cz",
            "AB.B.theta.Cz",
            "AB.F.gamma.O2",
            "AB.F.gamma.FP2",
        ];
        let rs = record_set(
            &schema,
            &[
                ("X", vec![Some(1.0), Some(10.0), Some(0.0), Some(4.0), None]),
                ("X", vec![Some(3.0), None, Some(0.0), Some(6.0), None]),
                ("Y", vec![Some(2.0), Some(5.0), Some(7.0), Some(1.0), Some(-2.0)]),
            ],
        );
        let cfg = AnalysisConfig::default();
        let mapping = resolve(rs.schema(), &cfg.bands, &cfg.montage);
        (rs, mapping)
    }

    #[test]
    fn delta_fp1_means_per_group() {
        let (rs, mapping) = fixture();
        let cmp = compare(&rs, &mapping, &labels(&["X", "Y"])).unwrap();

        let x = cmp.series(Band::Delta, "X").unwrap();
        let y = cmp.series(Band::Delta, "Y").unwrap();
        assert_eq!(x.points[0].electrode, "FP1");
        assert_eq!(x.points[0].mean, Some(2.0));
        assert_eq!(y.points[0].mean, Some(2.0));
        assert_eq!(x.rows, 2);
        assert_eq!(y.rows, 1);
    }

    #[test]
    fn missing_cells_are_skipped() {
        let (rs, mapping) = fixture();
        let cmp = compare(&rs, &mapping, &labels(&["X"])).unwrap();

        // Cz: 10.0 and a missing cell.
        assert_eq!(cmp.series(Band::Delta, "X").unwrap().points[1].mean, Some(10.0));
        // FP2 gamma: every X cell missing.
        let gamma = cmp.series(Band::Gamma, "X").unwrap();
        assert_eq!(gamma.points[0].electrode, "FP2");
        assert_eq!(gamma.points[0].mean, None);
        assert_eq!(gamma.points[1].mean, Some(5.0));
    }

    #[test]
    fn real_zero_is_kept() {
        let (rs, mapping) = fixture();
        let cmp = compare(&rs, &mapping, &labels(&["X"])).unwrap();
        assert_eq!(cmp.series(Band::Theta, "X").unwrap().points[0].mean, Some(0.0));
    }

    #[test]
    fn empty_selection_is_an_error() {
        let (rs, mapping) = fixture();
        assert_eq!(
            compare(&rs, &mapping, &[]),
            Err(CompareError::EmptySelection)
        );
    }

    #[test]
    fn unknown_group_yields_undefined_everywhere() {
        let (rs, mapping) = fixture();
        let cmp = compare(&rs, &mapping, &labels(&["Nobody"])).unwrap();

        assert_eq!(cmp.panels.len(), 6);
        for panel in &cmp.panels {
            assert_eq!(panel.series.len(), 1);
            let series = &panel.series[0];
            assert_eq!(series.group, "Nobody");
            assert_eq!(series.rows, 0);
            assert_eq!(series.points.len(), mapping.electrodes(panel.band).len());
            assert!(series.points.iter().all(|p| p.mean.is_none()));
            assert!(!series.has_values());
        }
    }

    #[test]
    fn group_result_does_not_depend_on_other_groups() {
        let (rs, mapping) = fixture();
        let alone = compare(&rs, &mapping, &labels(&["X"])).unwrap();
        let paired = compare(&rs, &mapping, &labels(&["X", "Y"])).unwrap();
        for band in Band::ALL {
            assert_eq!(alone.series(band, "X"), paired.series(band, "X"));
        }
    }

    #[test]
    fn groups_keep_selection_order() {
        let (rs, mapping) = fixture();
        let cmp = compare(&rs, &mapping, &labels(&["Y", "X"])).unwrap();
        for panel in &cmp.panels {
            let order: Vec<&str> = panel.series.iter().map(|s| s.group.as_str()).collect();
            assert_eq!(order, ["Y", "X"]);
        }
        assert_eq!(cmp.groups, labels(&["Y", "X"]));
    }

    #[test]
    fn electrode_axis_matches_mapping_for_every_series() {
        let (rs, mapping) = fixture();
        let cmp = compare(&rs, &mapping, &labels(&["X", "Y", "Nobody"])).unwrap();
        for panel in &cmp.panels {
            let expected: Vec<&str> = mapping
                .electrodes(panel.band)
                .iter()
                .map(|ec| ec.electrode.as_str())
                .collect();
            for series in &panel.series {
                let got: Vec<&str> =
                    series.points.iter().map(|p| p.electrode.as_str()).collect();
                assert_eq!(got, expected);
            }
            assert_eq!(panel.electrodes(), expected);
        }
        assert_eq!(cmp.panel(Band::Gamma).unwrap().electrodes(), ["FP2", "O2"]);
        assert!(cmp.panel(Band::Alpha).unwrap().electrodes().is_empty());
    }

    #[test]
    fn inputs_are_not_mutated() {
        let (rs, mapping) = fixture();
        let mapping_before = mapping.clone();
        let schema_before = rs.schema().to_vec();
        compare(&rs, &mapping, &labels(&["X"])).unwrap();
        assert_eq!(mapping, mapping_before);
        assert_eq!(rs.schema(), schema_before.as_slice());
    }
}
