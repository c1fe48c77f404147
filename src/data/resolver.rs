use std::collections::{BTreeMap, HashMap};

use super::model::Band;

// ---------------------------------------------------------------------------
// Column mapping: band → electrode → column
// ---------------------------------------------------------------------------

/// One resolved electrode of a band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElectrodeColumn {
    pub electrode: String,
    pub column: String,
}

/// For each band, the electrodes found in the schema, in montage order.
///
/// Built once per dataset and reused for every comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    bands: BTreeMap<Band, Vec<ElectrodeColumn>>,
}

impl ColumnMapping {
    /// Resolved electrodes of `band`; empty when the band matched nothing.
    pub fn electrodes(&self, band: Band) -> &[ElectrodeColumn] {
        self.bands.get(&band).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of resolved band/electrode columns.
    pub fn column_count(&self) -> usize {
        self.bands.values().map(Vec::len).sum()
    }
}

/// Map every band's columns onto the montage.
///
/// A column belongs to a band when its name starts with the band's prefix;
/// its electrode is the last dot-separated segment. Segments outside
/// `montage` are dropped, and when two columns of a band end in the same
/// electrode the later one wins. Bands absent from `prefixes` resolve empty.
pub fn resolve(
    schema: &[String],
    prefixes: &BTreeMap<Band, String>,
    montage: &[String],
) -> ColumnMapping {
    let mut bands = BTreeMap::new();

    for band in Band::ALL {
        let Some(prefix) = prefixes.get(&band) else {
            bands.insert(band, Vec::new());
            continue;
        };

        let (prefixed, found) = scan_band(band, schema, prefix);

        let ordered: Vec<ElectrodeColumn> = montage
            .iter()
            .filter_map(|electrode| {
                found.get(electrode.as_str()).map(|column| ElectrodeColumn {
                    electrode: electrode.clone(),
                    column: column.to_string(),
                })
            })
            .collect();

        log::debug!(
            "{band}: {prefixed} prefixed columns, {} electrodes, {} on the montage",
            found.len(),
            ordered.len()
        );
        bands.insert(band, ordered);
    }

    ColumnMapping { bands }
}

/// Count the columns carrying `prefix` and key them by electrode, the later
/// column winning.
fn scan_band<'a>(
    band: Band,
    schema: &'a [String],
    prefix: &str,
) -> (usize, HashMap<&'a str, &'a str>) {
    let mut prefixed = 0;
    let mut found: HashMap<&str, &str> = HashMap::new();
    for column in schema.iter().filter(|c| c.starts_with(prefix)) {
        prefixed += 1;
        let electrode = column.rsplit('.').next().unwrap_or(column.as_str());
        if let Some(previous) = found.insert(electrode, column.as_str()) {
            log::debug!("{band}: column '{column}' replaces '{previous}' for {electrode}");
        }
    }
    (prefixed, found)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn electrodes_of(mapping: &ColumnMapping, band: Band) -> Vec<&str> {
        mapping
            .electrodes(band)
            .iter()
            .map(|ec| ec.electrode.as_str())
            .collect()
    }

    #[test]
    fn orders_by_montage_not_schema() {
        let cfg = AnalysisConfig::default();
        let schema = strings(&[
            "main.disorder",
            "AB.A.delta.a.O2",
            "AB.A.delta.b.FP1",
            "AB.A.delta.c.Cz",
            "AB.A.delta.d.FP2",
        ]);
        let mapping = resolve(&schema, &cfg.bands, &cfg.montage);
        assert_eq!(electrodes_of(&mapping, Band::Delta), ["FP1", "FP2", "Cz", "O2"]);
        assert_eq!(mapping.electrodes(Band::Delta)[0].column, "AB.A.delta.b.FP1");
    }

    #[test]
    fn output_is_subsequence_of_montage() {
        let cfg = AnalysisConfig::default();
        let schema = strings(&[
            "AB.C.alpha.T6",
            "AB.C.alpha.XX",
            "AB.C.alpha.F3",
            "AB.C.alpha.fp1",
            "AB.C.alpha.Pz",
            "COH.C.alpha.a.FP1.b.FP2",
        ]);
        let mapping = resolve(&schema, &cfg.bands, &cfg.montage);
        let got = electrodes_of(&mapping, Band::Alpha);
        assert_eq!(got, ["F3", "Pz", "T6"]);

        let mut cursor = cfg.montage.iter();
        for electrode in got {
            assert!(cursor.any(|m| m == electrode), "{electrode} out of order");
        }
    }

    #[test]
    fn unmatched_band_is_empty() {
        let cfg = AnalysisConfig::default();
        let schema = strings(&["AB.A.delta.FP1", "main.disorder"]);
        let mapping = resolve(&schema, &cfg.bands, &cfg.montage);
        for band in [Band::Theta, Band::Alpha, Band::Beta, Band::HighBeta, Band::Gamma] {
            assert!(mapping.electrodes(band).is_empty());
        }
        assert_eq!(mapping.column_count(), 1);
    }

    #[test]
    fn band_without_prefix_is_empty() {
        let cfg = AnalysisConfig::default();
        let mut prefixes = cfg.bands.clone();
        prefixes.remove(&Band::Gamma);
        let schema = strings(&["AB.F.gamma.FP1"]);
        let mapping = resolve(&schema, &prefixes, &cfg.montage);
        assert!(mapping.electrodes(Band::Gamma).is_empty());
    }

    #[test]
    fn later_duplicate_electrode_wins() {
        let cfg = AnalysisConfig::default();
        let schema = strings(&["AB.B.theta.a.Cz", "AB.B.theta.b.Cz"]);
        let mapping = resolve(&schema, &cfg.bands, &cfg.montage);
        assert_eq!(mapping.electrodes(Band::Theta).len(), 1);
        assert_eq!(mapping.electrodes(Band::Theta)[0].column, "AB.B.theta.b.Cz");
    }

    #[test]
    fn scan_counts_every_prefixed_column() {
        let schema = strings(&[
            "AB.B.theta.a.Cz",
            "AB.B.theta.b.Cz",
            "AB.B.theta.c.XX",
            "AB.A.delta.a.Cz",
        ]);
        let (prefixed, found) = scan_band(Band::Theta, &schema, "AB.B.theta");
        assert_eq!(prefixed, 3);
        assert_eq!(found.len(), 2);
        assert_eq!(found["Cz"], "AB.B.theta.b.Cz");
        assert_eq!(found["XX"], "AB.B.theta.c.XX");
    }

    #[test]
    fn resolve_is_idempotent_and_leaves_schema_alone() {
        let cfg = AnalysisConfig::default();
        let schema = strings(&["AB.E.highbeta.O1", "AB.E.highbeta.F7", "AB.D.beta.C4"]);
        let before = schema.clone();
        let first = resolve(&schema, &cfg.bands, &cfg.montage);
        let second = resolve(&schema, &cfg.bands, &cfg.montage);
        assert_eq!(first, second);
        assert_eq!(schema, before);
        assert_eq!(electrodes_of(&first, Band::HighBeta), ["F7", "O1"]);
    }
}
