use super::model::RecordSet;

// ---------------------------------------------------------------------------
// Group predicate: which rows carry a given label
// ---------------------------------------------------------------------------

/// Return indices of rows whose group label equals `label`.
///
/// Exact match: no case-folding, no trimming.
pub fn rows_for_group(records: &RecordSet, label: &str) -> Vec<usize> {
    records
        .groups()
        .iter()
        .enumerate()
        .filter(|(_, g)| g.as_str() == label)
        .map(|(i, _)| i)
        .collect()
}

/// Row count per requested label, in the order requested.
/// Labels absent from the dataset count zero.
pub fn sample_sizes(records: &RecordSet, labels: &[String]) -> Vec<(String, usize)> {
    labels
        .iter()
        .map(|label| {
            let n = records.groups().iter().filter(|g| *g == label).count();
            (label.clone(), n)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn records(groups: &[&str]) -> RecordSet {
        RecordSet::from_columns(
            "group".into(),
            vec!["group".into()],
            groups.iter().map(|s| s.to_string()).collect(),
            BTreeMap::new(),
        )
    }

    #[test]
    fn exact_match_only() {
        let rs = records(&["Mood", "mood", "Mood ", "Mood"]);
        assert_eq!(rows_for_group(&rs, "Mood"), vec![0, 3]);
        assert!(rows_for_group(&rs, "Anxiety").is_empty());
    }

    #[test]
    fn sizes_follow_request_order() {
        let rs = records(&["B", "A", "B", "B"]);
        let sizes = sample_sizes(&rs, &["B".into(), "Z".into(), "A".into()]);
        assert_eq!(
            sizes,
            vec![("B".to_string(), 3), ("Z".to_string(), 0), ("A".to_string(), 1)]
        );
    }
}
