use std::collections::{HashMap, HashSet};

use crate::domain::registry::PartnerRecord;

/// Rows whose cleaned name occurs at least twice in the sample.
///
/// All occurrences are kept, in their original order. Matching is exact and
/// case-sensitive; rows without a name group with each other.
pub fn find_duplicates(records: &[PartnerRecord]) -> Vec<PartnerRecord> {
    let mut counts: HashMap<Option<&str>, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.name_key()).or_insert(0) += 1;
    }

    records
        .iter()
        .filter(|record| counts.get(&record.name_key()).copied().unwrap_or(0) > 1)
        .cloned()
        .collect()
}

/// First occurrence of each (company, partner) pair, at most `limit` rows
pub fn distinct_pairs(records: &[PartnerRecord], limit: usize) -> Vec<PartnerRecord> {
    let mut seen: HashSet<(&str, Option<&str>)> = HashSet::new();
    let mut sample = Vec::new();

    for record in records {
        if sample.len() >= limit {
            break;
        }
        if seen.insert((record.company_id.as_str(), record.name_key())) {
            sample.push(record.clone());
        }
    }

    sample
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: usize, company: &str, name: Option<&str>) -> PartnerRecord {
        PartnerRecord::new(index, company.to_string(), name.map(str::to_string))
    }

    #[test]
    fn test_two_shared_one_unique() {
        let rows = vec![
            record(0, "111", Some("JOAO SILVA")),
            record(1, "222", Some("MARIA SOUZA")),
            record(2, "333", Some("JOAO SILVA")),
        ];

        let dups = find_duplicates(&rows);
        assert_eq!(dups.len(), 2);
        assert_eq!(dups[0].index, 0);
        assert_eq!(dups[1].index, 2);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let rows = vec![
            record(0, "111", Some("Joao")),
            record(1, "222", Some("JOAO")),
        ];
        assert!(find_duplicates(&rows).is_empty());
    }

    #[test]
    fn test_all_unique_yields_nothing() {
        let rows = vec![record(0, "1", Some("A")), record(1, "2", Some("B"))];
        assert!(find_duplicates(&rows).is_empty());
        assert!(find_duplicates(&[]).is_empty());
    }

    #[test]
    fn test_missing_names_group_together() {
        let rows = vec![
            record(0, "1", None),
            record(1, "2", Some("")),
            record(2, "3", None),
        ];
        let dups = find_duplicates(&rows);
        assert_eq!(dups.iter().map(|r| r.index).collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_missing_name_never_matches_empty_cleaned_name() {
        let rows = vec![record(0, "11", None), record(1, "22", Some(""))];
        assert!(find_duplicates(&rows).is_empty());
    }

    #[test]
    fn test_same_company_repeat_counts_as_duplicate() {
        let rows = vec![record(0, "1", Some("ANA")), record(1, "1", Some("ANA"))];
        assert_eq!(find_duplicates(&rows).len(), 2);
    }

    #[test]
    fn test_distinct_pairs_drops_repeats_and_limits() {
        let rows = vec![
            record(0, "1", Some("ANA")),
            record(1, "1", Some("ANA")),
            record(2, "2", Some("ANA")),
            record(3, "3", Some("ANA")),
        ];

        let sample = distinct_pairs(&rows, 2);
        assert_eq!(sample.iter().map(|r| r.index).collect::<Vec<_>>(), vec![0, 2]);

        let all = distinct_pairs(&rows, 10);
        assert_eq!(all.len(), 3);
    }
}
