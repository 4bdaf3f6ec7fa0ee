use std::collections::{BTreeSet, HashSet};

use crate::models::{AtomicQuestion, Difficulty, StudyFilters, TagFilter, TagFilterMode};

/// Keeps records that pass both the tag and the difficulty predicate.
///
/// An absent or empty tag set / difficulty set does not restrict anything.
/// Relative order of the surviving records is preserved.
pub fn filter(
    records: Vec<AtomicQuestion>,
    tag_filter: Option<&TagFilter>,
    difficulties: Option<&HashSet<Difficulty>>,
) -> Vec<AtomicQuestion> {
    records
        .into_iter()
        .filter(|record| matches_tags(record, tag_filter) && matches_difficulty(record, difficulties))
        .collect()
}

pub fn matches_tags(record: &AtomicQuestion, tag_filter: Option<&TagFilter>) -> bool {
    let Some(tag_filter) = tag_filter.filter(|f| !f.tags.is_empty()) else {
        return true;
    };

    match tag_filter.mode {
        TagFilterMode::Any => record.tags.iter().any(|tag| tag_filter.tags.contains(tag)),
        TagFilterMode::All => tag_filter
            .tags
            .iter()
            .all(|wanted| record.tags.iter().any(|tag| tag == wanted)),
    }
}

pub fn matches_difficulty(
    record: &AtomicQuestion,
    difficulties: Option<&HashSet<Difficulty>>,
) -> bool {
    match difficulties.filter(|set| !set.is_empty()) {
        None => true,
        Some(set) => record
            .difficulty
            .is_some_and(|difficulty| set.contains(&difficulty)),
    }
}

/// Distinct tags (sorted) and difficulty levels (ascending) present in `records`.
pub fn available_filters(records: &[AtomicQuestion]) -> StudyFilters {
    let tags: BTreeSet<&str> = records
        .iter()
        .flat_map(|record| record.tags.iter().map(String::as_str))
        .collect();
    let difficulties: BTreeSet<Difficulty> =
        records.iter().filter_map(|record| record.difficulty).collect();

    StudyFilters {
        tags: tags.into_iter().map(str::to_string).collect(),
        difficulties: difficulties.into_iter().collect(),
    }
}
