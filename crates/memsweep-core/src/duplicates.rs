use crate::blocks::{element_text, extract_blocks, Markers};
use crate::similarity;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;

// ---------------------------------------------------------------------------
// RecordFields
// ---------------------------------------------------------------------------

/// Element names that delimit a solution record and its sub-fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFields {
    #[serde(default = "default_block")]
    pub block: String,
    #[serde(default = "default_id_field")]
    pub id_field: String,
    #[serde(default = "default_category_field")]
    pub category_field: String,
    #[serde(default = "default_description_field")]
    pub description_field: String,
}

fn default_block() -> String {
    "solution".to_string()
}

fn default_id_field() -> String {
    "id".to_string()
}

fn default_category_field() -> String {
    "category".to_string()
}

fn default_description_field() -> String {
    "description".to_string()
}

impl Default for RecordFields {
    fn default() -> Self {
        Self {
            block: default_block(),
            id_field: default_id_field(),
            category_field: default_category_field(),
            description_field: default_description_field(),
        }
    }
}

// ---------------------------------------------------------------------------
// SolutionRecord / DuplicateCandidate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionRecord {
    pub id: String,
    pub category: String,
    pub description: String,
    /// Exact source span the record was read from.
    pub raw_block: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateCandidate {
    pub record_a: SolutionRecord,
    pub record_b: SolutionRecord,
    pub similarity: f64,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Solution records in source order. Blocks without a non-empty id are skipped.
pub fn extract_records(document: &str, fields: &RecordFields) -> Vec<SolutionRecord> {
    extract_blocks(document, &Markers::element(&fields.block))
        .into_iter()
        .filter_map(|block| {
            let id = element_text(block.inner, &fields.id_field).filter(|id| !id.is_empty())?;
            Some(SolutionRecord {
                id,
                category: element_text(block.inner, &fields.category_field).unwrap_or_default(),
                description: element_text(block.inner, &fields.description_field)
                    .unwrap_or_default(),
                raw_block: block.raw.to_string(),
            })
        })
        .collect()
}

/// Same-category record pairs whose descriptions score at or above `threshold`,
/// using the default `<solution>` record layout.
pub fn find_duplicates(document: &str, threshold: f64) -> Vec<DuplicateCandidate> {
    find_duplicates_with(document, &RecordFields::default(), threshold)
}

/// Pairs are visited as `(i, j)` with `i < j`, outer index ascending then
/// inner, and candidates come back in that order.
pub fn find_duplicates_with(
    document: &str,
    fields: &RecordFields,
    threshold: f64,
) -> Vec<DuplicateCandidate> {
    let records = extract_records(document, fields);
    let mut candidates = Vec::new();

    for (i, a) in records.iter().enumerate() {
        for b in &records[i + 1..] {
            if a.category != b.category {
                continue;
            }
            let similarity = similarity::score(&a.description, &b.description);
            if similarity >= threshold {
                candidates.push(DuplicateCandidate {
                    record_a: a.clone(),
                    record_b: b.clone(),
                    similarity,
                });
            }
        }
    }
    candidates
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn solution(id: &str, category: &str, description: &str) -> String {
        format!(
            "  <solution>\n    <id>{id}</id>\n    <category>{category}</category>\n    \
             <description>{description}</description>\n  </solution>\n"
        )
    }

    fn document(records: &[(&str, &str, &str)]) -> String {
        let mut doc = String::from("<?xml version='1.0' encoding='utf-8'?>\n<common-solutions>\n");
        for (id, cat, desc) in records {
            doc.push_str(&solution(id, cat, desc));
        }
        doc.push_str("</common-solutions>\n");
        doc
    }

    #[test]
    fn extracts_fields_and_raw_block() {
        let doc = document(&[("sol-1", "debugging", "null &amp; void")]);
        let records = extract_records(&doc, &RecordFields::default());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "sol-1");
        assert_eq!(records[0].category, "debugging");
        assert_eq!(records[0].description, "null & void");
        assert!(records[0].raw_block.starts_with("<solution>"));
        assert!(records[0].raw_block.ends_with("</solution>"));
        assert!(doc.contains(&records[0].raw_block));
    }

    #[test]
    fn block_without_id_is_skipped() {
        let doc = format!(
            "{}<solution><category>debugging</category></solution>{}",
            solution("a", "debugging", "x"),
            solution("b", "debugging", "y"),
        );
        let ids: Vec<_> = extract_records(&doc, &RecordFields::default())
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn near_duplicates_in_one_category() {
        let doc = document(&[
            ("sol-1", "debugging", "null pointer in parser"),
            ("sol-2", "debugging", "null pointer in parser module"),
            ("sol-3", "testing", "null pointer in parser"),
        ]);
        let found = find_duplicates(&doc, DEFAULT_SIMILARITY_THRESHOLD);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].record_a.id, "sol-1");
        assert_eq!(found[0].record_b.id, "sol-2");
        assert!(found[0].similarity >= 0.7);
    }

    #[test]
    fn identical_text_across_categories_is_not_a_duplicate() {
        let doc = document(&[
            ("a", "debugging", "flaky network timeout"),
            ("b", "testing", "flaky network timeout"),
        ]);
        assert!(find_duplicates(&doc, 0.1).is_empty());
    }

    #[test]
    fn candidates_follow_pair_discovery_order() {
        let doc = document(&[
            ("r0", "ops", "restart the worker pool"),
            ("r1", "ops", "restart the worker pools"),
            ("r2", "docs", "unrelated"),
            ("r3", "ops", "restart the worker pool!"),
        ]);
        let pairs: Vec<_> = find_duplicates(&doc, 0.7)
            .into_iter()
            .map(|c| (c.record_a.id, c.record_b.id))
            .collect();
        let expected = vec![
            ("r0".to_string(), "r1".to_string()),
            ("r0".to_string(), "r3".to_string()),
            ("r1".to_string(), "r3".to_string()),
        ];
        assert_eq!(pairs, expected);
    }

    #[test]
    fn threshold_is_inclusive() {
        let doc = document(&[("a", "c", "abcd"), ("b", "c", "abcx")]);
        assert_eq!(find_duplicates(&doc, 0.75).len(), 1);
        assert!(find_duplicates(&doc, 0.76).is_empty());
    }

    #[test]
    fn custom_record_fields() {
        let doc = "<fix><key>k1</key><area>io</area><text>disk full</text></fix>\
                   <fix><key>k2</key><area>io</area><text>disk full!</text></fix>";
        let fields = RecordFields {
            block: "fix".to_string(),
            id_field: "key".to_string(),
            category_field: "area".to_string(),
            description_field: "text".to_string(),
        };
        let found = find_duplicates_with(doc, &fields, 0.7);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].record_a.category, "io");
    }

    #[test]
    fn empty_document_has_no_candidates() {
        assert!(find_duplicates("", 0.7).is_empty());
        assert!(find_duplicates("<solutions/>", 0.7).is_empty());
    }
}
