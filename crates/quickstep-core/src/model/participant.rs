use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A scored entrant within one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub category_id: String,
    /// Competition bib. Unique within a category when non-empty.
    #[serde(default)]
    pub number: String,
    pub name: String,
    /// Stale-data fallback written by earlier versions of the surrounding
    /// app. When present it overrides the live average recomputation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_score: Option<f64>,
}

impl Participant {
    /// Display ordering: bib number (numeric-aware) then name.
    ///
    /// Bibs that parse as integers sort numerically and ahead of non-numeric
    /// bibs, so "2" comes before "10" and both before "A1".
    pub fn display_cmp(&self, other: &Participant) -> Ordering {
        compare_numbers(&self.number, &other.number).then_with(|| self.name.cmp(&other.name))
    }
}

fn compare_numbers(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<u64>(), b.trim().parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
