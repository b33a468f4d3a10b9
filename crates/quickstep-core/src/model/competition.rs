use serde::{Deserialize, Serialize};

/// One scored column of a category's sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringItem {
    pub id: String,
    pub label: String,
    /// Column order. Dense sort key, not required to be unique.
    #[serde(default)]
    pub order: i32,
}

impl ScoringItem {
    /// "teamwork" is special-cased: it is skipped entirely for solo categories.
    pub fn is_teamwork(&self) -> bool {
        self.label.trim().eq_ignore_ascii_case("teamwork")
    }
}

/// A scored competition event (e.g. "Salsa Couple") within a competition.
///
/// A category owns its own scoring-item set; there is no global fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub items: Vec<ScoringItem>,
}

impl Category {
    /// Solo categories are flagged by name ("...SOLO...", case-insensitive).
    pub fn is_solo(&self) -> bool {
        self.name.to_lowercase().contains("solo")
    }

    /// Items in column order.
    pub fn sorted_items(&self) -> Vec<&ScoringItem> {
        let mut items: Vec<&ScoringItem> = self.items.iter().collect();
        items.sort_by_key(|item| item.order);
        items
    }

    /// Items that actually take scores for this category.
    ///
    /// Solo categories skip the "teamwork" column both for scoring and for
    /// the completeness check at submit time.
    pub fn scored_items(&self) -> Vec<&ScoringItem> {
        let solo = self.is_solo();
        self.sorted_items()
            .into_iter()
            .filter(|item| !(solo && item.is_teamwork()))
            .collect()
    }
}

/// Competition root: ordered categories plus the admin lock flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Competition {
    pub fn category(&self, category_id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == category_id)
    }

    pub fn category_mut(&mut self, category_id: &str) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| c.id == category_id)
    }

    /// Categories in display order.
    pub fn sorted_categories(&self) -> Vec<&Category> {
        let mut categories: Vec<&Category> = self.categories.iter().collect();
        categories.sort_by_key(|c| c.order);
        categories
    }

    /// Lock the competition. Cascades `locked = true` to every category.
    pub fn lock(&mut self) {
        self.locked = true;
        for category in &mut self.categories {
            category.locked = true;
        }
    }

    /// Unlock the competition. Categories stay locked; they are unlocked
    /// individually afterwards.
    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Set a single category's lock flag.
    ///
    /// Returns false if the category does not exist or if an unlock was
    /// refused because the competition itself is still locked.
    pub fn set_category_locked(&mut self, category_id: &str, locked: bool) -> bool {
        if !locked && self.locked {
            return false;
        }
        match self.category_mut(category_id) {
            Some(category) => {
                category.locked = locked;
                true
            }
            None => false,
        }
    }
}
