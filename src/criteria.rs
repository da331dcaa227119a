//! The ordered set of word-search criterion rows and its invariants.
//!
//! Rules enforced here:
//!   - at most one row per category
//!   - the set never becomes empty (the last row cannot be removed)
//!   - `add()` picks the first unrepresented category in priority order
//!
//! The two refusal cases (remove last row, add with all categories taken)
//! are signalled by booleans, not errors: the UI disables the affordance.
//! Ranges are deliberately NOT clamped when a row's category changes; the
//! backend validates ranges at submission time.

use serde::{Deserialize, Serialize};

use crate::domain::SearchCategory;

/// One active constraint row within a word search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriterion {
    pub search_type: SearchCategory,
    pub min_value: i64,
    pub max_value: i64,
    /// Only meaningful for `EnumeratedList` categories (comma-separated).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value_list: String,
}

impl SearchCriterion {
    /// A fresh row spanning the category's full allowed range.
    pub fn full_range(category: SearchCategory) -> Self {
        let (min, max) = category.bounds();
        Self {
            search_type: category,
            min_value: min,
            max_value: max,
            value_list: String::new(),
        }
    }
}

/// Which field of a row [`SearchCriteriaSet::set_field`] mutates. No
/// cross-field clamping happens on edit; `min_value` may exceed `max_value`
/// transiently until submission.
#[derive(Clone, Debug, PartialEq)]
pub enum CriterionField {
    Min(i64),
    Max(i64),
    ValueList(String),
}

/// Ordered collection of criterion rows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchCriteriaSet {
    rows: Vec<SearchCriterion>,
}

impl Default for SearchCriteriaSet {
    fn default() -> Self {
        Self::default_word_search()
    }
}

impl SearchCriteriaSet {
    /// The starting criteria for a fresh word search: five-letter words in
    /// the top-100 probability band.
    pub fn default_word_search() -> Self {
        Self {
            rows: vec![
                SearchCriterion {
                    search_type: SearchCategory::Length,
                    min_value: 5,
                    max_value: 5,
                    value_list: String::new(),
                },
                SearchCriterion {
                    search_type: SearchCategory::Probability,
                    min_value: 1,
                    max_value: 100,
                    value_list: String::new(),
                },
            ],
        }
    }

    pub fn rows(&self) -> &[SearchCriterion] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn has_category(&self, category: SearchCategory) -> bool {
        self.rows.iter().any(|r| r.search_type == category)
    }

    /// The category a call to `add()` would pick, if any remain.
    pub fn next_category(&self) -> Option<SearchCategory> {
        SearchCategory::PRIORITY
            .into_iter()
            .find(|c| !self.has_category(*c))
    }

    pub fn can_add(&self) -> bool {
        self.next_category().is_some()
    }

    /// Append a row for the first unrepresented category, defaulted to its
    /// full allowed range. Returns false (and changes nothing) once every
    /// category already has a row.
    pub fn add(&mut self) -> bool {
        match self.next_category() {
            Some(category) => {
                self.rows.push(SearchCriterion::full_range(category));
                true
            }
            None => false,
        }
    }

    /// Whether remove is currently refused (sole remaining row). Exposed so
    /// calling UIs can disable the action instead of silently failing.
    pub fn remove_disabled(&self) -> bool {
        self.rows.len() == 1
    }

    /// Remove the row at `index`. Returns false without changes when the
    /// index is out of range or the row is the last one standing.
    pub fn remove(&mut self, index: usize) -> bool {
        if self.remove_disabled() || index >= self.rows.len() {
            return false;
        }
        self.rows.remove(index);
        true
    }

    /// Reassign a row's category. The row's range is left untouched even if
    /// it now falls outside the new category's bounds; submission-time
    /// validation owns that. Refused (false) when another row already has
    /// the category, or the index is out of range.
    pub fn set_category(&mut self, index: usize, category: SearchCategory) -> bool {
        if index >= self.rows.len() {
            return false;
        }
        if self.rows[index].search_type == category {
            return true;
        }
        if self.has_category(category) {
            return false;
        }
        self.rows[index].search_type = category;
        true
    }

    /// Mutate one field of one row. Total for any in-range index.
    pub fn set_field(&mut self, index: usize, field: CriterionField) -> bool {
        let Some(row) = self.rows.get_mut(index) else {
            return false;
        };
        match field {
            CriterionField::Min(v) => row.min_value = v,
            CriterionField::Max(v) => row.max_value = v,
            CriterionField::ValueList(v) => row.value_list = v,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_set_has_length_and_probability() {
        let set = SearchCriteriaSet::default_word_search();
        assert_eq!(set.len(), 2);
        assert_eq!(set.rows()[0].search_type, SearchCategory::Length);
        assert_eq!((set.rows()[0].min_value, set.rows()[0].max_value), (5, 5));
        assert_eq!(set.rows()[1].search_type, SearchCategory::Probability);
        assert_eq!((set.rows()[1].min_value, set.rows()[1].max_value), (1, 100));
    }

    #[test]
    fn add_walks_priority_order_and_never_duplicates() {
        let mut set = SearchCriteriaSet::default_word_search();
        assert!(set.add());
        assert_eq!(set.rows()[2].search_type, SearchCategory::Points);
        assert!(set.add());
        assert_eq!(set.rows()[3].search_type, SearchCategory::NumAnagrams);
        // min(totalCategories, initialSize + 2)
        assert_eq!(set.len(), 4);

        assert!(set.add());
        assert!(set.add());
        assert_eq!(set.len(), SearchCategory::PRIORITY.len());
        // All categories represented: add becomes a no-op.
        assert!(!set.can_add());
        assert!(!set.add());
        assert_eq!(set.len(), SearchCategory::PRIORITY.len());

        let mut seen = std::collections::HashSet::new();
        for row in set.rows() {
            assert!(seen.insert(row.search_type), "duplicate category");
        }
    }

    #[test]
    fn added_row_spans_full_allowed_range() {
        let mut set = SearchCriteriaSet::default_word_search();
        set.add();
        let row = &set.rows()[2];
        assert_eq!(row.min_value, row.search_type.min_allowed());
        assert_eq!(row.max_value, row.search_type.max_allowed());
    }

    #[test]
    fn last_row_cannot_be_removed() {
        let mut set = SearchCriteriaSet::default_word_search();
        assert!(!set.remove_disabled());
        assert!(set.remove(1));
        assert_eq!(set.len(), 1);
        assert!(set.remove_disabled());
        assert!(!set.remove(0));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remove_out_of_range_is_refused() {
        let mut set = SearchCriteriaSet::default_word_search();
        assert!(!set.remove(5));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn set_category_keeps_range_unclamped() {
        let mut set = SearchCriteriaSet::default_word_search();
        // Probability row 1..100 reassigned to Length (bounds 2..15): the
        // range is deliberately left as-is.
        assert!(set.remove(0));
        assert!(set.set_category(0, SearchCategory::Length));
        assert_eq!(set.rows()[0].search_type, SearchCategory::Length);
        assert_eq!((set.rows()[0].min_value, set.rows()[0].max_value), (1, 100));
    }

    #[test]
    fn set_category_refuses_duplicates() {
        let mut set = SearchCriteriaSet::default_word_search();
        assert!(!set.set_category(1, SearchCategory::Length));
        assert_eq!(set.rows()[1].search_type, SearchCategory::Probability);
        // Reassigning a row to its own category is fine.
        assert!(set.set_category(1, SearchCategory::Probability));
    }

    #[test]
    fn set_field_allows_transient_inversion() {
        let mut set = SearchCriteriaSet::default_word_search();
        assert!(set.set_field(0, CriterionField::Min(10)));
        assert!(set.set_field(0, CriterionField::Max(3)));
        assert_eq!((set.rows()[0].min_value, set.rows()[0].max_value), (10, 3));
        assert!(!set.set_field(9, CriterionField::Min(1)));
    }

    #[test]
    fn value_list_is_per_row() {
        let mut set = SearchCriteriaSet::default_word_search();
        while set.can_add() {
            set.add();
        }
        let tags_idx = set
            .rows()
            .iter()
            .position(|r| r.search_type == SearchCategory::Tags)
            .unwrap();
        assert!(set.set_field(tags_idx, CriterionField::ValueList("hard,seen".into())));
        assert_eq!(set.rows()[tags_idx].value_list, "hard,seen");
    }
}
