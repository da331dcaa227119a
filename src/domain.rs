//! Domain models for table setup: source modes, search categories, play
//! options, and the reference data the dialog renders against.

use serde::{Deserialize, Serialize};

/// Default quiz length in minutes. Kept as a string because the duration
/// input is free-form and challenge overrides may carry fractions ("4.5").
pub const DEFAULT_TIME_PER_QUIZ: &str = "5";
pub const DEFAULT_QUESTIONS_PER_ROUND: u32 = 50;

/// The strategy used to populate a table's word list. Exactly one is active
/// at a time; switching preserves the other modes' sub-state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
  Challenge,
  WordSearch,
  SavedList,
  PrebuiltList,
}

impl SourceMode {
  pub const ALL: [SourceMode; 4] = [
    SourceMode::Challenge,
    SourceMode::WordSearch,
    SourceMode::SavedList,
    SourceMode::PrebuiltList,
  ];

  pub fn label(self) -> &'static str {
    match self {
      SourceMode::Challenge => "Single-Player Challenges",
      SourceMode::WordSearch => "Word Search",
      SourceMode::SavedList => "My saved lists",
      SourceMode::PrebuiltList => "Curated Lists",
    }
  }
}

/// What a criterion of this category constrains: a numeric range, or a
/// comma-separated list of values typed by the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryKind {
  Range,
  EnumeratedList,
}

/// Closed set of search-constraint categories. Each carries fixed allowed
/// bounds; `PRIORITY` is the order `add()` walks when picking the next
/// category for a fresh row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchCategory {
  Length,
  Probability,
  Points,
  NumAnagrams,
  NumVowels,
  Tags,
}

impl SearchCategory {
  pub const PRIORITY: [SearchCategory; 6] = [
    SearchCategory::Length,
    SearchCategory::Probability,
    SearchCategory::Points,
    SearchCategory::NumAnagrams,
    SearchCategory::NumVowels,
    SearchCategory::Tags,
  ];

  /// Fixed allowed value bounds. Ignored for `EnumeratedList` categories.
  pub fn bounds(self) -> (i64, i64) {
    match self {
      SearchCategory::Length => (2, 15),
      SearchCategory::Probability => (1, 250_000),
      SearchCategory::Points => (1, 100),
      SearchCategory::NumAnagrams => (1, 99),
      SearchCategory::NumVowels => (1, 15),
      SearchCategory::Tags => (0, 0),
    }
  }

  pub fn min_allowed(self) -> i64 {
    self.bounds().0
  }

  pub fn max_allowed(self) -> i64 {
    self.bounds().1
  }

  pub fn kind(self) -> CategoryKind {
    match self {
      SearchCategory::Tags => CategoryKind::EnumeratedList,
      _ => CategoryKind::Range,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      SearchCategory::Length => "Word Length",
      SearchCategory::Probability => "Probability Range",
      SearchCategory::Points => "Points",
      SearchCategory::NumAnagrams => "Number of Anagrams",
      SearchCategory::NumVowels => "Number of Vowels",
      SearchCategory::Tags => "Tags",
    }
  }
}

/// How a previously saved list is resumed. `Delete` is destructive and is
/// routed to a different endpoint than the play options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayOption {
  Continue,
  FirstMissed,
  StartOver,
  Delete,
}

impl PlayOption {
  pub fn wire_name(self) -> &'static str {
    match self {
      PlayOption::Continue => "continue",
      PlayOption::FirstMissed => "firstmissed",
      PlayOption::StartOver => "startover",
      PlayOption::Delete => "delete",
    }
  }
}

/// Reference data for one daily challenge, as the server describes it.
/// Selecting a challenge derives the session's duration and question count
/// from `seconds` / `num_questions`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeInfo {
  pub id: u32,
  pub seconds: u32,
  pub num_questions: u32,
  pub name: String,
  #[serde(default)]
  pub order_priority: i32,
}

/// Immutable lexicon reference data.
#[derive(Clone, Debug, Deserialize)]
pub struct LexiconInfo {
  pub id: u32,
  pub lexicon: String,
  #[serde(default)]
  pub description: String,
}
