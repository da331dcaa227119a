//! Request/response DTOs exchanged with the table-setup backend (serde
//! ready). Wire field names follow the backend's camelCase convention.

use serde::{Deserialize, Serialize};

use crate::criteria::SearchCriterion;
use crate::domain::PlayOption;

//
// Mutating submissions (one per source mode)
//

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeSubmitRequest {
    pub lexicon: u32,
    /// YYYY-MM-DD
    pub date: String,
    /// None when the user never picked a challenge; the server rejects it.
    pub challenge: Option<u32>,
    pub tablenum: u32,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSubmitRequest {
    pub lexicon: u32,
    pub search_criteria: Vec<SearchCriterion>,
    pub desired_time: f64,
    pub questions_per_round: u32,
    pub tablenum: u32,
    pub multiplayer: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedListSubmitRequest {
    pub lexicon: u32,
    pub desired_time: f64,
    pub questions_per_round: u32,
    pub selected_list: u32,
    pub tablenum: u32,
    pub list_option: PlayOption,
    pub multiplayer: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltListSubmitRequest {
    pub lexicon: u32,
    pub desired_time: f64,
    pub questions_per_round: u32,
    pub selected_list: Option<u32>,
    pub tablenum: u32,
    pub multiplayer: bool,
}

/// The new table/list payload every play submission resolves to. Callers
/// load it into the current table; the full body is passed through opaquely
/// in `extra`.
#[derive(Clone, Debug, Deserialize)]
pub struct TablePayload {
    pub tablenum: u32,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

//
// Legacy flashcard submissions (flattened form fields; caller redirects)
//

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFlashcardForm {
    pub action: String,
    pub lexicon: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability_min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability_max: Option<i64>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedListFlashcardForm {
    pub action: String,
    pub lexicon: u32,
    pub word_list: u32,
    /// Fixed placeholder the legacy form validator requires; no effect.
    pub list_option: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltListFlashcardForm {
    pub action: String,
    pub lexicon: u32,
    pub named_list: Option<u32>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FlashcardResponse {
    pub url: String,
}

//
// Read-only inventory/data loads
//

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct PlayedChallenge {
    #[serde(rename = "challengeID")]
    pub challenge_id: u32,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeLeaderboard {
    #[serde(default)]
    pub challenge_name: Option<String>,
    #[serde(default)]
    pub entries: Vec<LeaderboardRow>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct LeaderboardRow {
    pub user: String,
    pub score: u32,
    /// Seconds remaining on the clock when the player finished.
    #[serde(rename = "tr")]
    pub time_remaining: u32,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct SavedListInventory {
    #[serde(default)]
    pub lists: Vec<SavedListInfo>,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub limits: SavedListLimits,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedListInfo {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub num_alphagrams: u32,
    #[serde(default)]
    pub gone_thru_once: bool,
    #[serde(default)]
    pub last_saved: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct SavedListLimits {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub current: u32,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltListInfo {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub word_count: u32,
}
