//! HTTP client for the table-setup backend.
//!
//! One operation per backend endpoint; play/search submissions speak JSON,
//! the legacy flashcard endpoint speaks form fields. Calls are instrumented
//! and log status and latencies, not payload contents.
//!
//! `SetupApi` is the seam the orchestrator is generic over, so tests can
//! drive the whole dialog with an in-memory fake.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::instrument;

use crate::config::SetupConfig;
use crate::protocol::{
  ChallengeLeaderboard, ChallengeSubmitRequest, FlashcardResponse, PlayedChallenge,
  PrebuiltListFlashcardForm, PrebuiltListInfo, PrebuiltListSubmitRequest, SavedListFlashcardForm,
  SavedListInventory, SavedListSubmitRequest, SearchFlashcardForm, SearchSubmitRequest,
  TablePayload,
};

const CHALLENGES_PLAYED_PATH: &str = "/api/challenges_played/";
const CHALLENGERS_PATH: &str = "/api/challengers/";
const NEW_CHALLENGE_PATH: &str = "/api/new_challenge/";
const NEW_SEARCH_PATH: &str = "/api/new_search/";
const SAVED_LISTS_PATH: &str = "/api/saved_lists/";
const LOAD_SAVED_LIST_PATH: &str = "/api/load_saved_list/";
const SAVED_LIST_PATH: &str = "/api/saved_list/";
const LIST_UPLOAD_PATH: &str = "/api/list_upload/";
const PREBUILT_LISTS_PATH: &str = "/api/prebuilt_lists/";
const LOAD_PREBUILT_LIST_PATH: &str = "/api/load_prebuilt_list/";

/// Backend collaborator contract, one async operation per endpoint.
/// All errors are the server/transport message to show the user.
#[allow(async_fn_in_trait)]
pub trait SetupApi {
  async fn challenges_played(
    &self,
    lexicon: u32,
    date: &str,
  ) -> Result<Vec<PlayedChallenge>, String>;

  async fn challenge_leaderboard(
    &self,
    lexicon: u32,
    date: &str,
    challenge: u32,
  ) -> Result<ChallengeLeaderboard, String>;

  async fn new_challenge(&self, req: &ChallengeSubmitRequest) -> Result<TablePayload, String>;

  async fn new_search(&self, req: &SearchSubmitRequest) -> Result<TablePayload, String>;

  async fn saved_lists(&self, lexicon: u32) -> Result<SavedListInventory, String>;

  async fn load_saved_list(&self, req: &SavedListSubmitRequest) -> Result<TablePayload, String>;

  /// Destructive; keyed by list id, distinct from the play endpoint.
  async fn delete_saved_list(&self, list_id: u32) -> Result<(), String>;

  async fn upload_list(
    &self,
    file_name: &str,
    contents: Vec<u8>,
    lexicon: u32,
  ) -> Result<(), String>;

  async fn prebuilt_lists(&self, lexicon: u32) -> Result<Vec<PrebuiltListInfo>, String>;

  async fn load_prebuilt_list(
    &self,
    req: &PrebuiltListSubmitRequest,
  ) -> Result<TablePayload, String>;

  async fn flashcard_search(&self, form: &SearchFlashcardForm)
    -> Result<FlashcardResponse, String>;

  async fn flashcard_saved_list(
    &self,
    form: &SavedListFlashcardForm,
  ) -> Result<FlashcardResponse, String>;

  async fn flashcard_prebuilt_list(
    &self,
    form: &PrebuiltListFlashcardForm,
  ) -> Result<FlashcardResponse, String>;
}

/// reqwest-backed implementation of [`SetupApi`].
#[derive(Clone)]
pub struct HttpApi {
  client: reqwest::Client,
  base_url: String,
  flashcard_url: String,
}

impl HttpApi {
  pub fn new(cfg: &SetupConfig) -> Result<Self, String> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(cfg.request_timeout_secs))
      .build()
      .map_err(|e| e.to_string())?;
    Ok(Self {
      client,
      base_url: cfg.base_url.trim_end_matches('/').to_string(),
      flashcard_url: cfg.flashcard_url.clone(),
    })
  }

  #[instrument(level = "debug", skip(self, query), fields(%path))]
  async fn get_json<T: DeserializeOwned>(
    &self,
    path: &str,
    query: &[(&str, String)],
  ) -> Result<T, String> {
    let url = format!("{}{}", self.base_url, path);
    let res = self.client.get(&url)
      .header(USER_AGENT, "wordquiz-setup/0.1")
      .query(query)
      .send().await.map_err(|e| e.to_string())?;
    read_json(res).await
  }

  #[instrument(level = "debug", skip(self, body), fields(%path))]
  async fn post_json<B: Serialize, T: DeserializeOwned>(
    &self,
    path: &str,
    body: &B,
  ) -> Result<T, String> {
    let url = format!("{}{}", self.base_url, path);
    let res = self.client.post(&url)
      .header(USER_AGENT, "wordquiz-setup/0.1")
      .header(CONTENT_TYPE, "application/json")
      .json(body)
      .send().await.map_err(|e| e.to_string())?;
    read_json(res).await
  }

  #[instrument(level = "debug", skip(self, form))]
  async fn post_flashcard_form<B: Serialize>(
    &self,
    form: &B,
  ) -> Result<FlashcardResponse, String> {
    let res = self.client.post(&self.flashcard_url)
      .header(USER_AGENT, "wordquiz-setup/0.1")
      .form(form)
      .send().await.map_err(|e| e.to_string())?;
    read_json(res).await
  }
}

/// Check the status, then decode. Non-2xx bodies are mined for the server's
/// error message so the notification layer can show it verbatim.
async fn read_json<T: DeserializeOwned>(res: reqwest::Response) -> Result<T, String> {
  if !res.status().is_success() {
    return Err(status_error(res).await);
  }
  res.json::<T>().await.map_err(|e| e.to_string())
}

async fn read_empty(res: reqwest::Response) -> Result<(), String> {
  if !res.status().is_success() {
    return Err(status_error(res).await);
  }
  Ok(())
}

/// Turn a non-2xx response into the user-facing message.
async fn status_error(res: reqwest::Response) -> String {
  let status = res.status();
  let body = res.text().await.unwrap_or_default();
  let msg = extract_server_error(&body).unwrap_or(body);
  format!("HTTP {}: {}", status, msg)
}

/// The backend reports errors either as a bare JSON string or as
/// `{"error": "..."}`; accept both.
fn extract_server_error(body: &str) -> Option<String> {
  #[derive(serde::Deserialize)]
  struct EWrap {
    error: String,
  }
  if let Ok(w) = serde_json::from_str::<EWrap>(body) {
    return Some(w.error);
  }
  serde_json::from_str::<String>(body).ok()
}

impl SetupApi for HttpApi {
  #[instrument(level = "info", skip(self), fields(%lexicon, %date))]
  async fn challenges_played(
    &self,
    lexicon: u32,
    date: &str,
  ) -> Result<Vec<PlayedChallenge>, String> {
    self.get_json(
      CHALLENGES_PLAYED_PATH,
      &[("lexicon", lexicon.to_string()), ("date", date.to_string())],
    ).await
  }

  #[instrument(level = "info", skip(self), fields(%lexicon, %date, %challenge))]
  async fn challenge_leaderboard(
    &self,
    lexicon: u32,
    date: &str,
    challenge: u32,
  ) -> Result<ChallengeLeaderboard, String> {
    self.get_json(
      CHALLENGERS_PATH,
      &[
        ("lexicon", lexicon.to_string()),
        ("date", date.to_string()),
        ("challenge", challenge.to_string()),
      ],
    ).await
  }

  #[instrument(level = "info", skip(self, req), fields(lexicon = req.lexicon))]
  async fn new_challenge(&self, req: &ChallengeSubmitRequest) -> Result<TablePayload, String> {
    self.post_json(NEW_CHALLENGE_PATH, req).await
  }

  #[instrument(level = "info", skip(self, req), fields(lexicon = req.lexicon, rows = req.search_criteria.len()))]
  async fn new_search(&self, req: &SearchSubmitRequest) -> Result<TablePayload, String> {
    self.post_json(NEW_SEARCH_PATH, req).await
  }

  #[instrument(level = "info", skip(self), fields(%lexicon))]
  async fn saved_lists(&self, lexicon: u32) -> Result<SavedListInventory, String> {
    // The saved-list inventory lives on the cards API, which takes slightly
    // different query parameters.
    self.get_json(
      SAVED_LISTS_PATH,
      &[
        ("lexicon_id", lexicon.to_string()),
        ("order_by", "modified".to_string()),
        ("temp", "0".to_string()),
        ("last_saved", "human".to_string()),
      ],
    ).await
  }

  #[instrument(level = "info", skip(self, req), fields(list = req.selected_list))]
  async fn load_saved_list(&self, req: &SavedListSubmitRequest) -> Result<TablePayload, String> {
    self.post_json(LOAD_SAVED_LIST_PATH, req).await
  }

  #[instrument(level = "info", skip(self), fields(%list_id))]
  async fn delete_saved_list(&self, list_id: u32) -> Result<(), String> {
    let url = format!("{}{}{}", self.base_url, SAVED_LIST_PATH, list_id);
    let res = self.client.delete(&url)
      .header(USER_AGENT, "wordquiz-setup/0.1")
      .send().await.map_err(|e| e.to_string())?;
    read_empty(res).await
  }

  #[instrument(level = "info", skip(self, contents), fields(%file_name, bytes = contents.len()))]
  async fn upload_list(
    &self,
    file_name: &str,
    contents: Vec<u8>,
    lexicon: u32,
  ) -> Result<(), String> {
    let url = format!("{}{}", self.base_url, LIST_UPLOAD_PATH);
    let part = reqwest::multipart::Part::bytes(contents).file_name(file_name.to_string());
    let form = reqwest::multipart::Form::new()
      .part("file", part)
      .text("lexicon", lexicon.to_string());
    let res = self.client.post(&url)
      .header(USER_AGENT, "wordquiz-setup/0.1")
      .multipart(form)
      .send().await.map_err(|e| e.to_string())?;
    read_empty(res).await
  }

  #[instrument(level = "info", skip(self), fields(%lexicon))]
  async fn prebuilt_lists(&self, lexicon: u32) -> Result<Vec<PrebuiltListInfo>, String> {
    self.get_json(PREBUILT_LISTS_PATH, &[("lexicon", lexicon.to_string())]).await
  }

  #[instrument(level = "info", skip(self, req), fields(list = ?req.selected_list))]
  async fn load_prebuilt_list(
    &self,
    req: &PrebuiltListSubmitRequest,
  ) -> Result<TablePayload, String> {
    self.post_json(LOAD_PREBUILT_LIST_PATH, req).await
  }

  #[instrument(level = "info", skip(self, form))]
  async fn flashcard_search(
    &self,
    form: &SearchFlashcardForm,
  ) -> Result<FlashcardResponse, String> {
    self.post_flashcard_form(form).await
  }

  #[instrument(level = "info", skip(self, form))]
  async fn flashcard_saved_list(
    &self,
    form: &SavedListFlashcardForm,
  ) -> Result<FlashcardResponse, String> {
    self.post_flashcard_form(form).await
  }

  #[instrument(level = "info", skip(self, form))]
  async fn flashcard_prebuilt_list(
    &self,
    form: &PrebuiltListFlashcardForm,
  ) -> Result<FlashcardResponse, String> {
    self.post_flashcard_form(form).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn server_error_extraction() {
    assert_eq!(
      extract_server_error("{\"error\": \"That list does not exist.\"}"),
      Some("That list does not exist.".to_string())
    );
    assert_eq!(
      extract_server_error("\"Cannot play a challenge twice.\""),
      Some("Cannot play a challenge twice.".to_string())
    );
    assert_eq!(extract_server_error("<html>gateway timeout</html>"), None);
  }
}
