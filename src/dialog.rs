//! The table-setup dialog orchestrator.
//!
//! An explicit handle the owning UI holds (`open`/`close`/`reset`), not a
//! shared singleton. It owns the session draft, the per-mode data caches,
//! and the guard context; everything that crosses back to the UI goes out
//! through the [`DialogEvent`] channel returned by [`TableSetupDialog::new`]:
//! new-list payloads, redirects, alerts, and confirmation prompts.
//!
//! Confirmation is modeled as a suspended action: a `Confirm` decision from
//! the preflight guard parks the submission until the user resolves it with
//! `confirm()` or `cancel()`.

use chrono::NaiveDate;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, instrument};

use crate::api::SetupApi;
use crate::binder::AsyncDataBinder;
use crate::criteria::CriterionField;
use crate::dispatch::{self, SavedListOutcome};
use crate::domain::{ChallengeInfo, PlayOption, SearchCategory, SourceMode};
use crate::draft::{reduce, DraftEvent, SessionDraft};
use crate::guard::{self, PreflightContext, PreflightDecision};
use crate::protocol::TablePayload;
use crate::util::BusyFlag;

/// Everything the dialog reports back to the embedding UI.
#[derive(Debug)]
pub enum DialogEvent {
    /// A submission succeeded; load this into the current table.
    LoadNewList(TablePayload),
    /// A flashcard submission succeeded; navigate the browser here.
    Redirect(String),
    /// Dismissable error notification.
    Alert { title: String, message: String },
    /// A submission is parked pending explicit user confirmation.
    ConfirmNeeded { prompt: String },
}

/// Where the viewer currently sits, for the preflight guard.
#[derive(Clone, Debug)]
pub struct TableContext {
    /// Existing table targeted by submissions; 0 means none.
    pub tablenum: u32,
    pub current_host: String,
    pub username: String,
    pub table_is_multiplayer: bool,
    pub game_going: bool,
}

/// One submission-triggering user action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitAction {
    Challenge,
    WordSearch,
    SavedList { list_id: u32, option: PlayOption },
    PrebuiltList,
    FlashcardWordSearch,
    FlashcardSavedList { list_id: u32, option: PlayOption },
    FlashcardPrebuiltList,
}

/// URL of an existing table, for join-style redirects.
pub fn join_table_url(tablenum: u32) -> String {
    format!("/table/{}", tablenum)
}

pub struct TableSetupDialog<A: SetupApi> {
    api: A,
    ctx: TableContext,
    draft: SessionDraft,
    binder: AsyncDataBinder,
    busy: BusyFlag,
    events: UnboundedSender<DialogEvent>,
    pending: Option<SubmitAction>,
    is_open: bool,
}

impl<A: SetupApi> TableSetupDialog<A> {
    pub fn new(
        api: A,
        ctx: TableContext,
        lexicon: u32,
        today: NaiveDate,
    ) -> (Self, UnboundedReceiver<DialogEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let busy = BusyFlag::new();
        let dialog = Self {
            api,
            ctx,
            draft: SessionDraft::new(lexicon, today),
            binder: AsyncDataBinder::new(busy.clone()),
            busy,
            events: tx,
            pending: None,
            is_open: false,
        };
        (dialog, rx)
    }

    pub fn draft(&self) -> &SessionDraft {
        &self.draft
    }

    pub fn binder(&self) -> &AsyncDataBinder {
        &self.binder
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn has_pending_confirmation(&self) -> bool {
        self.pending.is_some()
    }

    /// The guard context can go stale while the dialog sits open (hosts
    /// change, games start); the owner pushes updates here.
    pub fn set_table_context(&mut self, ctx: TableContext) {
        self.ctx = ctx;
    }

    /// Open the dialog and re-fetch the active mode's data. Nothing
    /// persists client-side across close/reopen except the draft itself.
    pub async fn open(&mut self) {
        self.is_open = true;
        self.reset().await;
    }

    pub fn close(&mut self) {
        self.is_open = false;
        self.pending = None;
    }

    /// Reload whatever the active mode renders against.
    pub async fn reset(&mut self) {
        self.load_for_mode(self.draft.active_mode).await;
    }

    #[instrument(level = "info", skip(self))]
    async fn load_for_mode(&mut self, mode: SourceMode) {
        match mode {
            SourceMode::Challenge => {
                self.binder
                    .load_challenge_history(&self.api, self.draft.lexicon, self.draft.current_date)
                    .await;
                self.binder
                    .load_leaderboard(
                        &self.api,
                        self.draft.lexicon,
                        self.draft.current_date,
                        self.draft.current_challenge,
                    )
                    .await;
            }
            // Word-search criteria are edited entirely client-side.
            SourceMode::WordSearch => {}
            SourceMode::SavedList => {
                self.binder.load_saved_lists(&self.api, self.draft.lexicon).await;
            }
            SourceMode::PrebuiltList => {
                let first = self
                    .binder
                    .load_prebuilt_lists(&self.api, self.draft.lexicon)
                    .await;
                if let Some(first) = first {
                    if self.draft.selected_prebuilt.is_none() {
                        self.draft = reduce(&self.draft, &DraftEvent::PrebuiltSelected(first));
                    }
                }
            }
        }
    }

    /// Switch the active source mode. Data for the newly active mode is
    /// reloaded unconditionally; it may have gone stale while hidden.
    pub async fn select_mode(&mut self, mode: SourceMode) {
        self.draft = reduce(&self.draft, &DraftEvent::ModeSelected(mode));
        self.load_for_mode(mode).await;
    }

    /// A lexicon change reloads the active mode's data and also counts as a
    /// challenge-params change for any selected challenge's leaderboard.
    pub async fn set_lexicon(&mut self, lexicon: u32) {
        self.draft = reduce(&self.draft, &DraftEvent::LexiconChanged(lexicon));
        self.load_for_mode(self.draft.active_mode).await;
        if self.draft.active_mode != SourceMode::Challenge {
            self.binder
                .load_leaderboard(
                    &self.api,
                    self.draft.lexicon,
                    self.draft.current_date,
                    self.draft.current_challenge,
                )
                .await;
        }
    }

    pub async fn set_date(&mut self, date: NaiveDate) {
        self.draft = reduce(&self.draft, &DraftEvent::DateChanged(date));
        self.load_for_mode(self.draft.active_mode).await;
        if self.draft.active_mode != SourceMode::Challenge {
            self.binder
                .load_leaderboard(
                    &self.api,
                    self.draft.lexicon,
                    self.draft.current_date,
                    self.draft.current_challenge,
                )
                .await;
        }
    }

    /// Select a challenge; its fixed duration/question count overwrite the
    /// session fields and multiplayer turns off.
    pub async fn select_challenge(&mut self, info: &ChallengeInfo) {
        self.draft = reduce(
            &self.draft,
            &DraftEvent::ChallengeSelected {
                id: info.id,
                seconds: info.seconds,
                num_questions: info.num_questions,
            },
        );
        self.binder
            .load_leaderboard(
                &self.api,
                self.draft.lexicon,
                self.draft.current_date,
                self.draft.current_challenge,
            )
            .await;
    }

    pub fn set_multiplayer(&mut self, on: bool) {
        self.draft = reduce(&self.draft, &DraftEvent::MultiplayerSet(on));
    }

    pub fn select_prebuilt(&mut self, id: u32) {
        self.draft = reduce(&self.draft, &DraftEvent::PrebuiltSelected(id));
    }

    //
    // Criteria-row passthrough. The refusal cases come back as false and
    // surface as disabled affordances, never as errors.
    //

    pub fn add_search_row(&mut self) -> bool {
        self.draft.criteria.add()
    }

    pub fn can_add_search_row(&self) -> bool {
        self.draft.criteria.can_add()
    }

    pub fn remove_search_row(&mut self, index: usize) -> bool {
        self.draft.criteria.remove(index)
    }

    pub fn remove_search_row_disabled(&self) -> bool {
        self.draft.criteria.remove_disabled()
    }

    pub fn set_search_category(&mut self, index: usize, category: SearchCategory) -> bool {
        self.draft.criteria.set_category(index, category)
    }

    pub fn set_search_field(&mut self, index: usize, field: CriterionField) -> bool {
        self.draft.criteria.set_field(index, field)
    }

    /// Upload a word-list file; a successful upload refreshes the saved-list
    /// inventory.
    #[instrument(level = "info", skip(self, contents))]
    pub async fn upload_list(&mut self, file_name: &str, contents: Vec<u8>) {
        let res = {
            let _busy = self.busy.acquire();
            self.api
                .upload_list(file_name, contents, self.draft.lexicon)
                .await
        };
        match res {
            Ok(()) => {
                self.binder.load_saved_lists(&self.api, self.draft.lexicon).await;
            }
            Err(e) => self.alert(format!("Failed to upload list: {}", e)),
        }
    }

    /// Run the preflight guard and either dispatch now, refuse with an
    /// alert, or park the action pending confirmation. While an action is
    /// parked, further submissions are ignored until the user resolves the
    /// prompt with `confirm()` or `cancel()`.
    #[instrument(level = "info", skip(self))]
    pub async fn submit(&mut self, action: SubmitAction) {
        if self.pending.is_some() {
            debug!(target: "setup_dialog", ?action, "Ignoring submission while one awaits confirmation");
            return;
        }
        let ctx = PreflightContext {
            game_going: self.ctx.game_going,
            current_host: self.ctx.current_host.clone(),
            username: self.ctx.username.clone(),
            tablenum: self.ctx.tablenum,
            table_is_multiplayer: self.ctx.table_is_multiplayer,
            requested_multiplayer: self.draft.multiplayer_on,
        };
        match guard::evaluate(&ctx) {
            PreflightDecision::Proceed => self.execute(action).await,
            PreflightDecision::Block { message } => self.alert(message),
            PreflightDecision::Confirm { prompt } => {
                self.pending = Some(action);
                self.send(DialogEvent::ConfirmNeeded { prompt });
            }
        }
    }

    /// Resume the parked submission, if any.
    pub async fn confirm(&mut self) {
        if let Some(action) = self.pending.take() {
            info!(target: "setup_dialog", ?action, "Confirmed pending submission");
            self.execute(action).await;
        }
    }

    /// Drop the parked submission, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    async fn execute(&mut self, action: SubmitAction) {
        let tablenum = self.ctx.tablenum;
        match action {
            SubmitAction::Challenge => {
                match dispatch::submit_challenge(&self.api, &self.busy, &self.draft, tablenum).await
                {
                    Ok(payload) => self.send(DialogEvent::LoadNewList(payload)),
                    Err(e) => self.alert(format!("Failed to load challenge: {}", e)),
                }
            }
            SubmitAction::WordSearch => {
                match dispatch::submit_search(&self.api, &self.busy, &self.draft, tablenum).await {
                    Ok(payload) => self.send(DialogEvent::LoadNewList(payload)),
                    Err(e) => self.alert(format!("Failed to load search: {}", e)),
                }
            }
            SubmitAction::SavedList { list_id, option } => {
                match dispatch::submit_saved_list(
                    &self.api, &self.busy, &self.draft, tablenum, list_id, option,
                )
                .await
                {
                    Ok(SavedListOutcome::Loaded(payload)) => {
                        self.send(DialogEvent::LoadNewList(payload));
                    }
                    Ok(SavedListOutcome::Deleted) => {
                        // No session load; just bring the inventory current.
                        self.binder.load_saved_lists(&self.api, self.draft.lexicon).await;
                    }
                    Err(e) => {
                        let verb = if option == PlayOption::Delete {
                            "delete"
                        } else {
                            "load"
                        };
                        self.alert(format!("Failed to {} list: {}", verb, e));
                    }
                }
            }
            SubmitAction::PrebuiltList => {
                match dispatch::submit_prebuilt_list(&self.api, &self.busy, &self.draft, tablenum)
                    .await
                {
                    Ok(payload) => self.send(DialogEvent::LoadNewList(payload)),
                    Err(e) => self.alert(format!("Failed to load list: {}", e)),
                }
            }
            SubmitAction::FlashcardWordSearch => {
                match dispatch::submit_search_flashcards(&self.api, &self.busy, &self.draft).await {
                    Ok(url) => self.send(DialogEvent::Redirect(url)),
                    Err(e) => self.alert(format!("Failed to process: {}", e)),
                }
            }
            SubmitAction::FlashcardSavedList { list_id, option } => {
                match dispatch::submit_saved_list_flashcards(
                    &self.api, &self.busy, &self.draft, list_id, option,
                )
                .await
                {
                    Ok(url) => self.send(DialogEvent::Redirect(url)),
                    Err(e) => self.alert(format!("Failed to process: {}", e)),
                }
            }
            SubmitAction::FlashcardPrebuiltList => {
                match dispatch::submit_prebuilt_list_flashcards(&self.api, &self.busy, &self.draft)
                    .await
                {
                    Ok(url) => self.send(DialogEvent::Redirect(url)),
                    Err(e) => self.alert(format!("Failed to process: {}", e)),
                }
            }
        }
    }

    fn alert(&self, message: String) {
        self.send(DialogEvent::Alert {
            title: "Error".to_string(),
            message,
        });
    }

    fn send(&self, event: DialogEvent) {
        // A dropped receiver just means nobody is rendering anymore.
        let _ = self.events.send(event);
    }
}
