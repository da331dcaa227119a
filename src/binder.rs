//! Per-mode supporting data and the loads that keep it fresh.
//!
//! Each source mode renders against data fetched here: challenge
//! history/leaderboards, the saved-list inventory, and the prebuilt-list
//! catalog. Loads are silent-fail: a failed fetch logs, leaves the prior
//! data in place, and clears the busy flag. Submission errors are the only
//! errors surfaced to the user, and those live elsewhere.
//!
//! Every load takes a ticket from a per-fetch-kind counter before awaiting;
//! a response only lands if its ticket is still the latest issued for that
//! kind, so rapid mode/lexicon switching cannot apply an out-of-order
//! response over newer data.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::{debug, error, instrument};

use crate::api::SetupApi;
use crate::protocol::{
    ChallengeLeaderboard, PlayedChallenge, PrebuiltListInfo, SavedListInventory,
};
use crate::util::{wire_date, BusyFlag};

/// Snapshot of everything the mode dialogs render against.
#[derive(Clone, Debug, Default)]
pub struct ModeData {
    /// Challenges already completed at the current date (grays them out).
    pub challenges_done: Vec<PlayedChallenge>,
    /// Leaderboard for the currently selected challenge.
    pub leaderboard: ChallengeLeaderboard,
    pub saved_lists: SavedListInventory,
    pub prebuilt_lists: Vec<PrebuiltListInfo>,
}

#[derive(Default)]
struct Tickets {
    history: AtomicU64,
    leaderboard: AtomicU64,
    saved: AtomicU64,
    prebuilt: AtomicU64,
}

fn take(counter: &AtomicU64) -> u64 {
    counter.fetch_add(1, Ordering::SeqCst) + 1
}

fn is_latest(counter: &AtomicU64, ticket: u64) -> bool {
    counter.load(Ordering::SeqCst) == ticket
}

/// Owns the per-mode data caches and the shared busy flag.
#[derive(Clone)]
pub struct AsyncDataBinder {
    store: Arc<RwLock<ModeData>>,
    tickets: Arc<Tickets>,
    busy: BusyFlag,
}

impl AsyncDataBinder {
    pub fn new(busy: BusyFlag) -> Self {
        Self {
            store: Arc::new(RwLock::new(ModeData::default())),
            tickets: Arc::new(Tickets::default()),
            busy,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Cloned snapshot of the current caches.
    pub async fn data(&self) -> ModeData {
        self.store.read().await.clone()
    }

    /// Challenges already played at `date`, for graying out entries.
    #[instrument(level = "info", skip(self, api), fields(%lexicon, %date))]
    pub async fn load_challenge_history<A: SetupApi>(
        &self,
        api: &A,
        lexicon: u32,
        date: NaiveDate,
    ) {
        let _busy = self.busy.acquire();
        let ticket = take(&self.tickets.history);
        match api.challenges_played(lexicon, &wire_date(date)).await {
            Ok(done) if is_latest(&self.tickets.history, ticket) => {
                self.store.write().await.challenges_done = done;
            }
            Ok(_) => {
                debug!(target: "setup_data", ticket, "Discarding stale challenge-history response");
            }
            Err(e) => {
                error!(target: "setup_data", error = %e, "Challenge history load failed; keeping previous data");
            }
        }
    }

    /// Leaderboard for the selected challenge. No-op when none is selected.
    #[instrument(level = "info", skip(self, api), fields(%lexicon, %date, challenge = ?challenge))]
    pub async fn load_leaderboard<A: SetupApi>(
        &self,
        api: &A,
        lexicon: u32,
        date: NaiveDate,
        challenge: Option<u32>,
    ) {
        let Some(challenge) = challenge else {
            return;
        };
        let _busy = self.busy.acquire();
        let ticket = take(&self.tickets.leaderboard);
        match api.challenge_leaderboard(lexicon, &wire_date(date), challenge).await {
            Ok(board) if is_latest(&self.tickets.leaderboard, ticket) => {
                self.store.write().await.leaderboard = board;
            }
            Ok(_) => {
                debug!(target: "setup_data", ticket, "Discarding stale leaderboard response");
            }
            Err(e) => {
                error!(target: "setup_data", error = %e, "Leaderboard load failed; keeping previous data");
            }
        }
    }

    #[instrument(level = "info", skip(self, api), fields(%lexicon))]
    pub async fn load_saved_lists<A: SetupApi>(&self, api: &A, lexicon: u32) {
        let _busy = self.busy.acquire();
        let ticket = take(&self.tickets.saved);
        match api.saved_lists(lexicon).await {
            Ok(inventory) if is_latest(&self.tickets.saved, ticket) => {
                self.store.write().await.saved_lists = inventory;
            }
            Ok(_) => {
                debug!(target: "setup_data", ticket, "Discarding stale saved-list response");
            }
            Err(e) => {
                error!(target: "setup_data", error = %e, "Saved-list load failed; keeping previous data");
            }
        }
    }

    /// Refresh the prebuilt-list catalog. Returns the first entry's id when
    /// fresh data landed, so the dialog can auto-select it if nothing is
    /// selected yet.
    #[instrument(level = "info", skip(self, api), fields(%lexicon))]
    pub async fn load_prebuilt_lists<A: SetupApi>(&self, api: &A, lexicon: u32) -> Option<u32> {
        let _busy = self.busy.acquire();
        let ticket = take(&self.tickets.prebuilt);
        match api.prebuilt_lists(lexicon).await {
            Ok(lists) if is_latest(&self.tickets.prebuilt, ticket) => {
                let first = lists.first().map(|l| l.id);
                self.store.write().await.prebuilt_lists = lists;
                first
            }
            Ok(_) => {
                debug!(target: "setup_data", ticket, "Discarding stale prebuilt-list response");
                None
            }
            Err(e) => {
                error!(target: "setup_data", error = %e, "Prebuilt-list load failed; keeping previous data");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use tokio::sync::Notify;

    use crate::protocol::{
        ChallengeSubmitRequest, FlashcardResponse, PrebuiltListFlashcardForm,
        PrebuiltListSubmitRequest, SavedListFlashcardForm, SavedListInfo, SavedListLimits,
        SavedListSubmitRequest, SearchFlashcardForm, SearchSubmitRequest, TablePayload,
    };

    fn inventory(name: &str) -> SavedListInventory {
        SavedListInventory {
            lists: vec![SavedListInfo {
                id: 1,
                name: name.to_string(),
                num_alphagrams: 10,
                gone_thru_once: false,
                last_saved: "a while ago".to_string(),
            }],
            count: 1,
            limits: SavedListLimits {
                total: 50,
                current: 1,
            },
        }
    }

    /// Serves saved-list responses out of order: the first call waits until
    /// the second one has answered.
    struct OutOfOrderApi {
        calls: Mutex<u32>,
        first_may_finish: Notify,
    }

    impl SetupApi for OutOfOrderApi {
        async fn challenges_played(
            &self,
            _lexicon: u32,
            _date: &str,
        ) -> Result<Vec<PlayedChallenge>, String> {
            Ok(vec![])
        }
        async fn challenge_leaderboard(
            &self,
            _lexicon: u32,
            _date: &str,
            _challenge: u32,
        ) -> Result<ChallengeLeaderboard, String> {
            Ok(ChallengeLeaderboard::default())
        }
        async fn new_challenge(
            &self,
            _req: &ChallengeSubmitRequest,
        ) -> Result<TablePayload, String> {
            Err("unused".into())
        }
        async fn new_search(&self, _req: &SearchSubmitRequest) -> Result<TablePayload, String> {
            Err("unused".into())
        }
        async fn saved_lists(&self, _lexicon: u32) -> Result<SavedListInventory, String> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                *calls += 1;
                *calls
            };
            if call == 1 {
                // Resolve only after the second request has come back.
                self.first_may_finish.notified().await;
                Ok(inventory("stale"))
            } else {
                self.first_may_finish.notify_one();
                Ok(inventory("fresh"))
            }
        }
        async fn load_saved_list(
            &self,
            _req: &SavedListSubmitRequest,
        ) -> Result<TablePayload, String> {
            Err("unused".into())
        }
        async fn delete_saved_list(&self, _list_id: u32) -> Result<(), String> {
            Err("unused".into())
        }
        async fn upload_list(
            &self,
            _file_name: &str,
            _contents: Vec<u8>,
            _lexicon: u32,
        ) -> Result<(), String> {
            Err("unused".into())
        }
        async fn prebuilt_lists(&self, _lexicon: u32) -> Result<Vec<PrebuiltListInfo>, String> {
            Err("load failure".into())
        }
        async fn load_prebuilt_list(
            &self,
            _req: &PrebuiltListSubmitRequest,
        ) -> Result<TablePayload, String> {
            Err("unused".into())
        }
        async fn flashcard_search(
            &self,
            _form: &SearchFlashcardForm,
        ) -> Result<FlashcardResponse, String> {
            Err("unused".into())
        }
        async fn flashcard_saved_list(
            &self,
            _form: &SavedListFlashcardForm,
        ) -> Result<FlashcardResponse, String> {
            Err("unused".into())
        }
        async fn flashcard_prebuilt_list(
            &self,
            _form: &PrebuiltListFlashcardForm,
        ) -> Result<FlashcardResponse, String> {
            Err("unused".into())
        }
    }

    #[tokio::test]
    async fn stale_response_is_discarded() {
        let api = OutOfOrderApi {
            calls: Mutex::new(0),
            first_may_finish: Notify::new(),
        };
        let binder = AsyncDataBinder::new(BusyFlag::new());
        // The first load's response arrives after the second's; the later
        // ticket must win.
        tokio::join!(
            binder.load_saved_lists(&api, 1),
            binder.load_saved_lists(&api, 1),
        );
        let data = binder.data().await;
        assert_eq!(data.saved_lists.lists[0].name, "fresh");
        assert!(!binder.is_busy());
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_data_and_clears_busy() {
        let api = OutOfOrderApi {
            calls: Mutex::new(0),
            first_may_finish: Notify::new(),
        };
        let binder = AsyncDataBinder::new(BusyFlag::new());
        let selected = binder.load_prebuilt_lists(&api, 1).await;
        assert_eq!(selected, None);
        assert!(binder.data().await.prebuilt_lists.is_empty());
        assert!(!binder.is_busy());
    }

    #[tokio::test]
    async fn leaderboard_load_without_selection_is_a_noop() {
        let api = OutOfOrderApi {
            calls: Mutex::new(0),
            first_may_finish: Notify::new(),
        };
        let binder = AsyncDataBinder::new(BusyFlag::new());
        let date = NaiveDate::from_ymd_opt(2017, 3, 9).unwrap();
        binder.load_leaderboard(&api, 1, date, None).await;
        assert_eq!(binder.data().await.leaderboard, ChallengeLeaderboard::default());
    }
}
