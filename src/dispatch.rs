//! Builds the mode-specific request payloads and performs the submission
//! calls. Exactly one attempt per user action; no retries.
//!
//! Every dispatch holds the shared busy guard for its duration. Concurrent
//! dispatches are not serialized here; the embedding UI disables its submit
//! affordances while the busy flag is up.

use tracing::instrument;

use crate::api::SetupApi;
use crate::domain::{PlayOption, SearchCategory};
use crate::draft::SessionDraft;
use crate::protocol::{
    ChallengeSubmitRequest, PrebuiltListFlashcardForm, PrebuiltListSubmitRequest,
    SavedListFlashcardForm, SavedListSubmitRequest, SearchFlashcardForm, SearchSubmitRequest,
    TablePayload,
};
use crate::util::{wire_date, BusyFlag};

/// Legacy flashcard form actions.
const ACTION_SEARCH_PARAMS: &str = "searchParamsFlashcard";
const ACTION_NAMED_LISTS: &str = "namedListsFlashcard";

//
// Payload builders (pure; unit-tested)
//

pub fn challenge_request(draft: &SessionDraft, tablenum: u32) -> ChallengeSubmitRequest {
    ChallengeSubmitRequest {
        lexicon: draft.lexicon,
        date: wire_date(draft.current_date),
        challenge: draft.current_challenge,
        tablenum,
    }
}

pub fn search_request(draft: &SessionDraft, tablenum: u32) -> SearchSubmitRequest {
    SearchSubmitRequest {
        lexicon: draft.lexicon,
        search_criteria: draft.criteria.rows().to_vec(),
        desired_time: draft.desired_time_value(),
        questions_per_round: draft.questions_per_round,
        tablenum,
        multiplayer: draft.multiplayer_on,
    }
}

pub fn saved_list_request(
    draft: &SessionDraft,
    tablenum: u32,
    list_id: u32,
    option: PlayOption,
) -> SavedListSubmitRequest {
    SavedListSubmitRequest {
        lexicon: draft.lexicon,
        desired_time: draft.desired_time_value(),
        questions_per_round: draft.questions_per_round,
        selected_list: list_id,
        tablenum,
        list_option: option,
        multiplayer: draft.multiplayer_on,
    }
}

pub fn prebuilt_request(draft: &SessionDraft, tablenum: u32) -> PrebuiltListSubmitRequest {
    PrebuiltListSubmitRequest {
        lexicon: draft.lexicon,
        desired_time: draft.desired_time_value(),
        questions_per_round: draft.questions_per_round,
        selected_list: draft.selected_prebuilt,
        tablenum,
        multiplayer: draft.multiplayer_on,
    }
}

/// The legacy flashcard endpoint takes flattened form fields, not the
/// criteria array: the Length row becomes `wordLength` and the Probability
/// row the probability band. Other criteria have no flashcard counterpart.
pub fn search_flashcard_form(draft: &SessionDraft) -> SearchFlashcardForm {
    let length_row = draft
        .criteria
        .rows()
        .iter()
        .find(|r| r.search_type == SearchCategory::Length);
    let prob_row = draft
        .criteria
        .rows()
        .iter()
        .find(|r| r.search_type == SearchCategory::Probability);
    SearchFlashcardForm {
        action: ACTION_SEARCH_PARAMS.to_string(),
        lexicon: draft.lexicon,
        word_length: length_row.map(|r| r.min_value),
        probability_min: prob_row.map(|r| r.min_value),
        probability_max: prob_row.map(|r| r.max_value),
    }
}

pub fn saved_list_flashcard_form(
    draft: &SessionDraft,
    list_id: u32,
    option: PlayOption,
) -> SavedListFlashcardForm {
    SavedListFlashcardForm {
        action: option.wire_name().to_string(),
        lexicon: draft.lexicon,
        word_list: list_id,
        // The legacy form validator requires the field; the value is unused.
        list_option: "1".to_string(),
    }
}

pub fn prebuilt_flashcard_form(draft: &SessionDraft) -> PrebuiltListFlashcardForm {
    PrebuiltListFlashcardForm {
        action: ACTION_NAMED_LISTS.to_string(),
        lexicon: draft.lexicon,
        named_list: draft.selected_prebuilt,
    }
}

//
// Dispatch operations
//

/// A saved-list submission either loads a table or deletes the list.
#[derive(Debug)]
pub enum SavedListOutcome {
    Loaded(TablePayload),
    Deleted,
}

#[instrument(level = "info", skip(api, busy, draft), fields(lexicon = draft.lexicon, %tablenum))]
pub async fn submit_challenge<A: SetupApi>(
    api: &A,
    busy: &BusyFlag,
    draft: &SessionDraft,
    tablenum: u32,
) -> Result<TablePayload, String> {
    let _busy = busy.acquire();
    api.new_challenge(&challenge_request(draft, tablenum)).await
}

#[instrument(level = "info", skip(api, busy, draft), fields(lexicon = draft.lexicon, %tablenum))]
pub async fn submit_search<A: SetupApi>(
    api: &A,
    busy: &BusyFlag,
    draft: &SessionDraft,
    tablenum: u32,
) -> Result<TablePayload, String> {
    let _busy = busy.acquire();
    api.new_search(&search_request(draft, tablenum)).await
}

/// `Delete` routes to the destructive endpoint; everything else plays.
#[instrument(level = "info", skip(api, busy, draft), fields(%list_id, ?option))]
pub async fn submit_saved_list<A: SetupApi>(
    api: &A,
    busy: &BusyFlag,
    draft: &SessionDraft,
    tablenum: u32,
    list_id: u32,
    option: PlayOption,
) -> Result<SavedListOutcome, String> {
    let _busy = busy.acquire();
    if option == PlayOption::Delete {
        api.delete_saved_list(list_id).await?;
        return Ok(SavedListOutcome::Deleted);
    }
    api.load_saved_list(&saved_list_request(draft, tablenum, list_id, option))
        .await
        .map(SavedListOutcome::Loaded)
}

#[instrument(level = "info", skip(api, busy, draft), fields(lexicon = draft.lexicon, %tablenum))]
pub async fn submit_prebuilt_list<A: SetupApi>(
    api: &A,
    busy: &BusyFlag,
    draft: &SessionDraft,
    tablenum: u32,
) -> Result<TablePayload, String> {
    let _busy = busy.acquire();
    api.load_prebuilt_list(&prebuilt_request(draft, tablenum)).await
}

#[instrument(level = "info", skip(api, busy, draft))]
pub async fn submit_search_flashcards<A: SetupApi>(
    api: &A,
    busy: &BusyFlag,
    draft: &SessionDraft,
) -> Result<String, String> {
    let _busy = busy.acquire();
    let res = api.flashcard_search(&search_flashcard_form(draft)).await?;
    Ok(res.url)
}

#[instrument(level = "info", skip(api, busy, draft), fields(%list_id, ?option))]
pub async fn submit_saved_list_flashcards<A: SetupApi>(
    api: &A,
    busy: &BusyFlag,
    draft: &SessionDraft,
    list_id: u32,
    option: PlayOption,
) -> Result<String, String> {
    let _busy = busy.acquire();
    let res = api
        .flashcard_saved_list(&saved_list_flashcard_form(draft, list_id, option))
        .await?;
    Ok(res.url)
}

#[instrument(level = "info", skip(api, busy, draft))]
pub async fn submit_prebuilt_list_flashcards<A: SetupApi>(
    api: &A,
    busy: &BusyFlag,
    draft: &SessionDraft,
) -> Result<String, String> {
    let _busy = busy.acquire();
    let res = api
        .flashcard_prebuilt_list(&prebuilt_flashcard_form(draft))
        .await?;
    Ok(res.url)
}
