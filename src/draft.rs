//! The session-request draft and the source-mode state machine.
//!
//! All mode-transition side effects live in one pure reducer,
//! `reduce(draft, event)`, so the rules are explicit and testable:
//!   - selecting a challenge overwrites duration/question-count with the
//!     challenge's derived values and forces multiplayer off
//!   - selecting any mode other than Challenge restores the session
//!     defaults, undoing a prior challenge override
//!   - everything else a mode owns (criteria rows, selections) survives
//!     switching away and back

use chrono::NaiveDate;

use crate::criteria::SearchCriteriaSet;
use crate::domain::{SourceMode, DEFAULT_QUESTIONS_PER_ROUND, DEFAULT_TIME_PER_QUIZ};
use crate::util::minutes_label;

/// Everything needed to build a submission for the active mode, plus each
/// mode's sub-state. Held in memory for the lifetime of the setup dialog.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionDraft {
    pub active_mode: SourceMode,
    pub lexicon: u32,
    /// Quiz length in minutes, as typed ("5", "4.5").
    pub desired_time: String,
    pub questions_per_round: u32,
    pub multiplayer_on: bool,
    /// Calendar date for the Challenge mode.
    pub current_date: NaiveDate,
    /// Selected challenge id, if any (Challenge mode sub-state).
    pub current_challenge: Option<u32>,
    /// WordSearch mode sub-state.
    pub criteria: SearchCriteriaSet,
    /// PrebuiltList mode sub-state.
    pub selected_prebuilt: Option<u32>,
}

impl SessionDraft {
    pub fn new(lexicon: u32, today: NaiveDate) -> Self {
        Self {
            active_mode: SourceMode::Challenge,
            lexicon,
            desired_time: DEFAULT_TIME_PER_QUIZ.to_string(),
            questions_per_round: DEFAULT_QUESTIONS_PER_ROUND,
            multiplayer_on: false,
            current_date: today,
            current_challenge: None,
            criteria: SearchCriteriaSet::default_word_search(),
            selected_prebuilt: None,
        }
    }

    /// Duration parsed for the wire; malformed input degrades to 0 and is
    /// rejected server-side.
    pub fn desired_time_value(&self) -> f64 {
        self.desired_time.trim().parse().unwrap_or(0.0)
    }
}

/// A user-driven transition of the draft. No automatic transitions exist.
#[derive(Clone, Debug, PartialEq)]
pub enum DraftEvent {
    ModeSelected(SourceMode),
    ChallengeSelected {
        id: u32,
        seconds: u32,
        num_questions: u32,
    },
    LexiconChanged(u32),
    DateChanged(NaiveDate),
    MultiplayerSet(bool),
    PrebuiltSelected(u32),
}

/// Apply one event to the draft, producing the next draft.
pub fn reduce(draft: &SessionDraft, event: &DraftEvent) -> SessionDraft {
    let mut next = draft.clone();
    match event {
        DraftEvent::ModeSelected(mode) => {
            next.active_mode = *mode;
            if *mode != SourceMode::Challenge {
                // Undo any duration/question override a challenge made.
                next.desired_time = DEFAULT_TIME_PER_QUIZ.to_string();
                next.questions_per_round = DEFAULT_QUESTIONS_PER_ROUND;
            }
        }
        DraftEvent::ChallengeSelected {
            id,
            seconds,
            num_questions,
        } => {
            // Challenges are single-player with a fixed length.
            next.current_challenge = Some(*id);
            next.desired_time = minutes_label(*seconds);
            next.questions_per_round = *num_questions;
            next.multiplayer_on = false;
        }
        DraftEvent::LexiconChanged(lexicon) => {
            next.lexicon = *lexicon;
        }
        DraftEvent::DateChanged(date) => {
            next.current_date = *date;
        }
        DraftEvent::MultiplayerSet(on) => {
            next.multiplayer_on = *on;
        }
        DraftEvent::PrebuiltSelected(id) => {
            next.selected_prebuilt = Some(*id);
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn draft() -> SessionDraft {
        SessionDraft::new(1, NaiveDate::from_ymd_opt(2017, 3, 9).unwrap())
    }

    #[test]
    fn challenge_selection_overrides_session_fields() {
        let mut d = draft();
        d.multiplayer_on = true;
        let next = reduce(
            &d,
            &DraftEvent::ChallengeSelected {
                id: 7,
                seconds: 270,
                num_questions: 100,
            },
        );
        assert_eq!(next.current_challenge, Some(7));
        assert_eq!(next.desired_time, "4.5");
        assert_eq!(next.questions_per_round, 100);
        assert!(!next.multiplayer_on);
    }

    #[test]
    fn leaving_challenge_mode_restores_defaults() {
        let d = draft();
        let with_challenge = reduce(
            &d,
            &DraftEvent::ChallengeSelected {
                id: 7,
                seconds: 300,
                num_questions: 100,
            },
        );
        let next = reduce(&with_challenge, &DraftEvent::ModeSelected(SourceMode::WordSearch));
        assert_eq!(next.active_mode, SourceMode::WordSearch);
        assert_eq!(next.desired_time, "5");
        assert_eq!(next.questions_per_round, 50);
        // Sub-state is preserved for when the user returns.
        assert_eq!(next.current_challenge, Some(7));
    }

    #[test]
    fn reentering_challenge_mode_keeps_current_values() {
        let d = draft();
        let next = reduce(&d, &DraftEvent::ModeSelected(SourceMode::Challenge));
        assert_eq!(next.desired_time, d.desired_time);
        assert_eq!(next.questions_per_round, d.questions_per_round);
    }

    #[test]
    fn mode_switch_preserves_other_substate() {
        let mut d = draft();
        d.selected_prebuilt = Some(42);
        d.criteria.add();
        let rows_before = d.criteria.clone();
        let next = reduce(&d, &DraftEvent::ModeSelected(SourceMode::SavedList));
        assert_eq!(next.selected_prebuilt, Some(42));
        assert_eq!(next.criteria, rows_before);
    }

    #[test]
    fn desired_time_parses_leniently() {
        let mut d = draft();
        d.desired_time = " 4.5 ".into();
        assert_eq!(d.desired_time_value(), 4.5);
        d.desired_time = "bogus".into();
        assert_eq!(d.desired_time_value(), 0.0);
    }

    #[test]
    fn simple_field_events() {
        let d = draft();
        assert_eq!(reduce(&d, &DraftEvent::LexiconChanged(4)).lexicon, 4);
        assert!(reduce(&d, &DraftEvent::MultiplayerSet(true)).multiplayer_on);
        assert_eq!(
            reduce(&d, &DraftEvent::PrebuiltSelected(3)).selected_prebuilt,
            Some(3)
        );
        let date = NaiveDate::from_ymd_opt(2018, 1, 2).unwrap();
        assert_eq!(reduce(&d, &DraftEvent::DateChanged(date)).current_date, date);
    }
}
