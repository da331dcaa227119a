//! Pre-submission guard: reconciles host/session-state conflicts before any
//! submission-triggering action is allowed to fire.
//!
//! Exactly one of the blocking conditions applies per attempt, evaluated in
//! a fixed order. A `Confirm` decision is a suspend point: the dialog holds
//! the pending action until the user explicitly confirms or cancels.

const NO_LOAD_WHILE_PLAYING: &str =
    "Please wait until the end of the game to perform that action.";

const NOT_HOST_PROMPT: &str = "You are trying to load a new word list, \
but you are not the host of this table. This will create a new table. \
Are you sure you wish to continue?";

const LEAVE_MULTIPLAYER_PROMPT: &str = "You are trying to create a new \
single player game. This will remove you from your current multiplayer \
table and create a new table. Are you sure you wish to continue?";

/// Everything the guard needs to adjudicate one submission attempt.
#[derive(Clone, Debug)]
pub struct PreflightContext {
    /// A round is currently running at the viewer's table.
    pub game_going: bool,
    /// Host of the table the viewer currently sits at.
    pub current_host: String,
    /// The viewer.
    pub username: String,
    /// Existing table targeted by the submission; 0 means none.
    pub tablenum: u32,
    /// The targeted table is currently a multiplayer table.
    pub table_is_multiplayer: bool,
    /// The draft being submitted asks for multiplayer.
    pub requested_multiplayer: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PreflightDecision {
    /// No conflict; the guarded action may run immediately.
    Proceed,
    /// Unconditionally refused; surface the message and drop the action.
    Block { message: String },
    /// Requires explicit user confirmation before the action may run.
    Confirm { prompt: String },
}

/// Evaluate the guard. Order matters: an in-progress game hosted by the
/// viewer blocks before either confirmation case is considered.
pub fn evaluate(ctx: &PreflightContext) -> PreflightDecision {
    if ctx.game_going && ctx.current_host == ctx.username {
        PreflightDecision::Block {
            message: NO_LOAD_WHILE_PLAYING.to_string(),
        }
    } else if ctx.tablenum != 0 && ctx.current_host != ctx.username {
        PreflightDecision::Confirm {
            prompt: NOT_HOST_PROMPT.to_string(),
        }
    } else if ctx.tablenum != 0 && !ctx.requested_multiplayer && ctx.table_is_multiplayer {
        PreflightDecision::Confirm {
            prompt: LEAVE_MULTIPLAYER_PROMPT.to_string(),
        }
    } else {
        PreflightDecision::Proceed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> PreflightContext {
        PreflightContext {
            game_going: false,
            current_host: "cesar".into(),
            username: "cesar".into(),
            tablenum: 12,
            table_is_multiplayer: false,
            requested_multiplayer: false,
        }
    }

    #[test]
    fn host_with_game_in_progress_is_blocked() {
        let c = PreflightContext {
            game_going: true,
            ..ctx()
        };
        assert_eq!(
            evaluate(&c),
            PreflightDecision::Block {
                message: NO_LOAD_WHILE_PLAYING.to_string()
            }
        );
    }

    #[test]
    fn non_host_at_existing_table_needs_confirmation() {
        let c = PreflightContext {
            current_host: "somebody_else".into(),
            ..ctx()
        };
        assert!(matches!(evaluate(&c), PreflightDecision::Confirm { .. }));
    }

    #[test]
    fn single_player_request_in_multiplayer_table_needs_confirmation() {
        let c = PreflightContext {
            table_is_multiplayer: true,
            requested_multiplayer: false,
            ..ctx()
        };
        match evaluate(&c) {
            PreflightDecision::Confirm { prompt } => {
                assert!(prompt.contains("multiplayer"));
            }
            other => panic!("expected Confirm, got {other:?}"),
        }
    }

    #[test]
    fn multiplayer_request_in_multiplayer_table_proceeds() {
        let c = PreflightContext {
            table_is_multiplayer: true,
            requested_multiplayer: true,
            ..ctx()
        };
        assert_eq!(evaluate(&c), PreflightDecision::Proceed);
    }

    #[test]
    fn no_existing_table_proceeds_immediately() {
        let c = PreflightContext {
            tablenum: 0,
            current_host: String::new(),
            table_is_multiplayer: false,
            ..ctx()
        };
        assert_eq!(evaluate(&c), PreflightDecision::Proceed);
    }

    #[test]
    fn block_wins_over_confirmation_cases() {
        // Game in progress, viewer hosts, and the non-host condition would
        // also fire if the order were wrong.
        let c = PreflightContext {
            game_going: true,
            table_is_multiplayer: true,
            ..ctx()
        };
        assert!(matches!(evaluate(&c), PreflightDecision::Block { .. }));
    }

    #[test]
    fn not_host_confirmation_wins_over_multiplayer_one() {
        let c = PreflightContext {
            current_host: "somebody_else".into(),
            table_is_multiplayer: true,
            requested_multiplayer: false,
            ..ctx()
        };
        match evaluate(&c) {
            PreflightDecision::Confirm { prompt } => {
                assert!(prompt.contains("not the host"));
            }
            other => panic!("expected Confirm, got {other:?}"),
        }
    }
}
