//! Wordquiz Setup · Table/Session Setup Orchestrator
//!
//! - Explicit setup-dialog handle (`TableSetupDialog`) a UI shell drives
//! - Four question sources: daily challenges, word search, saved lists,
//!   prebuilt lists
//! - reqwest-backed backend client behind the `SetupApi` trait
//!
//! Important env variables:
//!   SETUP_CONFIG_PATH  : path to TOML config (endpoints + defaults)
//!   LOG_LEVEL    : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT      : "pretty" (default) or "json"

pub mod telemetry;
pub mod util;
pub mod domain;
pub mod config;
pub mod criteria;
pub mod draft;
pub mod guard;
pub mod protocol;
pub mod api;
pub mod binder;
pub mod dispatch;
pub mod dialog;

pub use crate::api::{HttpApi, SetupApi};
pub use crate::config::{load_setup_config_from_env, SetupConfig};
pub use crate::dialog::{DialogEvent, SubmitAction, TableContext, TableSetupDialog};
pub use crate::domain::{PlayOption, SearchCategory, SourceMode};
pub use crate::draft::{reduce, DraftEvent, SessionDraft};
