//! Loading setup-dialog configuration (backend endpoints + defaults) from
//! TOML. See `SetupConfig` for the expected schema.

use serde::Deserialize;
use tracing::{error, info};

fn default_base_url() -> String {
  "http://localhost:8000".into()
}

fn default_flashcard_url() -> String {
  "/flashcards/".into()
}

fn default_timeout_secs() -> u64 {
  20
}

fn default_lexicon() -> u32 {
  1
}

/// Endpoint and default-session configuration for the setup dialog.
/// Every field has a sensible default so the struct also works with no
/// config file at all.
#[derive(Clone, Debug, Deserialize)]
pub struct SetupConfig {
  /// Base URL of the quiz backend (JSON API).
  #[serde(default = "default_base_url")]
  pub base_url: String,
  /// URL of the legacy flashcard endpoint (form-encoded API).
  #[serde(default = "default_flashcard_url")]
  pub flashcard_url: String,
  #[serde(default = "default_timeout_secs")]
  pub request_timeout_secs: u64,
  /// Lexicon preselected when the dialog first opens.
  #[serde(default = "default_lexicon")]
  pub default_lexicon: u32,
}

impl Default for SetupConfig {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
      flashcard_url: default_flashcard_url(),
      request_timeout_secs: default_timeout_secs(),
      default_lexicon: default_lexicon(),
    }
  }
}

/// Attempt to load `SetupConfig` from SETUP_CONFIG_PATH. On any parsing/IO
/// error, returns None and the caller falls back to defaults.
pub fn load_setup_config_from_env() -> Option<SetupConfig> {
  let path = std::env::var("SETUP_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<SetupConfig>(&s) {
      Ok(cfg) => {
        info!(target: "wordquiz_setup", %path, "Loaded setup config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "wordquiz_setup", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "wordquiz_setup", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn empty_toml_yields_defaults() {
    let cfg: SetupConfig = toml::from_str("").unwrap();
    assert_eq!(cfg.base_url, "http://localhost:8000");
    assert_eq!(cfg.flashcard_url, "/flashcards/");
    assert_eq!(cfg.request_timeout_secs, 20);
    assert_eq!(cfg.default_lexicon, 1);
  }

  #[test]
  fn partial_toml_overrides() {
    let cfg: SetupConfig =
      toml::from_str("base_url = \"https://quiz.example\"\ndefault_lexicon = 7\n").unwrap();
    assert_eq!(cfg.base_url, "https://quiz.example");
    assert_eq!(cfg.default_lexicon, 7);
    assert_eq!(cfg.request_timeout_secs, 20);
  }
}
