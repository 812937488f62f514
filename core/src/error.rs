// sluice/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StageError {
  /// A transform, compound transform or producer failed inside `process_data`/`run`.
  #[error("Stage '{stage}' failed while processing. Source: {source}")]
  Processing {
    stage: String,
    #[source]
    source: AnyhowError,
  },

  /// A link was followed after the stage on its far end had been dropped.
  #[error("Stage '{stage}' has a dangling {link} link (the linked stage was dropped)")]
  Detached { stage: String, link: &'static str },

  #[error("Internal sluice error: {0}")]
  Internal(String),
}

impl StageError {
  /// Name of the stage the failure originated in, if known.
  pub fn stage(&self) -> Option<&str> {
    match self {
      StageError::Processing { stage, .. } | StageError::Detached { stage, .. } => Some(stage),
      StageError::Internal(_) => None,
    }
  }
}

// Lets `?` on arbitrary errors inside crate code land in StageError.
impl From<AnyhowError> for StageError {
  fn from(err: AnyhowError) -> Self {
    // An anyhow error that already carries a StageError is unwrapped rather than nested.
    match err.downcast::<StageError>() {
      Ok(stage_err) => stage_err,
      Err(source) => StageError::Processing {
        stage: "<unknown>".to_string(),
        source,
      },
    }
  }
}

pub type StageResult<T, E = StageError> = std::result::Result<T, E>;
