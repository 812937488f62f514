// sluice/src/core/component.rs

//! The capability every stage shares: an identity inside a chain.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique identity of a stage.
///
/// Ids are handed out from a monotonically increasing counter when a stage is
/// constructed and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StageId(u64);

impl StageId {
  pub(crate) fn next() -> Self {
    static NEXT_STAGE_ID: AtomicU64 = AtomicU64::new(1);
    StageId(NEXT_STAGE_ID.fetch_add(1, Ordering::Relaxed))
  }

  pub fn get(&self) -> u64 {
    self.0
  }
}

impl fmt::Display for StageId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "stage#{}", self.0)
  }
}

/// Marker capability shared by publishers, subscribers and operators.
///
/// It carries no behaviour beyond identity, so that a stage whose concrete role
/// does not matter (e.g. "the next stage in the chain") can be referred to and
/// stored uniformly as `Arc<dyn PipelineComponent>`.
pub trait PipelineComponent: Send + Sync {
  fn id(&self) -> StageId;

  /// Human-readable stage name, used in tracing fields and error messages.
  fn name(&self) -> &str;
}
