// sluice/src/core/publisher.rs

//! Defines the `Publisher<Out>` contract: a stage that can be run and that
//! delivers what it produced to its registered subscriber.

use crate::core::component::PipelineComponent;
use crate::core::item::Item;
use crate::core::subscriber::Subscriber;
use crate::error::StageResult;
use std::sync::Arc;

/// A stage producing batches of `Out`.
///
/// Composition (`operate`) is an inherent method on each concrete publisher
/// because it returns the argument's concrete type; `subscribe` is the
/// object-safe half of it.
pub trait Publisher<Out: Item>: PipelineComponent {
  /// Activates this stage's upstream dependency (if any), lets this stage
  /// produce its items, and ends by delivering them to the registered
  /// subscriber. With no subscriber, production still happens and nothing is
  /// delivered.
  fn run(&self) -> StageResult<()>;

  /// Registers `subscriber` as the single downstream of this stage, replacing
  /// any previous registration, and records this stage as its publisher.
  fn subscribe(&self, subscriber: Arc<dyn Subscriber<Out>>);

  /// The currently registered downstream, if it is still alive.
  fn subscriber(&self) -> Option<Arc<dyn Subscriber<Out>>>;

  /// Forgets the registered downstream without touching the subscriber's own
  /// upstream pointer. Counterpart of `Subscriber::detach_publisher`.
  fn detach_subscriber(&self);

  /// A copy of the most recently produced batch.
  fn outputs(&self) -> Vec<Out>;
}
