// sluice/src/core/subscriber.rs

//! Defines the `Subscriber<In>` contract: a stage fed batches by an upstream publisher.

use crate::core::component::PipelineComponent;
use crate::core::item::Item;
use crate::core::publisher::Publisher;
use crate::error::StageResult;
use std::sync::{Arc, Weak};

pub trait Subscriber<In: Item>: PipelineComponent {
  /// Replaces the held input with `items` and triggers this stage's processing.
  ///
  /// Any failure is returned to the caller (the upstream `publish`/`run`),
  /// which aborts the whole activation.
  fn receive(&self, items: Vec<In>) -> StageResult<()>;

  /// Records which publisher feeds this stage.
  ///
  /// Called by `Publisher::subscribe`; pipeline authors never call this directly,
  /// so the two halves of a link are always created together.
  fn set_publisher(&self, publisher: Weak<dyn Publisher<In>>);

  /// Forgets the upstream publisher. Called when that publisher registers a
  /// different subscriber in this stage's place.
  fn detach_publisher(&self);

  /// The upstream publisher, if one is registered and still alive.
  fn publisher(&self) -> Option<Arc<dyn Publisher<In>>>;
}
