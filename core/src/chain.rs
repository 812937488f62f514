// sluice/src/chain.rs

//! Defines `Chain<Out>`, the owning container for a linear pipeline.
//!
//! Links between stages are weak in both directions, so some owner has to keep
//! every stage alive while the chain runs. `Chain` is that owner: it holds each
//! stage it wires, tracks the current tail, and drives activations from the tail.

use crate::core::component::{PipelineComponent, StageId};
use crate::core::item::Item;
use crate::core::publisher::Publisher;
use crate::core::subscriber::Subscriber;
use crate::error::StageResult;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// A linear chain ending in a publisher of `Out`.
///
/// ```
/// use sluice::{Chain, Operator, Source};
///
/// let chain = Chain::new(Source::from_items("numbers", vec![1, 2, 3]))
///   .operate(Operator::<i32, i32>::from_fn("double", |xs: &[i32]| Ok(xs.iter().map(|x| x * 2).collect())))
///   .operate(Operator::<i32, String>::from_fn("to_string", |xs: &[i32]| {
///     Ok(xs.iter().map(|x| x.to_string()).collect())
///   }));
///
/// chain.run().unwrap();
/// assert_eq!(chain.outputs(), vec!["2", "4", "6"]);
/// ```
pub struct Chain<Out: Item> {
  stages: Vec<Arc<dyn PipelineComponent>>,
  tail: Arc<dyn Publisher<Out>>,
  // Serializes activations of this chain; stage buffers are replaced on every pass.
  run_lock: Mutex<()>,
}

impl<Out: Item> Chain<Out> {
  /// Starts a chain at `head`, typically a `Source`.
  pub fn new<P>(head: Arc<P>) -> Self
  where
    P: Publisher<Out> + 'static,
  {
    let as_component: Arc<dyn PipelineComponent> = head.clone();
    Self {
      stages: vec![as_component],
      tail: head,
      run_lock: Mutex::new(()),
    }
  }

  /// Wires `next` below the current tail and makes it the new tail.
  ///
  /// `next` is any stage that both consumes `Out` and publishes `Next`, usually
  /// an `Operator`. The output kind of the tail and the input kind of `next`
  /// must agree; this is checked at compile time.
  pub fn operate<Next, S>(self, next: Arc<S>) -> Chain<Next>
  where
    Next: Item,
    S: Subscriber<Out> + Publisher<Next> + 'static,
  {
    let Chain { mut stages, tail, .. } = self;
    tail.subscribe(next.clone());
    event!(Level::DEBUG, upstream = %tail.name(), stage = %next.name(), "Stage appended to chain.");
    stages.push(next.clone());
    Chain {
      stages,
      tail: next,
      run_lock: Mutex::new(()),
    }
  }

  /// Keeps an extra stage alive for as long as the chain, e.g. a compound
  /// operator sitting between the head and the tail, or the source feeding
  /// its secondary lane.
  pub fn retain<S>(mut self, stage: Arc<S>) -> Self
  where
    S: PipelineComponent + 'static,
  {
    self.stages.push(stage);
    self
  }

  /// Runs the chain from its tail. Errors from any stage are returned unchanged.
  #[instrument(name = "Chain::run", skip_all, fields(tail = %self.tail.name(), num_stages = self.stages.len()))]
  pub fn run(&self) -> StageResult<()> {
    let _activation = self.run_lock.lock();
    event!(Level::DEBUG, "Chain activation starting.");
    self.tail.run()?;
    event!(Level::DEBUG, "Chain activation completed.");
    Ok(())
  }

  /// The tail's most recent outputs.
  pub fn outputs(&self) -> Vec<Out> {
    self.tail.outputs()
  }

  pub fn tail(&self) -> &Arc<dyn Publisher<Out>> {
    &self.tail
  }

  pub fn len(&self) -> usize {
    self.stages.len()
  }

  /// Pairs with `len`. A chain holds at least its head, so this is false for
  /// every chain that can be built.
  pub fn is_empty(&self) -> bool {
    self.stages.is_empty()
  }

  pub fn stage_ids(&self) -> Vec<StageId> {
    self.stages.iter().map(|s| s.id()).collect()
  }

  pub fn stage_names(&self) -> Vec<&str> {
    self.stages.iter().map(|s| s.name()).collect()
  }
}

impl<Out: Item> fmt::Debug for Chain<Out> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Chain")
      .field("stages", &self.stage_names())
      .field("tail", &self.tail.name())
      .finish()
  }
}
