// sluice/src/operator/base.rs

//! The base `Operator<In, Out>`: a stage that is a `Subscriber<In>` and a
//! `Publisher<Out>` at once, buffering its latest input and output batches.

use crate::core::component::{PipelineComponent, StageId};
use crate::core::item::Item;
use crate::core::link::{Downstream, Upstream};
use crate::core::publisher::Publisher;
use crate::core::subscriber::Subscriber;
use crate::core::transform::Transform;
use crate::error::{StageError, StageResult};
use parking_lot::{Mutex, RwLock};
use std::sync::{Arc, Weak};
use tracing::{event, instrument, Level};

/// A transforming stage.
///
/// Processing is reactive: the operator's `process_data` runs inside `receive`,
/// i.e. when its upstream publishes to it, never directly from its own `run`.
/// `run` only walks to the head of the chain and then forwards this stage's
/// outputs downstream.
///
/// Stages are created behind an `Arc` (see [`Operator::new`]) because a
/// publisher must hand its subscriber a weak handle to itself.
pub struct Operator<In: Item, Out: Item> {
  id: StageId,
  name: String,
  this: Weak<Self>,
  transform: Mutex<Box<dyn Transform<In, Out>>>,
  inputs: RwLock<Vec<In>>,
  outputs: RwLock<Vec<Out>>,
  upstream: Upstream<In>,
  downstream: Downstream<Out>,
}

impl<In: Item, Out: Item> Operator<In, Out> {
  pub fn new(name: impl Into<String>, transform: impl Transform<In, Out> + 'static) -> Arc<Self> {
    let name = name.into();
    let transform: Box<dyn Transform<In, Out>> = Box::new(transform);
    Arc::new_cyclic(|this| Operator {
      id: StageId::next(),
      name,
      this: this.clone(),
      transform: Mutex::new(transform),
      inputs: RwLock::new(Vec::new()),
      outputs: RwLock::new(Vec::new()),
      upstream: Upstream::new(),
      downstream: Downstream::new(),
    })
  }

  /// Builds an operator from a closure over the input batch.
  pub fn from_fn<F>(name: impl Into<String>, f: F) -> Arc<Self>
  where
    F: FnMut(&[In]) -> anyhow::Result<Vec<Out>> + Send + 'static,
  {
    Self::new(name, f)
  }

  /// Consumes the current input buffer and replaces the output buffer with
  /// the transform's result. On failure the output buffer is left empty.
  pub fn process_data(&self) -> StageResult<()> {
    let produced = {
      let inputs = self.inputs.read();
      let mut transform = self.transform.lock();
      transform.process_data(&inputs)
    };
    match produced {
      Ok(batch) => {
        event!(Level::TRACE, stage = %self.name, produced = batch.len(), "Batch processed.");
        *self.outputs.write() = batch;
        Ok(())
      }
      Err(source) => {
        self.outputs.write().clear();
        Err(StageError::Processing {
          stage: self.name.clone(),
          source,
        })
      }
    }
  }

  /// Delivers a copy of the output buffer to the registered subscriber.
  ///
  /// A no-op without a subscriber. An empty buffer is still delivered, as an
  /// empty batch.
  pub fn publish(&self) -> StageResult<()> {
    let Some(subscriber) = self.downstream.resolve(&self.name)? else {
      event!(Level::TRACE, stage = %self.name, "No subscriber registered, nothing to publish.");
      return Ok(());
    };
    let batch = self.outputs.read().clone();
    event!(Level::TRACE, stage = %self.name, subscriber = %subscriber.name(), count = batch.len(), "Publishing batch.");
    subscriber.receive(batch)
  }

  /// Wires `next` as this stage's downstream and returns it, so chains can be
  /// assembled fluently: `a.operate(b).operate(c)`.
  pub fn operate<S>(&self, next: Arc<S>) -> Arc<S>
  where
    S: Subscriber<Out> + 'static,
  {
    self.subscribe(next.clone());
    next
  }

  /// A copy of the most recently received batch.
  pub fn inputs(&self) -> Vec<In> {
    self.inputs.read().clone()
  }
}

impl<In: Item, Out: Item> PipelineComponent for Operator<In, Out> {
  fn id(&self) -> StageId {
    self.id
  }

  fn name(&self) -> &str {
    &self.name
  }
}

impl<In: Item, Out: Item> Publisher<Out> for Operator<In, Out> {
  #[instrument(name = "Operator::run", skip_all, fields(stage = %self.name))]
  fn run(&self) -> StageResult<()> {
    // Activation walks upstream first; our process_data fires while the
    // upstream publishes into us.
    if let Some(upstream) = self.upstream.resolve(&self.name)? {
      event!(Level::TRACE, upstream = %upstream.name(), "Activating upstream.");
      upstream.run()?;
    }
    self.publish()
  }

  fn subscribe(&self, subscriber: Arc<dyn Subscriber<Out>>) {
    let this: Weak<dyn Publisher<Out>> = self.this.clone();
    self.downstream.link(this, self.id, subscriber);
  }

  fn subscriber(&self) -> Option<Arc<dyn Subscriber<Out>>> {
    self.downstream.get()
  }

  fn detach_subscriber(&self) {
    self.downstream.clear();
  }

  fn outputs(&self) -> Vec<Out> {
    self.outputs.read().clone()
  }
}

impl<In: Item, Out: Item> Subscriber<In> for Operator<In, Out> {
  fn receive(&self, items: Vec<In>) -> StageResult<()> {
    event!(Level::TRACE, stage = %self.name, count = items.len(), "Batch received.");
    *self.inputs.write() = items;
    self.process_data()
  }

  fn set_publisher(&self, publisher: Weak<dyn Publisher<In>>) {
    self.upstream.set(publisher);
  }

  fn detach_publisher(&self) {
    self.upstream.clear();
  }

  fn publisher(&self) -> Option<Arc<dyn Publisher<In>>> {
    self.upstream.get()
  }
}
