// sluice/src/compound/port.rs

//! Typed lanes of a compound operator. Each port is a stage of its own so it
//! can be linked with the ordinary `Publisher`/`Subscriber` contracts.

use crate::core::component::{PipelineComponent, StageId};
use crate::core::item::Item;
use crate::core::link::{Downstream, Upstream};
use crate::core::publisher::Publisher;
use crate::core::subscriber::Subscriber;
use crate::error::{StageError, StageResult};
use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::{Arc, Weak};
use tracing::{event, Level};

/// Implemented by the compound operator so its output ports can drive it
/// without knowing all four of its element kinds.
pub(crate) trait CompoundRun: Send + Sync {
  fn run_compound(&self) -> StageResult<()>;
}

/// One input lane of a compound operator.
///
/// Unlike an `Operator`, receiving a batch here only buffers it: processing
/// waits until the compound has activated both of its upstreams.
pub struct InputPort<In: Item> {
  id: StageId,
  name: String,
  buffer: RwLock<Vec<In>>,
  upstream: Upstream<In>,
}

impl<In: Item> InputPort<In> {
  pub(crate) fn new(name: String) -> Arc<Self> {
    Arc::new(InputPort {
      id: StageId::next(),
      name,
      buffer: RwLock::new(Vec::new()),
      upstream: Upstream::new(),
    })
  }

  /// Runs the upstream feeding this lane, if any. A lane without an upstream
  /// keeps whatever it last received (initially nothing).
  pub(crate) fn activate_upstream(&self) -> StageResult<()> {
    match self.upstream.resolve(&self.name)? {
      Some(upstream) => {
        event!(Level::TRACE, port = %self.name, upstream = %upstream.name(), "Activating lane upstream.");
        upstream.run()
      }
      None => Ok(()),
    }
  }

  pub(crate) fn buffer(&self) -> RwLockReadGuard<'_, Vec<In>> {
    self.buffer.read()
  }

  /// A copy of the batch most recently received on this lane.
  pub fn inputs(&self) -> Vec<In> {
    self.buffer.read().clone()
  }
}

impl<In: Item> PipelineComponent for InputPort<In> {
  fn id(&self) -> StageId {
    self.id
  }

  fn name(&self) -> &str {
    &self.name
  }
}

impl<In: Item> Subscriber<In> for InputPort<In> {
  fn receive(&self, items: Vec<In>) -> StageResult<()> {
    event!(Level::TRACE, port = %self.name, count = items.len(), "Lane batch buffered.");
    *self.buffer.write() = items;
    Ok(())
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

/// One output lane of a compound operator.
///
/// Running an output port runs the whole compound, so a chain hanging off
/// either lane activates both upstreams and receives its lane's batch.
pub struct OutputPort<Out: Item> {
  id: StageId,
  name: String,
  this: Weak<Self>,
  owner: Weak<dyn CompoundRun>,
  buffer: RwLock<Vec<Out>>,
  downstream: Downstream<Out>,
}

impl<Out: Item> OutputPort<Out> {
  pub(crate) fn new(name: String, owner: Weak<dyn CompoundRun>) -> Arc<Self> {
    Arc::new_cyclic(|this| OutputPort {
      id: StageId::next(),
      name,
      this: this.clone(),
      owner,
      buffer: RwLock::new(Vec::new()),
      downstream: Downstream::new(),
    })
  }

  pub(crate) fn replace(&self, batch: Vec<Out>) {
    *self.buffer.write() = batch;
  }

  pub(crate) fn clear(&self) {
    self.buffer.write().clear();
  }

  /// Delivers a copy of this lane's buffer to its subscriber, if one is registered.
  pub fn publish(&self) -> StageResult<()> {
    let Some(subscriber) = self.downstream.resolve(&self.name)? else {
      return Ok(());
    };
    let batch = self.buffer.read().clone();
    event!(Level::TRACE, port = %self.name, subscriber = %subscriber.name(), count = batch.len(), "Publishing lane batch.");
    subscriber.receive(batch)
  }

  pub fn operate<S>(&self, next: Arc<S>) -> Arc<S>
  where
    S: Subscriber<Out> + 'static,
  {
    self.subscribe(next.clone());
    next
  }
}

impl<Out: Item> PipelineComponent for OutputPort<Out> {
  fn id(&self) -> StageId {
    self.id
  }

  fn name(&self) -> &str {
    &self.name
  }
}

impl<Out: Item> Publisher<Out> for OutputPort<Out> {
  fn run(&self) -> StageResult<()> {
    let owner = self.owner.upgrade().ok_or_else(|| StageError::Detached {
      stage: self.name.clone(),
      link: "compound",
    })?;
    owner.run_compound()
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
    self.buffer.read().clone()
  }
}
