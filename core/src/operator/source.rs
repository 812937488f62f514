// sluice/src/operator/source.rs

//! `Source<Out>`: the head of a chain. It has no upstream, so its `run()` is
//! the one place where production happens directly instead of reactively.

use crate::core::component::{PipelineComponent, StageId};
use crate::core::item::Item;
use crate::core::link::Downstream;
use crate::core::publisher::Publisher;
use crate::core::subscriber::Subscriber;
use crate::core::transform::Produce;
use crate::error::{StageError, StageResult};
use parking_lot::{Mutex, RwLock};
use std::sync::{Arc, Weak};
use tracing::{event, instrument, Level};

pub struct Source<Out: Item> {
  id: StageId,
  name: String,
  this: Weak<Self>,
  producer: Mutex<Box<dyn Produce<Out>>>,
  outputs: RwLock<Vec<Out>>,
  downstream: Downstream<Out>,
}

impl<Out: Item> Source<Out> {
  pub fn new(name: impl Into<String>, producer: impl Produce<Out> + 'static) -> Arc<Self> {
    let name = name.into();
    let producer: Box<dyn Produce<Out>> = Box::new(producer);
    Arc::new_cyclic(|this| Source {
      id: StageId::next(),
      name,
      this: this.clone(),
      producer: Mutex::new(producer),
      outputs: RwLock::new(Vec::new()),
      downstream: Downstream::new(),
    })
  }

  pub fn from_fn<F>(name: impl Into<String>, f: F) -> Arc<Self>
  where
    F: FnMut() -> anyhow::Result<Vec<Out>> + Send + 'static,
  {
    Self::new(name, f)
  }

  /// A source emitting the same batch on every run.
  pub fn from_items<I>(name: impl Into<String>, items: I) -> Arc<Self>
  where
    I: IntoIterator<Item = Out>,
  {
    let batch: Vec<Out> = items.into_iter().collect();
    Self::from_fn(name, move || Ok(batch.clone()))
  }

  pub fn publish(&self) -> StageResult<()> {
    let Some(subscriber) = self.downstream.resolve(&self.name)? else {
      return Ok(());
    };
    let batch = self.outputs.read().clone();
    event!(Level::TRACE, stage = %self.name, subscriber = %subscriber.name(), count = batch.len(), "Publishing batch.");
    subscriber.receive(batch)
  }

  pub fn operate<S>(&self, next: Arc<S>) -> Arc<S>
  where
    S: Subscriber<Out> + 'static,
  {
    self.subscribe(next.clone());
    next
  }

  fn produce(&self) -> StageResult<()> {
    let produced = self.producer.lock().produce();
    match produced {
      Ok(batch) => {
        event!(Level::DEBUG, stage = %self.name, produced = batch.len(), "Source produced batch.");
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
}

impl<Out: Item> PipelineComponent for Source<Out> {
  fn id(&self) -> StageId {
    self.id
  }

  fn name(&self) -> &str {
    &self.name
  }
}

impl<Out: Item> Publisher<Out> for Source<Out> {
  #[instrument(name = "Source::run", skip_all, fields(stage = %self.name))]
  fn run(&self) -> StageResult<()> {
    self.produce()?;
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
