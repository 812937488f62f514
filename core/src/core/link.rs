// sluice/src/core/link.rs

//! Non-owning link cells holding the two halves of a "publisher feeds
//! subscriber" edge.
//!
//! Both directions are `Weak`: the stages on either end are owned by whoever
//! built the chain (usually a `Chain`), never by each other, so a linked pair
//! can not keep itself alive.

use crate::core::component::{PipelineComponent, StageId};
use crate::core::item::Item;
use crate::core::publisher::Publisher;
use crate::core::subscriber::Subscriber;
use crate::error::{StageError, StageResult};
use parking_lot::RwLock;
use std::sync::{Arc, Weak};
use tracing::{event, Level};

/// The upstream half of a link, held by a subscriber.
pub(crate) struct Upstream<In: Item> {
  slot: RwLock<Option<Weak<dyn Publisher<In>>>>,
}

impl<In: Item> Upstream<In> {
  pub(crate) fn new() -> Self {
    Self { slot: RwLock::new(None) }
  }

  pub(crate) fn set(&self, publisher: Weak<dyn Publisher<In>>) {
    *self.slot.write() = Some(publisher);
  }

  pub(crate) fn clear(&self) {
    *self.slot.write() = None;
  }

  /// Navigation view: `None` when unlinked or when the publisher is gone.
  pub(crate) fn get(&self) -> Option<Arc<dyn Publisher<In>>> {
    self.slot.read().as_ref().and_then(Weak::upgrade)
  }

  /// Activation view: `Ok(None)` when unlinked, `Detached` when the publisher is gone.
  pub(crate) fn resolve(&self, stage: &str) -> StageResult<Option<Arc<dyn Publisher<In>>>> {
    let guard = self.slot.read();
    match guard.as_ref() {
      None => Ok(None),
      Some(weak) => weak.upgrade().map(Some).ok_or_else(|| StageError::Detached {
        stage: stage.to_string(),
        link: "upstream",
      }),
    }
  }
}

/// The downstream half of a link, held by a publisher.
pub(crate) struct Downstream<Out: Item> {
  slot: RwLock<Option<Weak<dyn Subscriber<Out>>>>,
}

impl<Out: Item> Downstream<Out> {
  pub(crate) fn new() -> Self {
    Self { slot: RwLock::new(None) }
  }

  pub(crate) fn clear(&self) {
    *self.slot.write() = None;
  }

  pub(crate) fn get(&self) -> Option<Arc<dyn Subscriber<Out>>> {
    self.slot.read().as_ref().and_then(Weak::upgrade)
  }

  pub(crate) fn resolve(&self, stage: &str) -> StageResult<Option<Arc<dyn Subscriber<Out>>>> {
    let guard = self.slot.read();
    match guard.as_ref() {
      None => Ok(None),
      Some(weak) => weak.upgrade().map(Some).ok_or_else(|| StageError::Detached {
        stage: stage.to_string(),
        link: "downstream",
      }),
    }
  }

  /// Wires `subscriber` below the publisher identified by `this`/`publisher_id`.
  ///
  /// Both replaced links are removed from both ends: the previous subscriber of
  /// this publisher loses its upstream pointer (if it still points here), and
  /// the previous publisher of `subscriber` loses its downstream pointer (if it
  /// still points at `subscriber`).
  pub(crate) fn link(&self, this: Weak<dyn Publisher<Out>>, publisher_id: StageId, subscriber: Arc<dyn Subscriber<Out>>) {
    if let Some(previous) = self.get() {
      let points_back = previous.publisher().map_or(false, |p| p.id() == publisher_id);
      if previous.id() != subscriber.id() && points_back {
        event!(Level::DEBUG, publisher = %publisher_id, replaced = %previous.name(), "Replacing downstream subscriber.");
        previous.detach_publisher();
      }
    }
    if let Some(former) = subscriber.publisher() {
      let still_feeds = former.subscriber().map_or(false, |s| s.id() == subscriber.id());
      if former.id() != publisher_id && still_feeds {
        event!(Level::DEBUG, publisher = %former.name(), subscriber = %subscriber.name(), "Moving subscriber away from its previous publisher.");
        former.detach_subscriber();
      }
    }
    subscriber.set_publisher(this);
    *self.slot.write() = Some(Arc::downgrade(&subscriber));
    event!(Level::DEBUG, publisher = %publisher_id, subscriber = %subscriber.name(), "Subscriber linked.");
  }
}
