// sluice/src/compound/operator.rs

//! `CompoundOperator`: an operator with two typed input lanes and two typed
//! output lanes.

use crate::compound::port::{CompoundRun, InputPort, OutputPort};
use crate::compound::transform::{CompoundTransform, Streams};
use crate::core::component::{PipelineComponent, StageId};
use crate::core::item::Item;
use crate::core::publisher::Publisher;
use crate::error::{StageError, StageResult};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::{event, instrument, Level};

/// An operator whose natural input is split across a *main* and a *secondary*
/// stream, and whose natural output is a main result plus an independent
/// secondary result (e.g. kept/rejected, value/diagnostic).
///
/// The compound owns its four ports; link them like any other stage:
///
/// ```
/// use sluice::{CompoundOperator, Source, Streams};
///
/// let numbers = Source::from_items("numbers", vec![3, -1, 4]);
/// let limits = Source::from_items("limits", vec![0]);
/// let split = CompoundOperator::<i32, i32, i32, i32>::from_fn("split", |xs: &[i32], floor: &[i32]| {
///   let floor = floor.first().copied().unwrap_or(0);
///   let (kept, dropped): (Vec<i32>, Vec<i32>) = xs.iter().copied().partition(|x| *x >= floor);
///   Ok(Streams::new(kept, dropped))
/// });
/// numbers.operate(split.main_input());
/// limits.operate(split.secondary_input());
///
/// split.run().unwrap();
/// assert_eq!(split.main_outputs(), vec![3, 4]);
/// assert_eq!(split.secondary_outputs(), vec![-1]);
/// ```
pub struct CompoundOperator<InA: Item, InB: Item, OutA: Item, OutB: Item> {
  id: StageId,
  name: String,
  transform: Mutex<Box<dyn CompoundTransform<InA, InB, OutA, OutB>>>,
  main_input: Arc<InputPort<InA>>,
  secondary_input: Arc<InputPort<InB>>,
  main_output: Arc<OutputPort<OutA>>,
  secondary_output: Arc<OutputPort<OutB>>,
}

impl<InA: Item, InB: Item, OutA: Item, OutB: Item> CompoundOperator<InA, InB, OutA, OutB> {
  pub fn new(
    name: impl Into<String>,
    transform: impl CompoundTransform<InA, InB, OutA, OutB> + 'static,
  ) -> Arc<Self> {
    let name = name.into();
    let transform: Box<dyn CompoundTransform<InA, InB, OutA, OutB>> = Box::new(transform);
    Arc::new_cyclic(|this: &Weak<Self>| {
      let owner: Weak<dyn CompoundRun> = this.clone();
      CompoundOperator {
        id: StageId::next(),
        main_input: InputPort::new(format!("{}.main_input", name)),
        secondary_input: InputPort::new(format!("{}.secondary_input", name)),
        main_output: OutputPort::new(format!("{}.main_output", name), owner.clone()),
        secondary_output: OutputPort::new(format!("{}.secondary_output", name), owner),
        transform: Mutex::new(transform),
        name,
      }
    })
  }

  pub fn from_fn<F>(name: impl Into<String>, f: F) -> Arc<Self>
  where
    F: FnMut(&[InA], &[InB]) -> anyhow::Result<Streams<OutA, OutB>> + Send + 'static,
  {
    Self::new(name, f)
  }

  /// Activates the main lane's upstream, then the secondary lane's upstream,
  /// then processes both buffered batches and publishes main before secondary.
  ///
  /// A lane with no upstream contributes whatever it last received.
  #[instrument(name = "CompoundOperator::run", skip_all, fields(stage = %self.name))]
  pub fn run(&self) -> StageResult<()> {
    self.main_input.activate_upstream()?;
    self.secondary_input.activate_upstream()?;
    self.process_data()?;
    self.publish()
  }

  /// Runs the transform over both input lanes and replaces both output
  /// buffers. On failure both output buffers are left empty.
  pub fn process_data(&self) -> StageResult<()> {
    let produced = {
      let main = self.main_input.buffer();
      let secondary = self.secondary_input.buffer();
      let mut transform = self.transform.lock();
      transform.process_data(&main, &secondary)
    };
    match produced {
      Ok(Streams { main, secondary }) => {
        event!(
          Level::TRACE,
          stage = %self.name,
          main = main.len(),
          secondary = secondary.len(),
          "Compound batch processed."
        );
        self.main_output.replace(main);
        self.secondary_output.replace(secondary);
        Ok(())
      }
      Err(source) => {
        self.main_output.clear();
        self.secondary_output.clear();
        Err(StageError::Processing {
          stage: self.name.clone(),
          source,
        })
      }
    }
  }

  /// Publishes the main lane, then the secondary lane. Lanes without a
  /// subscriber are skipped.
  pub fn publish(&self) -> StageResult<()> {
    self.main_output.publish()?;
    self.secondary_output.publish()
  }

  pub fn main_input(&self) -> Arc<InputPort<InA>> {
    self.main_input.clone()
  }

  pub fn secondary_input(&self) -> Arc<InputPort<InB>> {
    self.secondary_input.clone()
  }

  pub fn main_output(&self) -> Arc<OutputPort<OutA>> {
    self.main_output.clone()
  }

  pub fn secondary_output(&self) -> Arc<OutputPort<OutB>> {
    self.secondary_output.clone()
  }

  pub fn main_outputs(&self) -> Vec<OutA> {
    self.main_output.outputs()
  }

  pub fn secondary_outputs(&self) -> Vec<OutB> {
    self.secondary_output.outputs()
  }
}

impl<InA: Item, InB: Item, OutA: Item, OutB: Item> CompoundRun for CompoundOperator<InA, InB, OutA, OutB> {
  fn run_compound(&self) -> StageResult<()> {
    self.run()
  }
}

impl<InA: Item, InB: Item, OutA: Item, OutB: Item> PipelineComponent for CompoundOperator<InA, InB, OutA, OutB> {
  fn id(&self) -> StageId {
    self.id
  }

  fn name(&self) -> &str {
    &self.name
  }
}
