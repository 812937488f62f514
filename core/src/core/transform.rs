// sluice/src/core/transform.rs

//! The extension points of the framework: `Transform` for operators and
//! `Produce` for sources. All domain logic lives behind these traits;
//! `run`/`publish`/`receive` are orchestration only.

/// The transformation step of an `Operator<In, Out>`.
///
/// Implementations consume the current input batch and return the batch that
/// replaces the operator's output buffer. There is no default body: an operator
/// always has to say what it does with its input.
///
/// Closures `FnMut(&[In]) -> anyhow::Result<Vec<Out>>` implement this trait.
pub trait Transform<In, Out>: Send {
  fn process_data(&mut self, inputs: &[In]) -> anyhow::Result<Vec<Out>>;
}

impl<In, Out, F> Transform<In, Out> for F
where
  F: FnMut(&[In]) -> anyhow::Result<Vec<Out>> + Send,
{
  fn process_data(&mut self, inputs: &[In]) -> anyhow::Result<Vec<Out>> {
    self(inputs)
  }
}

/// Production step of a head-of-chain `Source<Out>`, invoked once per `run()`.
pub trait Produce<Out>: Send {
  fn produce(&mut self) -> anyhow::Result<Vec<Out>>;
}

impl<Out, F> Produce<Out> for F
where
  F: FnMut() -> anyhow::Result<Vec<Out>> + Send,
{
  fn produce(&mut self) -> anyhow::Result<Vec<Out>> {
    self()
  }
}
