// sluice/src/compound/transform.rs

/// The pair of batches a compound operator produces in one activation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Streams<A, B> {
  /// The primary result (e.g. the kept items).
  pub main: Vec<A>,
  /// The side-channel result (e.g. rejected items or diagnostics).
  pub secondary: Vec<B>,
}

impl<A, B> Streams<A, B> {
  pub fn new(main: Vec<A>, secondary: Vec<B>) -> Self {
    Self { main, secondary }
  }
}

/// Transformation step of a `CompoundOperator`: two typed inputs in, two typed
/// outputs out. Like `Transform`, it has no default body.
pub trait CompoundTransform<InA, InB, OutA, OutB>: Send {
  fn process_data(&mut self, main: &[InA], secondary: &[InB]) -> anyhow::Result<Streams<OutA, OutB>>;
}

impl<InA, InB, OutA, OutB, F> CompoundTransform<InA, InB, OutA, OutB> for F
where
  F: FnMut(&[InA], &[InB]) -> anyhow::Result<Streams<OutA, OutB>> + Send,
{
  fn process_data(&mut self, main: &[InA], secondary: &[InB]) -> anyhow::Result<Streams<OutA, OutB>> {
    self(main, secondary)
  }
}
