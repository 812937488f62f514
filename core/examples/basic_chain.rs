// sluice/examples/basic_chain.rs

use sluice::{Operator, Publisher, Source, StageError};
use tracing::info;

// 1. A plain transform struct; closures work too (see `to_label` below).
struct Scale {
  factor: i64,
}

impl sluice::Transform<i64, i64> for Scale {
  fn process_data(&mut self, inputs: &[i64]) -> anyhow::Result<Vec<i64>> {
    Ok(inputs.iter().map(|x| x * self.factor).collect())
  }
}

fn main() -> Result<(), StageError> {
  // Initialize tracing (optional, for demonstration)
  tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

  info!("--- Basic Chain Example ---");

  // 2. Build the stages
  let readings = Source::from_items("readings", vec![3_i64, 1, 4, 1, 5]);
  let scale = Operator::<i64, i64>::new("scale", Scale { factor: 10 });
  let drop_small = Operator::<i64, i64>::from_fn("drop_small", |xs: &[i64]| {
    Ok(xs.iter().copied().filter(|x| *x > 10).collect())
  });
  let to_label = Operator::<i64, String>::from_fn("to_label", |xs: &[i64]| {
    Ok(xs.iter().map(|x| format!("reading={}", x)).collect())
  });

  // 3. Wire them; each call returns the stage it was given
  let terminal = readings.operate(scale.clone()).operate(drop_small.clone()).operate(to_label.clone());

  // 4. Run from the last stage; activation walks up to `readings`
  info!("Starting chain execution...");
  terminal.run()?;

  // 5. Inspect the results
  info!("Scaled: {:?}", scale.outputs());
  info!("Kept: {:?}", drop_small.outputs());
  for label in terminal.outputs() {
    info!("- {}", label);
  }

  assert_eq!(terminal.outputs(), vec!["reading=30", "reading=40", "reading=50"]);
  Ok(())
}
