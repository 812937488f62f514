// sluice/examples/error_handling.rs

use sluice::{Chain, Operator, Source, StageError};
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
enum ParseFailure {
  #[error("'{0}' is not a number")]
  NotANumber(String),
}

fn parse_stage() -> std::sync::Arc<Operator<String, i32>> {
  Operator::<String, i32>::from_fn("parse", |lines: &[String]| {
    lines
      .iter()
      .map(|l| l.trim().parse::<i32>().map_err(|_| anyhow::Error::from(ParseFailure::NotANumber(l.clone()))))
      .collect()
  })
}

fn build(lines: Vec<&str>) -> Chain<i32> {
  let lines: Vec<String> = lines.into_iter().map(String::from).collect();
  Chain::new(Source::from_items("lines", lines))
    .operate(parse_stage())
    .operate(Operator::<i32, i32>::from_fn("sum", |xs: &[i32]| Ok(vec![xs.iter().sum()])))
}

fn main() {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Error Handling Example ---");

  let good = build(vec!["1", " 2", "3 "]);
  match good.run() {
    Ok(()) => info!("Sum of good input: {:?}", good.outputs()),
    Err(e) => warn!("Unexpected failure: {}", e),
  }

  let bad = build(vec!["1", "two", "3"]);
  match bad.run() {
    Ok(()) => warn!("Bad input unexpectedly succeeded"),
    Err(StageError::Processing { stage, source }) => {
      // The failure is reported once, by the stage it happened in.
      info!("Stage '{}' failed: {}", stage, source);
      if let Some(ParseFailure::NotANumber(raw)) = source.downcast_ref::<ParseFailure>() {
        info!("Offending value: {:?}", raw);
      }
    }
    Err(other) => warn!("Chain failed: {}", other),
  }
  // The sum stage never saw a batch on the failed run.
  assert!(bad.outputs().is_empty());
}
