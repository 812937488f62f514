// tests/error_handling_tests.rs
mod common;

use common::*;
use serial_test::serial;
use sluice::{Chain, Operator, Publisher, Source, StageError};

#[test]
#[serial]
fn test_middle_stage_failure_aborts_the_chain() {
  setup_tracing();
  let journal = Journal::new();
  let source = journaled_source("numbers", vec![1, 0, 2], &journal);
  let middle = zero_rejecter("middle");
  let (last, last_batches) = recording_identity("last", &journal);
  source.operate(middle.clone()).operate(last.clone());

  let result = last.run();

  match result {
    Err(StageError::Processing { stage, source }) => {
      assert_eq!(stage, "middle");
      assert_eq!(
        source.downcast_ref::<TestError>(),
        Some(&TestError::ZeroInput("middle".to_string()))
      );
    }
    other => panic!("Expected StageError::Processing, got {:?}", other),
  }

  // The stage after the failing one never had receive invoked.
  assert!(last_batches.lock().is_empty());
  assert!(last.inputs().is_empty());
  assert_eq!(journal.count("process:last"), 0);
  // Failed processing leaves no stale outputs behind.
  assert!(middle.outputs().is_empty());
  // Upstream side effects are not rolled back.
  assert_eq!(source.outputs(), vec![1, 0, 2]);
}

#[test]
#[serial]
fn test_same_chain_succeeds_without_the_poison_value() {
  setup_tracing();
  let source = Source::from_items("numbers", vec![1, 3, 2]);
  let middle = zero_rejecter("middle");
  let last = doubler("last");
  source.operate(middle.clone()).operate(last.clone());

  last.run().unwrap();
  assert_eq!(last.outputs(), vec![2, 6, 4]);
}

#[test]
#[serial]
fn test_producer_failure_is_attributed_to_the_source() {
  setup_tracing();
  let source = Source::<i32>::from_fn("flaky", || Err(TestError::Producer("disk gone".to_string()).into()));
  let double = doubler("double");
  let chain = Chain::new(source).operate(double);

  let err = chain.run().unwrap_err();
  assert_eq!(err.stage(), Some("flaky"));
  assert!(err.to_string().contains("flaky"));
  assert!(err.to_string().contains("disk gone"));
  assert!(chain.outputs().is_empty());
}

#[test]
#[serial]
fn test_error_is_not_rewrapped_by_outer_stages() {
  setup_tracing();
  let chain = Chain::new(Source::from_items("numbers", vec![0]))
    .operate(zero_rejecter("guard"))
    .operate(doubler("a"))
    .operate(doubler("b"))
    .operate(stringifier("c"));

  let err = chain.run().unwrap_err();
  // Reported once, by the failing stage, however deep the chain is.
  assert_eq!(err.stage(), Some("guard"));
  assert!(matches!(err, StageError::Processing { .. }));
}

#[test]
#[serial]
fn test_anyhow_error_carrying_stage_error_converts_back() {
  setup_tracing();
  let original = StageError::Internal("boom".to_string());
  let wrapped = anyhow::Error::new(original);
  let converted = StageError::from(wrapped);
  assert!(matches!(converted, StageError::Internal(ref msg) if msg == "boom"));

  let foreign = anyhow::anyhow!("plain failure");
  match StageError::from(foreign) {
    StageError::Processing { stage, source } => {
      assert_eq!(stage, "<unknown>");
      assert_eq!(source.to_string(), "plain failure");
    }
    other => panic!("Expected Processing, got {:?}", other),
  }
}

#[test]
#[serial]
fn test_operator_recovers_on_next_successful_run() {
  setup_tracing();
  let mut batches = vec![vec![0], vec![5]].into_iter();
  let source = Source::<i32>::from_fn("scripted", move || Ok(batches.next().unwrap_or_default()));
  let guard = zero_rejecter("guard");
  let to_string: std::sync::Arc<Operator<i32, String>> = stringifier("to_string");
  source.operate(guard.clone()).operate(to_string.clone());

  assert!(to_string.run().is_err());
  assert!(to_string.outputs().is_empty());

  to_string.run().unwrap();
  assert_eq!(to_string.outputs(), vec!["5"]);
}
