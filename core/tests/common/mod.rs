// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use parking_lot::Mutex;
use sluice::{Operator, Source, Transform};
use std::sync::Arc;
use tracing::Level;

// --- Common Error Type for Tests ---
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Zero is not allowed in stage '{0}'")]
  ZeroInput(String),

  #[error("Test producer failed: {0}")]
  Producer(String),
}

// --- Shared log of what ran, in order ---
#[derive(Clone, Default, Debug)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn record(&self, entry: impl Into<String>) {
    self.0.lock().push(entry.into());
  }

  pub fn entries(&self) -> Vec<String> {
    self.0.lock().clone()
  }

  pub fn count(&self, entry: &str) -> usize {
    self.0.lock().iter().filter(|e| e.as_str() == entry).count()
  }
}

/// Transform that copies its input unchanged and journals every call as
/// `process:<name>` plus the batch it saw.
pub struct RecordingIdentity {
  pub name: String,
  pub journal: Journal,
  pub batches: Arc<Mutex<Vec<Vec<i32>>>>,
}

impl Transform<i32, i32> for RecordingIdentity {
  fn process_data(&mut self, inputs: &[i32]) -> anyhow::Result<Vec<i32>> {
    self.journal.record(format!("process:{}", self.name));
    self.batches.lock().push(inputs.to_vec());
    Ok(inputs.to_vec())
  }
}

pub fn recording_identity(name: &str, journal: &Journal) -> (Arc<Operator<i32, i32>>, Arc<Mutex<Vec<Vec<i32>>>>) {
  let batches = Arc::new(Mutex::new(Vec::new()));
  let op = Operator::new(
    name,
    RecordingIdentity {
      name: name.to_string(),
      journal: journal.clone(),
      batches: batches.clone(),
    },
  );
  (op, batches)
}

pub fn journaled_source(name: &'static str, items: Vec<i32>, journal: &Journal) -> Arc<Source<i32>> {
  let journal = journal.clone();
  Source::<i32>::from_fn(name, move || {
    journal.record(format!("produce:{}", name));
    Ok(items.clone())
  })
}

pub fn doubler(name: &str) -> Arc<Operator<i32, i32>> {
  Operator::<i32, i32>::from_fn(name, |xs: &[i32]| Ok(xs.iter().map(|x| x * 2).collect()))
}

pub fn stringifier(name: &str) -> Arc<Operator<i32, String>> {
  Operator::<i32, String>::from_fn(name, |xs: &[i32]| Ok(xs.iter().map(|x| x.to_string()).collect()))
}

/// Fails with `TestError::ZeroInput` as soon as a zero shows up; otherwise identity.
pub fn zero_rejecter(name: &'static str) -> Arc<Operator<i32, i32>> {
  Operator::<i32, i32>::from_fn(name, move |xs: &[i32]| {
    if xs.contains(&0) {
      return Err(TestError::ZeroInput(name.to_string()).into());
    }
    Ok(xs.to_vec())
  })
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::TRACE)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
