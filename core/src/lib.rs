// src/lib.rs

//! Sluice: a small, type-safe publisher/subscriber pipeline composition framework.
//!
//! Sluice lets independent data-transformation stages be chained into a
//! linear (or dual-output) processing graph, with features like:
//!  - Stages strongly typed on their input/output element kinds, checked when the chain is built.
//!  - Fluent composition: `source.operate(a).operate(b)` returns each next stage.
//!  - A single `run()` on the last stage drives the whole chain.
//!  - Compound operators with a main and a secondary input and output stream.
//!  - A `Chain` container that owns every stage of a pipeline.

pub mod chain;
pub mod compound;
pub mod core;
pub mod error;
pub mod operator;

// --- Re-exports for the Public API ---

// Stage contracts
pub use crate::core::component::{PipelineComponent, StageId};
pub use crate::core::item::Item;
pub use crate::core::publisher::Publisher;
pub use crate::core::subscriber::Subscriber;
pub use crate::core::transform::{Produce, Transform};

// Concrete stages
pub use crate::operator::{Operator, Source};
pub use crate::compound::{CompoundOperator, CompoundTransform, InputPort, OutputPort, Streams};

pub use crate::chain::Chain;

pub use crate::error::{StageError, StageResult};

/*
    Execution model:
    1. Build stages (`Source`, `Operator`, `CompoundOperator`) and wire them with
       `operate`, or let a `Chain` do it and own them.
    2. Call `run()` on the last stage. Activation walks upstream until it reaches
       the head, which produces its batch directly.
    3. Each `publish` pushes a batch into the next stage's `receive`, which runs
       that stage's `process_data` on the spot. Every stage's `run` then publishes
       its own outputs further down.
    4. The first failure unwinds through every `receive`/`publish`/`run` frame to
       the original caller; stages before the failure keep what they produced.
*/
