// sluice/src/compound/mod.rs

//! The two-stream extension: operators with a main and a secondary input lane
//! and a main and a secondary output lane.
//!
//! The base linear model (`Source`/`Operator`) does not depend on anything here.

pub mod operator;
pub mod port;
pub mod transform;

pub use operator::CompoundOperator;
pub use port::{InputPort, OutputPort};
pub use transform::{CompoundTransform, Streams};
