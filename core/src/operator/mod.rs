// sluice/src/operator/mod.rs

//! Linear-chain stages: the head-of-chain `Source` and the transforming `Operator`.

pub mod base;
pub mod source;

pub use base::Operator;
pub use source::Source;
