// sluice/src/core/item.rs

/// Bound shared by every element kind flowing through a chain.
///
/// `Clone` is required because `publish` hands a copy of the output buffer
/// downstream while the publishing stage keeps its own copy for `outputs()`.
pub trait Item: Clone + Send + Sync + 'static {}

impl<T> Item for T where T: Clone + Send + Sync + 'static {}
