pub mod component;
pub mod item;
pub(crate) mod link;
pub mod publisher;
pub mod subscriber;
pub mod transform;

// Re-export key types for easier access from other sluice modules (and lib.rs)
pub use component::{PipelineComponent, StageId};
pub use item::Item;
pub use publisher::Publisher;
pub use subscriber::Subscriber;
pub use transform::{Produce, Transform};
