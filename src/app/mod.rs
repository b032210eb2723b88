// Application layer - Use case interactors

pub mod container;
pub mod publish_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use publish_interactor::PublishPipeline;
