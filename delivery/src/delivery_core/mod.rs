pub mod clock;
pub mod engine;
pub mod error;
pub mod notifier;
pub mod store;
