//! Core services.

pub mod publish;

pub use publish::PublishService;
