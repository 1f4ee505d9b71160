pub mod config;
pub mod controller;
pub mod generator;
pub mod models;
pub mod service;
pub mod view;

pub use controller::{GenerationController, LifecycleState, NotificationSink, SubmitOutcome, SubmitRejection};
pub use generator::{GenerationError, GenerationService, HttpGenerationService};
