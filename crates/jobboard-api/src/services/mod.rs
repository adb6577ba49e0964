//! Business logic services.

pub mod application;

pub use application::ApplicationService;
