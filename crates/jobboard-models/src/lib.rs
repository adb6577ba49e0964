//! Shared data models for the job board backend.
//!
//! This crate provides Serde-serializable types for:
//! - Job listings and the filters applied to them
//! - Applications and their read-time job join
//! - Document identifiers
//! - Write acknowledgments returned by the document store

pub mod ack;
pub mod application;
pub mod id;
pub mod job;

// Re-export common types
pub use ack::{DeleteAck, InsertAck, UpdateAck};
pub use application::{Application, ApplicationView, JoinFields, StatusUpdate};
pub use id::{DocumentId, IdError};
pub use job::{deadline_cutoff, Job, JobFilter, JobQuery, AVAILABLE_JOBS_LIMIT};
