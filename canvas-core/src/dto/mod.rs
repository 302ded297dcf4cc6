//! Data Transfer Objects for the HTTP API and asynchronous messaging
//!
//! This module contains DTOs exchanged between the orchestrator, its clients,
//! the inference backend's completion signals and downstream notification
//! subscribers.

pub mod catalog;
pub mod endpoint;
pub mod job;
pub mod notification;
pub mod page;
pub mod signal;
pub mod upload;
