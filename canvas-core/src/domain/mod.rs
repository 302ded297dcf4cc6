//! Core domain types
//!
//! This module contains the core domain structures used across Canvas services.
//! These types represent the fundamental business entities and are shared between
//! the orchestrator (which persists them) and the client/CLI (which display them).

pub mod catalog;
pub mod endpoint;
pub mod job;
pub mod object_key;
pub mod record;
pub mod status;
