//! Canvas Core
//!
//! Core types and abstractions for the Canvas inference job service.
//!
//! This crate contains:
//! - Domain types: Core business entities (InferenceJob, EndpointDeploymentJob, etc.)
//! - DTOs: Data transfer objects for the HTTP API, completion signals and notifications

pub mod domain;
pub mod dto;
