//! Repository Module
//!
//! Data access layer for the orchestrator: the job record store.
//!
//! The store is the single source of truth for job state. Writers never
//! overwrite blindly; every update names the status it expects to find, so a
//! stale writer cannot regress a terminal record.

pub mod endpoint;
pub mod job;
pub mod memory;

use async_trait::async_trait;
use canvas_core::domain::record::{InvalidTransition, JobRecord};
use canvas_core::domain::status::JobStatus;
use thiserror::Error;
use uuid::Uuid;

pub use job::PgStore;
pub use memory::MemoryStore;

pub const DEFAULT_PAGE_LIMIT: u32 = 20;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Store error type
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(Uuid),

    #[error("record {0} already exists")]
    AlreadyExists(Uuid),

    #[error("record {id} is {actual}, expected {expected}")]
    Conflict {
        id: Uuid,
        expected: JobStatus,
        actual: JobStatus,
    },

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    #[error("invalid page token '{0}'")]
    InvalidPageToken(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Mutation applied by a conditional update
pub type Mutator<'a, T> = &'a (dyn Fn(&mut T) -> Result<(), InvalidTransition> + Send + Sync);

/// Opaque continuation token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageToken(String);

impl PageToken {
    pub(crate) fn from_position(position: u64) -> Self {
        Self(format!("{:x}", position))
    }

    pub(crate) fn position(&self) -> Result<u64, StoreError> {
        u64::from_str_radix(&self.0, 16).map_err(|_| StoreError::InvalidPageToken(self.0.clone()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PageToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Page request with a clamped limit
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub token: Option<PageToken>,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(token: Option<String>, limit: Option<u32>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()).map(PageToken::from),
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
        }
    }

    pub fn first(limit: u32) -> Self {
        Self::new(None, Some(limit))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of records in insertion order
#[derive(Debug, Clone)]
pub struct StorePage<T> {
    pub items: Vec<T>,
    pub next: Option<PageToken>,
}

/// Job record store
///
/// `update` is compare-and-set on the current status: the mutator runs only
/// when the stored status equals `expected`, otherwise `StoreError::Conflict`
/// reports what was actually found.
#[async_trait]
pub trait RecordStore<T: JobRecord>: Send + Sync {
    async fn create(&self, record: &T) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid) -> Result<T, StoreError>;

    async fn update(
        &self,
        id: Uuid,
        expected: JobStatus,
        mutator: Mutator<'_, T>,
    ) -> Result<T, StoreError>;

    async fn list(&self, page: &PageRequest) -> Result<StorePage<T>, StoreError>;
}
