//! Shared behaviour of persisted job records

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::status::JobStatus;

/// Rejected status change
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition from {from} to {to}")]
pub struct InvalidTransition {
    pub from: JobStatus,
    pub to: JobStatus,
}

/// A record owned by the job record store
///
/// Both job kinds share the status lifecycle, so the store and the transition
/// guard are written once against this trait.
pub trait JobRecord: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;

    fn status(&self) -> JobStatus;

    /// Raw status write. Callers go through [`JobRecord::transition`].
    fn set_status(&mut self, status: JobStatus);

    fn touch(&mut self, at: DateTime<Utc>);

    /// Move to `next` if the lifecycle allows it, bumping `updated_at`
    fn transition(&mut self, next: JobStatus) -> Result<(), InvalidTransition> {
        let from = self.status();
        if !from.can_transition_to(next) {
            return Err(InvalidTransition { from, to: next });
        }
        self.set_status(next);
        self.touch(Utc::now());
        Ok(())
    }
}
