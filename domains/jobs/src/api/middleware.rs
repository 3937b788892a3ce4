//! Jobs domain state

use crate::JobsRepositories;

/// Application state for the Jobs domain
#[derive(Clone)]
pub struct JobsState {
    pub repos: JobsRepositories,
}
