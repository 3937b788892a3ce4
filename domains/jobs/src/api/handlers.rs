//! Job management API handlers
//!
//! Public CRUD over the job resource. Missing rows map to 404 rather than
//! a null body.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use starter_common::{Error, Result, ValidatedJson};

use crate::api::middleware::JobsState;
use crate::domain::entities::{CreateJobRequest, Job, UpdateJobRequest};

const JOB_NOT_FOUND: &str = "Job not found";

/// Response for job deletion
#[derive(Debug, Serialize)]
pub struct DeleteJobResponse {
    pub deleted: bool,
}

/// GET /api/jobs - List all jobs
pub async fn list_jobs(State(state): State<JobsState>) -> Result<Json<Vec<Job>>> {
    let jobs = state.repos.jobs.list().await?;
    Ok(Json(jobs))
}

/// GET /api/jobs/{id} - Get a job by ID
pub async fn get_job(
    State(state): State<JobsState>,
    Path(id): Path<i64>,
) -> Result<Json<Job>> {
    let job = state
        .repos
        .jobs
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound(JOB_NOT_FOUND.to_string()))?;
    Ok(Json(job))
}

/// POST /api/jobs - Create a job
pub async fn create_job(
    State(state): State<JobsState>,
    ValidatedJson(request): ValidatedJson<CreateJobRequest>,
) -> Result<Json<Job>> {
    let job = state
        .repos
        .jobs
        .create(&request.title, &request.description)
        .await?;

    tracing::info!(job_id = job.id, "Job created");
    Ok(Json(job))
}

/// PUT /api/jobs/{id} - Partially update a job
pub async fn update_job(
    State(state): State<JobsState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateJobRequest>,
) -> Result<Json<Job>> {
    let job = state
        .repos
        .jobs
        .update(id, request.title.as_deref(), request.description.as_deref())
        .await?
        .ok_or_else(|| Error::NotFound(JOB_NOT_FOUND.to_string()))?;
    Ok(Json(job))
}

/// DELETE /api/jobs/{id} - Delete a job
pub async fn delete_job(
    State(state): State<JobsState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteJobResponse>> {
    let deleted = state.repos.jobs.delete(id).await?;
    if !deleted {
        return Err(Error::NotFound(JOB_NOT_FOUND.to_string()));
    }

    tracing::info!(job_id = id, "Job deleted");
    Ok(Json(DeleteJobResponse { deleted: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_response_shape() {
        let response = DeleteJobResponse { deleted: true };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"deleted": true}));
    }
}
