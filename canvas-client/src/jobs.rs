//! Inference job endpoints

use canvas_core::domain::job::InferenceJob;
use canvas_core::dto::job::{
    InferenceOutput, JobLookup, RunInference, SubmitInference, SubmittedJob,
};
use canvas_core::dto::page::{ListQuery, Page};
use uuid::Uuid;

use crate::CanvasClient;
use crate::error::Result;

impl CanvasClient {
    // =============================================================================
    // Submission
    // =============================================================================

    /// Submit an inference job against an uploaded payload
    ///
    /// # Returns
    /// The new job id. A downstream failure comes back as a 502 error whose
    /// job has already been marked failed.
    pub async fn submit_inference(&self, req: &SubmitInference) -> Result<SubmittedJob> {
        let response = self.post("/inference").json(req).send().await?;

        self.handle_response(response).await
    }

    /// Submit an inference job from a configuration blob under `config/`
    pub async fn run_inference(&self, req: &RunInference) -> Result<SubmittedJob> {
        let response = self
            .post("/inference/run-sagemaker-inference")
            .json(req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Queries
    // =============================================================================

    /// Get an inference job by ID
    pub async fn get_inference_job(&self, job_id: Uuid) -> Result<InferenceJob> {
        let response = self
            .get("/inference/get-inference-job")
            .query(&JobLookup { job_id })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get a time-limited download URL for a succeeded job's result
    ///
    /// Fails with 409 while the job is unfinished or when it failed.
    pub async fn get_inference_job_output(&self, job_id: Uuid) -> Result<InferenceOutput> {
        let response = self
            .get("/inference/get-inference-job-image-output")
            .query(&JobLookup { job_id })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List one page of inference jobs in submission order
    ///
    /// # Arguments
    /// * `page_token` - Token from the previous page, `None` for the first
    /// * `limit` - Page size (the server clamps it to 1..=100)
    pub async fn list_inference_jobs(
        &self,
        page_token: Option<String>,
        limit: Option<u32>,
    ) -> Result<Page<InferenceJob>> {
        let response = self
            .get("/inference/list-inference-jobs")
            .query(&ListQuery { page_token, limit })
            .send()
            .await?;

        self.handle_response(response).await
    }
}
