//! Endpoint deployment endpoints

use canvas_core::domain::endpoint::EndpointDeploymentJob;
use canvas_core::dto::endpoint::DeployEndpoint;
use canvas_core::dto::job::{JobLookup, SubmittedJob};
use canvas_core::dto::page::{ListQuery, Page};
use uuid::Uuid;

use crate::CanvasClient;
use crate::error::Result;

impl CanvasClient {
    /// Start provisioning an inference endpoint
    pub async fn deploy_endpoint(&self, req: &DeployEndpoint) -> Result<SubmittedJob> {
        let response = self
            .post("/inference/deploy-sagemaker-endpoint")
            .json(req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    pub async fn get_endpoint_deployment_job(&self, job_id: Uuid) -> Result<EndpointDeploymentJob> {
        let response = self
            .get("/inference/get-endpoint-deployment-job")
            .query(&JobLookup { job_id })
            .send()
            .await?;

        self.handle_response(response).await
    }

    pub async fn list_endpoint_deployment_jobs(
        &self,
        page_token: Option<String>,
        limit: Option<u32>,
    ) -> Result<Page<EndpointDeploymentJob>> {
        let response = self
            .get("/inference/list-endpoint-deployment-jobs")
            .query(&ListQuery { page_token, limit })
            .send()
            .await?;

        self.handle_response(response).await
    }
}
