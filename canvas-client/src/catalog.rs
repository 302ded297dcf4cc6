//! Model catalog endpoints

use canvas_core::domain::catalog::ModelKind;
use canvas_core::dto::catalog::ModelList;

use crate::CanvasClient;
use crate::error::Result;

/// Route serving the list for `kind`
pub(crate) fn model_list_path(kind: ModelKind) -> &'static str {
    match kind {
        ModelKind::TextualInversion => "/inference/get-texual-inversion-list",
        ModelKind::Lora => "/inference/get-lora-list",
        ModelKind::Hypernetwork => "/inference/get-hypernetwork-list",
        ModelKind::Controlnet => "/inference/get-controlnet-model-list",
    }
}

impl CanvasClient {
    /// List the add-on models of one kind
    pub async fn list_models(&self, kind: ModelKind) -> Result<ModelList> {
        let response = self.get(model_list_path(kind)).send().await?;

        self.handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_route() {
        for kind in ModelKind::ALL {
            assert!(model_list_path(kind).starts_with("/inference/get-"));
        }
        assert_eq!(
            model_list_path(ModelKind::Controlnet),
            "/inference/get-controlnet-model-list"
        );
    }
}
