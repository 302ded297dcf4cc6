//! Auxiliary model catalogs
//!
//! Add-on models (textual inversions, LoRAs, hypernetworks, ControlNet models)
//! are static configuration, not job state.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    TextualInversion,
    Lora,
    Hypernetwork,
    Controlnet,
}

impl ModelKind {
    pub const ALL: [ModelKind; 4] = [
        ModelKind::TextualInversion,
        ModelKind::Lora,
        ModelKind::Hypernetwork,
        ModelKind::Controlnet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ModelKind::TextualInversion => "textual_inversion",
            ModelKind::Lora => "lora",
            ModelKind::Hypernetwork => "hypernetwork",
            ModelKind::Controlnet => "controlnet",
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "textual_inversion" | "texual_inversion" | "embedding" => {
                Ok(ModelKind::TextualInversion)
            }
            "lora" => Ok(ModelKind::Lora),
            "hypernetwork" => Ok(ModelKind::Hypernetwork),
            "controlnet" | "controlnet_model" => Ok(ModelKind::Controlnet),
            other => Err(format!("unknown model kind: {}", other)),
        }
    }
}

/// Catalog of add-on models, one list per kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCatalog {
    #[serde(default)]
    pub textual_inversion: Vec<String>,
    #[serde(default)]
    pub lora: Vec<String>,
    #[serde(default)]
    pub hypernetwork: Vec<String>,
    #[serde(default)]
    pub controlnet: Vec<String>,
}

impl ModelCatalog {
    pub fn models(&self, kind: ModelKind) -> &[String] {
        match kind {
            ModelKind::TextualInversion => &self.textual_inversion,
            ModelKind::Lora => &self.lora,
            ModelKind::Hypernetwork => &self.hypernetwork,
            ModelKind::Controlnet => &self.controlnet,
        }
    }

    /// Names referenced by a request that the catalog does not list
    pub fn unknown<'a>(&self, kind: ModelKind, requested: &'a [String]) -> Vec<&'a str> {
        let known = self.models(kind);
        requested
            .iter()
            .filter(|name| !known.contains(name))
            .map(String::as_str)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        ModelKind::ALL.iter().all(|kind| self.models(*kind).is_empty())
    }
}
