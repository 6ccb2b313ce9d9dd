//! Static catalog of known model schemas.
//!
//! A model schema describes the shape of a model integration: which provider
//! it talks to and what kind of model it is. Model configurations reference a
//! schema by id at create time and inherit its provider and type. The catalog
//! is compiled in; adding a schema means adding an entry here.

use serde::Serialize;
use utoipa::ToSchema;

/// Kind of model a schema describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    Chat,
    Completion,
    Embedding,
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Chat => "chat",
            ModelType::Completion => "completion",
            ModelType::Embedding => "embedding",
        }
    }
}

impl std::str::FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat" => Ok(ModelType::Chat),
            "completion" => Ok(ModelType::Completion),
            "embedding" => Ok(ModelType::Embedding),
            other => Err(format!("unknown model type: {other}")),
        }
    }
}

/// One entry in the schema catalog.
#[derive(Debug, Clone, Copy)]
pub struct ModelSchema {
    pub id: &'static str,
    pub provider_id: &'static str,
    pub model_type: ModelType,
}

/// All schemas this service knows how to configure.
pub const MODEL_SCHEMAS: &[ModelSchema] = &[
    ModelSchema {
        id: "openai-chat",
        provider_id: "openai",
        model_type: ModelType::Chat,
    },
    ModelSchema {
        id: "openai-completion",
        provider_id: "openai",
        model_type: ModelType::Completion,
    },
    ModelSchema {
        id: "openai-embedding",
        provider_id: "openai",
        model_type: ModelType::Embedding,
    },
    ModelSchema {
        id: "anthropic-chat",
        provider_id: "anthropic",
        model_type: ModelType::Chat,
    },
    ModelSchema {
        id: "mistral-chat",
        provider_id: "mistral",
        model_type: ModelType::Chat,
    },
    ModelSchema {
        id: "mistral-embedding",
        provider_id: "mistral",
        model_type: ModelType::Embedding,
    },
    ModelSchema {
        id: "vertex-chat",
        provider_id: "vertex",
        model_type: ModelType::Chat,
    },
    ModelSchema {
        id: "bedrock-chat",
        provider_id: "bedrock",
        model_type: ModelType::Chat,
    },
];

/// Looks up a schema by id. Returns `None` for unknown ids.
pub fn find_schema(schema_id: &str) -> Option<&'static ModelSchema> {
    MODEL_SCHEMAS.iter().find(|s| s.id == schema_id)
}
