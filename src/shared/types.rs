use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Flat `{ "message": ... }` body used for mutation acks and for errors.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Deserializer for update-DTO fields that must distinguish "set to null"
/// from "omitted".
///
/// Used together with `#[serde(default)]`: an absent key stays `None`, an
/// explicit `null` becomes `Some(None)`, a value becomes `Some(Some(v))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
