//! API key wire models.

use crate::db::models::api_keys::ApiKeyDBResponse;
use crate::types::ApiKeyId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyCreate {
    pub name: String,
}

/// Full response including the secret. Only ever returned from create.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: ApiKeyId,
    pub name: String,
    pub secret: String,
    pub created_at: DateTime<Utc>,
}

impl From<ApiKeyDBResponse> for ApiKeyResponse {
    fn from(api_key: ApiKeyDBResponse) -> Self {
        Self {
            id: api_key.id,
            name: api_key.name,
            secret: api_key.secret,
            created_at: api_key.created_at,
        }
    }
}

/// List view. Shows a suffix of the secret for recognition, never the whole
/// value.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyInfoResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: ApiKeyId,
    pub name: String,
    pub secret_hint: String,
    pub last_used: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<ApiKeyDBResponse> for ApiKeyInfoResponse {
    fn from(api_key: ApiKeyDBResponse) -> Self {
        let secret_hint = api_key
            .secret
            .char_indices()
            .rev()
            .nth(3)
            .map(|(i, _)| format!("...{}", &api_key.secret[i..]))
            .unwrap_or_default();

        Self {
            id: api_key.id,
            name: api_key.name,
            secret_hint,
            last_used: api_key.last_used,
            created_at: api_key.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_info_response_redacts_secret() {
        let api_key = ApiKeyDBResponse {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            name: "CI".to_string(),
            secret: "fsk-abcdefgh1234".to_string(),
            created_by: Uuid::new_v4(),
            last_used: None,
            created_at: Utc::now(),
        };

        let info = ApiKeyInfoResponse::from(api_key);
        assert_eq!(info.secret_hint, "...1234");
        let body = serde_json::to_string(&info).unwrap();
        assert!(!body.contains("fsk-abcdefgh1234"));
    }
}
