//! Video room provisioning for consultations.
//!
//! Rooms are provisioned against a Daily-style REST API. Provisioning is
//! best-effort: on any failure the consultation is still created, just
//! without a room attached.

use serde::Deserialize;
use serde_json::json;
use tracing::{instrument, warn};

use crate::config::VideoConfig;

/// A provisioned video room.
#[derive(Debug, Clone)]
pub struct VideoRoom {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct RoomResponse {
    name: String,
    url: String,
}

pub struct VideoService {
    config: VideoConfig,
    client: reqwest::Client,
}

impl VideoService {
    pub fn new(config: VideoConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Provision a room for a consultation. Returns None when provisioning is
    /// disabled or the upstream call fails.
    #[instrument(skip(self))]
    pub async fn provision_room(&self, room_name: &str) -> Option<VideoRoom> {
        if !self.config.enabled {
            return None;
        }

        let api_key = match &self.config.api_key {
            Some(key) => key,
            None => {
                warn!("video provisioning enabled but no API key configured");
                return None;
            }
        };

        match self.create_room(api_key, room_name).await {
            Ok(room) => Some(room),
            Err(e) => {
                warn!("video room provisioning failed: {e}");
                None
            }
        }
    }

    async fn create_room(&self, api_key: &str, room_name: &str) -> anyhow::Result<VideoRoom> {
        let response = self
            .client
            .post(format!("{}/rooms", self.config.base_url))
            .bearer_auth(api_key)
            .json(&json!({
                "name": room_name,
                "privacy": "public",
            }))
            .send()
            .await?
            .error_for_status()?;

        let room: RoomResponse = response.json().await?;
        Ok(VideoRoom {
            name: room.name,
            url: room.url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_service_returns_none() {
        let service = VideoService::new(VideoConfig::default());
        assert!(service.provision_room("room-1").await.is_none());
    }

    #[tokio::test]
    async fn test_enabled_without_key_returns_none() {
        let config = VideoConfig {
            enabled: true,
            ..Default::default()
        };
        let service = VideoService::new(config);
        assert!(service.provision_room("room-1").await.is_none());
    }
}
