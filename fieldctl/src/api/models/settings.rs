//! Company settings wire models: arrival windows and portal invites.

use crate::db::models::arrival_windows::{ArrivalWindowDBRequest, ArrivalWindowDBResponse};
use crate::errors::Error;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One arrival window as submitted by the dashboard. Times are "HH:MM".
/// Fields are optional so that a window with an absent field reaches
/// validation instead of failing in the deserializer.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalWindowInput {
    pub label: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveArrivalWindowsRequest {
    pub windows: Vec<ArrivalWindowInput>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalWindowResponse {
    pub label: String,
    pub start_time: String,
    pub end_time: String,
}

impl From<ArrivalWindowDBResponse> for ArrivalWindowResponse {
    fn from(window: ArrivalWindowDBResponse) -> Self {
        Self {
            label: window.label,
            start_time: window.start_time.format("%H:%M").to_string(),
            end_time: window.end_time.format("%H:%M").to_string(),
        }
    }
}

/// Validate the submitted window list into database requests.
///
/// Any window missing a label or with an unparseable time rejects the whole
/// save; the list either replaces the previous set completely or not at all.
pub fn validate_windows(windows: &[ArrivalWindowInput]) -> Result<Vec<ArrivalWindowDBRequest>, Error> {
    let mut validated = Vec::with_capacity(windows.len());

    for window in windows {
        let label = window.label.as_deref().map(str::trim).unwrap_or_default();
        let parse_time = |time: &Option<String>| {
            time.as_deref()
                .and_then(|t| NaiveTime::parse_from_str(t.trim(), "%H:%M").ok())
        };
        let start_time = parse_time(&window.start_time);
        let end_time = parse_time(&window.end_time);

        match (label.is_empty(), start_time, end_time) {
            (false, Some(start_time), Some(end_time)) => validated.push(ArrivalWindowDBRequest {
                label: label.to_string(),
                start_time,
                end_time,
            }),
            _ => {
                return Err(Error::BadRequest {
                    message: "Each window must have a label, start time, and end time".to_string(),
                })
            }
        }
    }

    Ok(validated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(label: &str, start: &str, end: &str) -> ArrivalWindowInput {
        ArrivalWindowInput {
            label: Some(label.to_string()),
            start_time: Some(start.to_string()),
            end_time: Some(end.to_string()),
        }
    }

    #[test]
    fn test_valid_windows_pass() {
        let windows = vec![window("Morning", "08:00", "10:00"), window("Afternoon", "12:00", "15:00")];
        let validated = validate_windows(&windows).unwrap();
        assert_eq!(validated.len(), 2);
        assert_eq!(validated[0].label, "Morning");
    }

    #[test]
    fn test_empty_list_is_valid() {
        assert!(validate_windows(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_missing_label_rejects_whole_save() {
        let windows = vec![window("Morning", "08:00", "10:00"), window("  ", "12:00", "15:00")];
        let err = validate_windows(&windows).unwrap_err();
        assert_eq!(err.user_message(), "Each window must have a label, start time, and end time");
    }

    #[test]
    fn test_garbage_time_rejects_whole_save() {
        let windows = vec![window("Morning", "8 o'clock", "10:00")];
        let err = validate_windows(&windows).unwrap_err();
        assert_eq!(err.user_message(), "Each window must have a label, start time, and end time");
    }

    #[test]
    fn test_absent_field_rejects_whole_save() {
        let windows = vec![ArrivalWindowInput {
            label: Some("Morning".to_string()),
            start_time: Some("08:00".to_string()),
            end_time: None,
        }];
        let err = validate_windows(&windows).unwrap_err();
        assert_eq!(err.user_message(), "Each window must have a label, start time, and end time");
    }
}
