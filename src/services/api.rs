//! API response types for the HTTP speed endpoints.

use serde::{Deserialize, Serialize};

use crate::TachoState;

// ============================================================================
// Response Types
// ============================================================================

/// API response wrapper for consistent JSON structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (present when success=true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (present when success=false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response with data
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Speed reading for one motor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedResponse {
    /// Motor id
    pub id: u8,
    /// Last estimate in RPM; 0 while stopped
    pub rpm: u32,
}

/// Full status document: every motor plus device uptime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateResponse {
    /// One entry per registered motor, in registration order
    pub motors: Vec<SpeedResponse>,
    /// Milliseconds since the reporting state was created
    pub uptime_ms: u64,
}

impl StateResponse {
    /// Build a status document from a tachometer snapshot.
    pub fn new(state: &TachoState, uptime_ms: u64) -> Self {
        Self {
            motors: state
                .motors
                .iter()
                .map(|m| SpeedResponse {
                    id: m.id,
                    rpm: m.rpm,
                })
                .collect(),
            uptime_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MotorSpeed;

    #[test]
    fn ok_response_serializes_without_error_field() {
        let resp = ApiResponse::ok(SpeedResponse { id: 1, rpm: 600 });
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("\"rpm\":600"));
        assert!(!json.contains("error"));
    }

    #[test]
    fn err_response_serializes_without_data_field() {
        let resp = ApiResponse::<SpeedResponse>::err("Unknown motor id");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("Unknown motor id"));
        assert!(!json.contains("data"));
    }

    #[test]
    fn state_response_copies_snapshot() {
        let mut state = TachoState::default();
        state.motors.push(MotorSpeed { id: 1, rpm: 600 }).unwrap();
        state.motors.push(MotorSpeed { id: 2, rpm: 0 }).unwrap();

        let resp = StateResponse::new(&state, 1234);
        assert_eq!(resp.motors.len(), 2);
        assert_eq!(resp.motors[0], SpeedResponse { id: 1, rpm: 600 });
        assert_eq!(resp.motors[1], SpeedResponse { id: 2, rpm: 0 });
        assert_eq!(resp.uptime_ms, 1234);
    }
}
