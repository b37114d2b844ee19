use serde::{Deserialize, Serialize};

/// Success envelope. Payload fields are flattened next to `success`, so a
/// payload of `{ id }` renders as `{ "success": true, "id": ... }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub code: String,
    pub message: String,
}

impl ApiErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: code.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub service: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthResponse {
    pub fn healthy(service: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Healthy,
            service: service.into(),
            version: version.into(),
            checks: None,
        }
    }

    pub fn with_checks(mut self, checks: Vec<HealthCheck>) -> Self {
        self.status = if checks.iter().any(|c| c.status == HealthStatus::Unhealthy) {
            HealthStatus::Unhealthy
        } else {
            HealthStatus::Healthy
        };
        self.checks = Some(checks);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Created {
        id: String,
    }

    #[test]
    fn payload_fields_are_flattened() {
        let resp = ApiResponse::ok_with_message(Created { id: "abc".into() }, "Profile Created");
        let value = serde_json::to_value(&resp).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["message"], "Profile Created");
        assert_eq!(value["id"], "abc");
        assert!(value.get("data").is_none());
    }

    #[test]
    fn message_is_omitted_when_absent() {
        let value = serde_json::to_value(ApiResponse::ok(serde_json::json!({ "likes": 3 }))).unwrap();
        assert!(value.get("message").is_none());
        assert_eq!(value["likes"], 3);
    }

    #[test]
    fn failing_check_makes_service_unhealthy() {
        let resp = HealthResponse::healthy("svc", "0.1.0").with_checks(vec![HealthCheck {
            name: "store".into(),
            status: HealthStatus::Unhealthy,
            message: Some("down".into()),
        }]);
        assert_eq!(resp.status, HealthStatus::Unhealthy);
    }
}
