//! Health check endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::app::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: DatabaseHealth,
    pub external_services: ExternalServicesHealth,
}

/// Database health status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseHealth {
    pub connected: bool,
    pub latency_ms: Option<u64>,
}

/// External services health status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ExternalServicesHealth {
    pub eta_provider: EtaProviderHealth,
    pub email: EmailHealth,
}

/// ETA provider status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EtaProviderHealth {
    pub configured: bool,
}

/// Email delivery status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EmailHealth {
    pub enabled: bool,
    pub provider: String,
}

/// Simple status response for liveness/readiness probes.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Full health check endpoint.
///
/// Returns detailed health information including database connectivity and
/// external service configuration.
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, StatusCode> {
    let start = std::time::Instant::now();
    let db_connected = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();
    let latency_ms = start.elapsed().as_millis() as u64;

    let response = HealthResponse {
        status: if db_connected { "healthy" } else { "unhealthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: DatabaseHealth {
            connected: db_connected,
            latency_ms: if db_connected { Some(latency_ms) } else { None },
        },
        external_services: ExternalServicesHealth {
            eta_provider: EtaProviderHealth {
                configured: state.eta.is_some(),
            },
            email: EmailHealth {
                enabled: state.email.is_enabled(),
                provider: state.config.email.provider.clone(),
            },
        },
    };

    if db_connected {
        Ok(Json(response))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

/// Liveness probe endpoint.
///
/// Returns 200 OK if the process is running.
pub async fn live() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe endpoint.
///
/// Returns 200 OK if the service can accept traffic (database connected).
pub async fn ready(State(state): State<AppState>) -> Result<Json<StatusResponse>, StatusCode> {
    let db_connected = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();

    if db_connected {
        Ok(Json(StatusResponse {
            status: "ready".to_string(),
        }))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_response_serialization() {
        let response = StatusResponse {
            status: "alive".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"status":"alive"}"#);
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.9.2".to_string(),
            database: DatabaseHealth {
                connected: true,
                latency_ms: Some(3),
            },
            external_services: ExternalServicesHealth {
                eta_provider: EtaProviderHealth { configured: false },
                email: EmailHealth {
                    enabled: false,
                    provider: "console".to_string(),
                },
            },
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"connected\":true"));
        assert!(json.contains("eta_provider"));
    }
}
