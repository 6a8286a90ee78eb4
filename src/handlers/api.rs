use axum::{http::StatusCode, response::Json};
use serde_json::{Value, json};

/// Health check handler used by deployment liveness checks.
pub async fn health_check() -> Result<Json<Value>, StatusCode> {
    Ok(Json(json!({
        "status": "OK"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_reports_ok() {
        let Json(body) = health_check().await.unwrap();
        assert_eq!(body["status"], "OK");
    }
}
