pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_serializes_as_status_object() -> anyhow::Result<()> {
        let body = serde_json::to_value(types::Health { status: "ok" })?;
        assert_eq!(body, serde_json::json!({ "status": "ok" }));
        Ok(())
    }

    #[test]
    fn error_body_serializes_kind_and_message() -> anyhow::Result<()> {
        let body = serde_json::to_value(types::ErrorBody {
            error: "parse_error".into(),
            message: "expected value".into(),
        })?;
        assert_eq!(body, serde_json::json!({ "error": "parse_error", "message": "expected value" }));
        Ok(())
    }
}
