use serde::Serialize;

/// Uniform body shape shared by every endpoint, success and failure
/// alike. Clients branch on `code` and read `result` only when it is
/// `"ok"`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub code: &'static str,
    pub error_messages: Vec<String>,
    pub result: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(result: T) -> Self {
        Self {
            code: "ok",
            error_messages: Vec::new(),
            result,
        }
    }
}

impl Envelope<serde_json::Value> {
    pub fn error(code: &'static str, error_messages: Vec<String>) -> Self {
        Self {
            code,
            error_messages,
            result: serde_json::json!({}),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_serializes_with_empty_errors() {
        let body = serde_json::to_value(Envelope::ok(serde_json::json!({"total_count": 0}))).unwrap();
        assert_eq!(body["code"], "ok");
        assert_eq!(body["error_messages"].as_array().unwrap().len(), 0);
        assert_eq!(body["result"]["total_count"], 0);
    }

    #[test]
    fn error_envelope_has_empty_result() {
        let body = serde_json::to_value(Envelope::error(
            "validation_error",
            vec!["severity is invalid".into()],
        ))
        .unwrap();
        assert_eq!(body["code"], "validation_error");
        assert_eq!(body["error_messages"][0], "severity is invalid");
        assert!(body["result"].as_object().unwrap().is_empty());
    }
}
