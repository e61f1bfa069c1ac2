#[derive(Debug, Clone)]
#[derive(serde::Serialize)]
pub struct ErrorResponse<K> {
    #[serde(rename = "error")]
    pub kind: K,
    #[serde(rename = "error_description")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "error_uri")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl<K> ErrorResponse<K> {
    pub fn new(kind: K, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: Some(description.into()),
            uri: None,
        }
    }
}

/// Error kinds that have a catch-all for internal failures.
pub trait ServerErrorKind {
    fn server_error() -> Self;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, serde::Serialize)]
    #[serde(rename_all = "snake_case")]
    enum Kind {
        InvalidGrant,
    }

    #[test]
    fn serializes_with_protocol_field_names() {
        let body = serde_json::to_value(ErrorResponse::new(Kind::InvalidGrant, "invalid code"))
            .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"error": "invalid_grant", "error_description": "invalid code"})
        );
    }
}
