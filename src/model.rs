// Wire shapes returned by the upload endpoint.

use crate::error::{Result, UploadError};
use serde::{Deserialize, Serialize};

/// Successful upload: where the object lives and what the service
/// recorded about it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UploadResponse {
    pub url: String,
    pub metadata: Metadata,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub original_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub upload_time: String,
}

/// The response envelope, discriminated by its `status` field. A missing
/// or null `status` counts as unknown, as does any unrecognized value.
#[derive(Deserialize, Debug, PartialEq, Eq)]
#[serde(try_from = "Envelope")]
pub enum ApiResponse {
    Success(UploadResponse),
    Error { message: String },
    Unknown,
}

/// Wire form of the envelope: the status plus every other field, kept
/// undecoded until the status says which shape they take.
#[derive(Deserialize)]
struct Envelope {
    status: Option<String>,
    #[serde(flatten)]
    rest: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl TryFrom<Envelope> for ApiResponse {
    type Error = serde_json::Error;

    fn try_from(envelope: Envelope) -> std::result::Result<Self, serde_json::Error> {
        let rest = serde_json::Value::Object(envelope.rest);
        match envelope.status.as_deref() {
            Some("success") => Ok(ApiResponse::Success(UploadResponse::deserialize(rest)?)),
            Some("error") => {
                let body = ErrorBody::deserialize(rest)?;
                Ok(ApiResponse::Error {
                    message: body.message.unwrap_or_default(),
                })
            }
            _ => Ok(ApiResponse::Unknown),
        }
    }
}

impl ApiResponse {
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    pub fn into_result(self) -> Result<UploadResponse> {
        match self {
            ApiResponse::Success(resp) => Ok(resp),
            ApiResponse::Error { message } => Err(UploadError::Remote { message }),
            ApiResponse::Unknown => Err(UploadError::UnknownStatus),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_success_envelope() {
        let body = br#"{"status":"success","url":"https://x/y.png","metadata":{"original_name":"y.png","file_type":"image/png","file_size":123,"upload_time":"2024-01-01T00:00:00Z"}}"#;
        let resp = ApiResponse::from_slice(body).unwrap().into_result().unwrap();
        assert_eq!(resp.url, "https://x/y.png");
        assert_eq!(
            resp.metadata,
            Metadata {
                original_name: "y.png".into(),
                file_type: "image/png".into(),
                file_size: 123,
                upload_time: "2024-01-01T00:00:00Z".into(),
            }
        );
    }

    #[test]
    fn decodes_error_envelope() {
        let body = br#"{"status":"error","message":"quota exceeded"}"#;
        let parsed = ApiResponse::from_slice(body).unwrap();
        assert_eq!(
            parsed,
            ApiResponse::Error {
                message: "quota exceeded".into()
            }
        );
        match parsed.into_result() {
            Err(UploadError::Remote { message }) => assert_eq!(message, "quota exceeded"),
            other => panic!("expected remote error, got {:?}", other),
        }
    }

    #[test]
    fn other_status_values_are_unknown() {
        let body = br#"{"status":"pending","eta":5}"#;
        let parsed = ApiResponse::from_slice(body).unwrap();
        assert_eq!(parsed, ApiResponse::Unknown);
        assert!(matches!(parsed.into_result(), Err(UploadError::UnknownStatus)));
    }

    #[test]
    fn missing_or_null_status_is_unknown() {
        for body in [&br#"{"url":"x"}"#[..], br#"{"status":null}"#, b"{}"] {
            assert!(matches!(
                ApiResponse::from_slice(body).and_then(ApiResponse::into_result),
                Err(UploadError::UnknownStatus)
            ));
        }
    }

    #[test]
    fn error_without_message_has_empty_message() {
        for body in [&br#"{"status":"error"}"#[..], br#"{"status":"error","message":null}"#] {
            match ApiResponse::from_slice(body).and_then(ApiResponse::into_result) {
                Err(UploadError::Remote { message }) => assert_eq!(message, ""),
                other => panic!("expected remote error, got {:?}", other),
            }
        }
    }

    #[test]
    fn malformed_bodies_fail_to_decode() {
        for body in [
            &b"not json"[..],
            b"[1,2]",
            br#"{"status":5}"#,
            br#"{"status":"success"}"#,
            br#"{"status":"error","message":42}"#,
        ] {
            assert!(matches!(
                ApiResponse::from_slice(body),
                Err(UploadError::Decode(_))
            ));
        }
    }
}
