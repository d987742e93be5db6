use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{Category, Language};

/// `text` stays untyped so a missing or non-string value can be answered with
/// a 400 instead of an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    #[serde(default)]
    pub text: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub category: Category,
    pub confidence: f64,
    pub language: Language,
}

#[derive(Debug, Deserialize)]
pub struct CreateComplaintRequest {
    #[serde(default)]
    pub text: Option<Value>,
    #[serde(default)]
    pub language: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComplaintResponse {
    pub ticket_id: String,
    pub category: Category,
    pub language: Language,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub message: String,
}
