use serde::{Deserialize, Serialize};

use crate::config::{
    TrustConfig, DEFAULT_EMAIL_BODY, DEFAULT_EMAIL_SUBJECT, DEFAULT_HOVER_TEXT,
    DEFAULT_REQUEST_BUTTON_TITLE, DEFAULT_SUPPORT_EMAIL,
};

/// Requests accepted on the query boundary, tagged by `action`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum QueryRequest {
    #[serde(rename = "isWhitelisted")]
    IsWhitelisted { domain: String },
    #[serde(rename = "getSupportEmail")]
    GetSupportEmail,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum QueryResponse {
    Trust {
        #[serde(rename = "isWhitelisted")]
        is_whitelisted: bool,
    },
    Support(SupportDetails),
}

/// Display/contact strings handed to the page-side UI. Opaque here: they
/// are never matched or validated, only passed through.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SupportDetails {
    pub support_email: String,
    pub request_button_title: String,
    pub email_subject: String,
    pub email_body: String,
    pub hover_text: String,
}

impl Default for SupportDetails {
    fn default() -> Self {
        Self {
            support_email: DEFAULT_SUPPORT_EMAIL.to_string(),
            request_button_title: DEFAULT_REQUEST_BUTTON_TITLE.to_string(),
            email_subject: DEFAULT_EMAIL_SUBJECT.to_string(),
            email_body: DEFAULT_EMAIL_BODY.to_string(),
            hover_text: DEFAULT_HOVER_TEXT.to_string(),
        }
    }
}

impl From<&TrustConfig> for SupportDetails {
    fn from(config: &TrustConfig) -> Self {
        Self {
            support_email: config.support_email.clone(),
            request_button_title: config.request_button_title.clone(),
            email_subject: config.email_subject.clone(),
            email_body: config.email_body.clone(),
            hover_text: config.hover_text.clone(),
        }
    }
}
