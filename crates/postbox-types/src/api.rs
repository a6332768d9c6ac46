use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ContactMessage, Project};

// -- Submissions --

/// Visitor-facing submission payload. Shape checks run before the store is
/// ever contacted; a payload that fails `validate` produces a 422 and no row.
/// Unknown keys in the body are ignored, not rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactMessageCreate {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationError(pub &'static str);

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for ValidationError {}

impl ContactMessageCreate {
    /// Name 1-255 chars, syntactically valid email, message 10-5000 chars.
    /// Lengths are counted in Unicode chars, not bytes.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let name_len = self.name.chars().count();
        if name_len < 1 || name_len > 255 {
            return Err(ValidationError("name must be between 1 and 255 characters"));
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError("email is not a valid email address"));
        }
        let message_len = self.message.chars().count();
        if message_len < 10 || message_len > 5000 {
            return Err(ValidationError(
                "message must be between 10 and 5000 characters",
            ));
        }
        Ok(())
    }
}

/// Syntactic email check: one `@`, a sane local part, and a dotted domain of
/// label chars. Deliverability is not our problem.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.chars().count() > 64 || domain.contains('@') {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    let local_ok = local.chars().all(|c| {
        c.is_ascii_alphanumeric() || ".!#$%&'*+/=?^_`{|}~-".contains(c)
    });
    if !local_ok {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactMessageResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
}

// -- Listing --

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactMessagesResponse {
    pub success: bool,
    pub messages: Vec<ContactMessage>,
}

// -- Status updates --

/// Any string is a valid status, empty included. Triage labels are an
/// administrator convention, not an enforced state machine.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusUpdateResponse {
    pub success: bool,
    pub message: String,
}

// -- Health --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub supabase_connected: bool,
    pub service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// -- Projects (reserved) --

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectsResponse {
    pub success: bool,
    pub projects: Vec<Project>,
}
