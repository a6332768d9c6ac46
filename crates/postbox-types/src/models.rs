use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -- Contact messages --

/// One row of the `messages` table as the store returns it.
///
/// `id` and `timestamp` are assigned server-side at insert and never change;
/// `status` starts as "unread" and is a free-form triage label after that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "unread".to_string()
}

// -- Projects --

/// Catalog entity reserved for the portfolio section. No route serves it yet;
/// it is part of the data-model surface only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default = "default_project_status")]
    pub status: String,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectCreate {
    pub title: String,
    pub subtitle: Option<String>,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default = "default_project_status")]
    pub status: String,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub display_order: i32,
}

fn default_project_status() -> String {
    "In Development".to_string()
}
