//! Supabase-backed persistence for contact messages.
//!
//! All remote access goes through [`SupabaseStore`], a thin client over the
//! PostgREST endpoint that Supabase exposes for the `messages` table. The
//! hosted table is provisioned as:
//!
//! ```sql
//! CREATE TABLE messages (
//!     id UUID DEFAULT gen_random_uuid() PRIMARY KEY,
//!     name VARCHAR(255) NOT NULL,
//!     email VARCHAR(255) NOT NULL,
//!     message TEXT NOT NULL,
//!     timestamp TIMESTAMP WITH TIME ZONE DEFAULT NOW(),
//!     status VARCHAR(50) DEFAULT 'unread'
//! );
//! ```
//!
//! Every operation converts transport and server failures into a
//! [`StoreError`] instead of propagating them; callers see a stable summary
//! string and an appropriate status mapping, nothing else.

pub mod error;

pub use error::StoreError;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use postbox_types::models::ContactMessage;

/// Acknowledgment returned to a visitor after a successful submission.
pub const SUBMIT_ACK: &str =
    "Thank you for your message! I'll get back to you within 24 hours.";

/// Acknowledgment returned after a successful status update.
pub const STATUS_UPDATE_ACK: &str = "Status updated successfully";

const MESSAGES_TABLE: &str = "messages";

const SAVE_FAILED: &str = "Failed to save message";
const RETRIEVE_FAILED: &str = "Failed to retrieve messages";
const UPDATE_FAILED: &str = "Failed to update status";

/// Persistence seam for contact messages. Handlers hold this as a trait
/// object so tests can substitute an in-memory implementation.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Insert one message with `status = "unread"`; returns the server-assigned id.
    async fn create_contact_message(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<Uuid, StoreError>;

    /// Newest-first listing, capped at `limit`. An empty table is a success.
    async fn get_contact_messages(&self, limit: u32) -> Result<Vec<ContactMessage>, StoreError>;

    /// Set the status column of one row. The status value is stored verbatim,
    /// no validation. `StoreError::NotFound` when no row matched.
    async fn update_message_status(&self, message_id: &str, status: &str)
        -> Result<(), StoreError>;

    /// Minimal read probe. Never errors; failures are logged and come back as
    /// `false`.
    async fn test_connection(&self) -> bool;
}

/// Long-lived Supabase client: one `reqwest::Client` constructed at startup
/// and shared by every request.
pub struct SupabaseStore {
    http: reqwest::Client,
    rest_url: String,
    service_key: String,
}

impl SupabaseStore {
    /// `supabase_url` is the project base URL; the client appends the
    /// PostgREST prefix itself.
    pub fn new(supabase_url: &str, service_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            rest_url: format!("{}/rest/v1", supabase_url.trim_end_matches('/')),
            service_key: service_key.to_string(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/{}", self.rest_url, MESSAGES_TABLE)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }
}

/// Non-2xx responses become a `Remote` error carrying the status line and
/// body as log-only detail.
async fn error_for_status(
    resp: Response,
    summary: &'static str,
) -> Result<Response, StoreError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(StoreError::remote(summary, format!("{status}: {body}")))
}

#[async_trait]
impl ContactStore for SupabaseStore {
    async fn create_contact_message(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<Uuid, StoreError> {
        let payload = json!({
            "name": name,
            "email": email,
            "message": message,
            "status": "unread",
        });

        let resp = self
            .request(Method::POST, &self.table_url())
            .header("Prefer", "return=representation")
            .json(&payload)
            .send()
            .await
            .map_err(|e| StoreError::remote(SAVE_FAILED, e.to_string()))?;
        let resp = error_for_status(resp, SAVE_FAILED).await?;

        let rows: Vec<ContactMessage> = resp
            .json()
            .await
            .map_err(|e| StoreError::remote(SAVE_FAILED, e.to_string()))?;

        match rows.first() {
            Some(row) => {
                info!("Contact message created: {}", row.id);
                Ok(row.id)
            }
            None => {
                error!("Insert returned no representation");
                Err(StoreError::remote(SAVE_FAILED, "no data returned"))
            }
        }
    }

    async fn get_contact_messages(&self, limit: u32) -> Result<Vec<ContactMessage>, StoreError> {
        let limit_param = limit.to_string();
        let resp = self
            .request(Method::GET, &self.table_url())
            .query(&[
                ("select", "*"),
                ("order", "timestamp.desc"),
                ("limit", limit_param.as_str()),
            ])
            .send()
            .await
            .map_err(|e| StoreError::remote(RETRIEVE_FAILED, e.to_string()))?;
        let resp = error_for_status(resp, RETRIEVE_FAILED).await?;

        let rows: Vec<ContactMessage> = resp
            .json()
            .await
            .map_err(|e| StoreError::remote(RETRIEVE_FAILED, e.to_string()))?;

        info!("Retrieved {} contact messages", rows.len());
        Ok(rows)
    }

    async fn update_message_status(
        &self,
        message_id: &str,
        status: &str,
    ) -> Result<(), StoreError> {
        let id_filter = format!("eq.{message_id}");
        let resp = self
            .request(Method::PATCH, &self.table_url())
            .query(&[("id", id_filter.as_str())])
            .header("Prefer", "return=representation")
            .json(&json!({ "status": status }))
            .send()
            .await
            .map_err(|e| StoreError::remote(UPDATE_FAILED, e.to_string()))?;
        let resp = error_for_status(resp, UPDATE_FAILED).await?;

        // An empty representation means the filter matched zero rows.
        let rows: Vec<ContactMessage> = resp
            .json()
            .await
            .map_err(|e| StoreError::remote(UPDATE_FAILED, e.to_string()))?;

        if rows.is_empty() {
            return Err(StoreError::NotFound);
        }
        info!("Message {} status updated to {}", message_id, status);
        Ok(())
    }

    async fn test_connection(&self) -> bool {
        let probe = async {
            let resp = self
                .request(Method::GET, &self.table_url())
                .query(&[("select", "id"), ("limit", "1")])
                .send()
                .await?;
            resp.error_for_status()?;
            Ok::<_, reqwest::Error>(())
        };

        match probe.await {
            Ok(()) => {
                info!("Supabase connection successful");
                true
            }
            Err(e) => {
                error!("Supabase connection failed: {}", e);
                false
            }
        }
    }
}
