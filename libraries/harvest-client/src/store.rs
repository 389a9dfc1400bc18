//! Document operations against the backend store.

use crate::error::{ClientError, Result};
use crate::types::{api_error_message, QueryRequest, QueryResponse, WriteRequest};
use harvest_core::{Document, FieldFilter};
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::debug;

/// Document client for the backend store.
pub struct StoreClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    id_token: &'a str,
}

impl<'a> StoreClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, id_token: &'a str) -> Self {
        Self {
            http,
            base_url,
            id_token,
        }
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!(
            "{}/v1/documents/{}/{}",
            self.base_url,
            urlencoding::encode(collection),
            urlencoding::encode(id)
        )
    }

    /// Get a single document. `None` when it does not exist.
    pub async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let url = self.document_url(collection, id);
        debug!(url = %url, "Fetching document");

        let response = self
            .http
            .get(&url)
            .bearer_auth(self.id_token)
            .send()
            .await
            .map_err(ClientError::transport)?;

        let status = response.status();

        if status.is_success() {
            let doc: Document = response.json().await.map_err(|e| {
                ClientError::ParseError(format!("Failed to parse document: {}", e))
            })?;

            Ok(Some(doc))
        } else if status.as_u16() == 404 {
            debug!(collection = %collection, id = %id, "Document does not exist");
            Ok(None)
        } else if status.as_u16() == 401 {
            Err(ClientError::AuthRequired)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ClientError::ServerError {
                status: status.as_u16(),
                message: api_error_message(&error_text),
            })
        }
    }

    /// Create or replace a document.
    pub async fn set_document(
        &self,
        collection: &str,
        id: &str,
        fields: &Map<String, Value>,
    ) -> Result<()> {
        let url = self.document_url(collection, id);
        debug!(url = %url, fields = fields.len(), "Writing document");

        let response = self
            .http
            .patch(&url)
            .bearer_auth(self.id_token)
            .json(&WriteRequest { fields })
            .send()
            .await
            .map_err(ClientError::transport)?;

        let status = response.status();

        if status.is_success() {
            debug!(collection = %collection, id = %id, "Document written");
            Ok(())
        } else if status.as_u16() == 401 {
            Err(ClientError::AuthRequired)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ClientError::ServerError {
                status: status.as_u16(),
                message: api_error_message(&error_text),
            })
        }
    }

    /// Fetch every document in a collection matching all filters.
    pub async fn run_query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> Result<Vec<Document>> {
        let url = format!("{}/v1/documents:runQuery", self.base_url);
        debug!(url = %url, collection = %collection, filters = filters.len(), "Running query");

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.id_token)
            .json(&QueryRequest {
                collection,
                filters,
            })
            .send()
            .await
            .map_err(ClientError::transport)?;

        let status = response.status();

        if status.is_success() {
            let result: QueryResponse = response.json().await.map_err(|e| {
                ClientError::ParseError(format!("Failed to parse query response: {}", e))
            })?;

            debug!(documents = result.documents.len(), "Query complete");
            Ok(result.documents)
        } else if status.as_u16() == 401 {
            Err(ClientError::AuthRequired)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ClientError::ServerError {
                status: status.as_u16(),
                message: api_error_message(&error_text),
            })
        }
    }
}

// URL encoding helper
pub(crate) mod urlencoding {
    pub fn encode(s: &str) -> String {
        url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
    }
}
