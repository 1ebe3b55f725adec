//! Asset bundle management.

use serde_json::Value;

use crate::client::Client;
use crate::error::Error;

/// Facade for uploading and removing asset bundles. Stateless.
#[derive(Clone)]
pub struct Assets {
    client: Client,
}

impl Assets {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// `POST /assets`: upload an asset bundle.
    ///
    /// The bundle bytes are sent verbatim. Older clusters answer with plain
    /// text, newer ones with JSON; the response is parsed as JSON when
    /// possible and passed through as a string otherwise.
    pub async fn upload(&self, bundle: Vec<u8>) -> Result<Value, Error> {
        if bundle.is_empty() {
            return Err(Error::validation("asset bundle must not be empty"));
        }
        let text = self.client.post("/assets", bundle).await?.into_text();
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }

    /// `DELETE /assets/{id}`: remove an asset bundle.
    pub async fn delete(&self, asset_id: &str) -> Result<Value, Error> {
        if asset_id.is_empty() {
            return Err(Error::validation("asset delete requires an id"));
        }
        let path = format!("/assets/{asset_id}");
        Ok(self.client.delete(&path, ()).await?.into_value())
    }
}
