use mixology_schema::DrinksEnvelope;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::error::MixologyError;
use crate::utils::logging::{body_preview, with_pretty_json_debug};

/// Request building and decoding for TheCocktailDB endpoints.
pub struct CocktailDbApi;

impl CocktailDbApi {
    /// `<base>/<search_path>?s=<query>`, with the query form-encoded.
    pub fn search_url(base: &Url, search_path: &str, query: &str) -> Result<Url, url::ParseError> {
        let mut url = base.join(search_path)?;
        url.query_pairs_mut().append_pair("s", query);
        Ok(url)
    }

    /// `<base>/<list_path>?c=list`, the full catalog listing.
    pub fn list_url(base: &Url, list_path: &str) -> Result<Url, url::ParseError> {
        let mut url = base.join(list_path)?;
        url.query_pairs_mut().append_pair("c", "list");
        Ok(url)
    }

    /// GETs `url` and decodes the drinks envelope into names.
    ///
    /// Transport failures and non-2xx statuses surface as network errors,
    /// malformed bodies as JSON errors. Nothing is retried here.
    pub async fn fetch_names(
        client: &reqwest::Client,
        url: Url,
        timeout: Duration,
    ) -> Result<Vec<String>, MixologyError> {
        let resp = client.get(url.clone()).timeout(timeout).send().await?;

        let status = resp.status();
        if !status.is_success() {
            warn!(%status, url = %url, "[CocktailDB] Upstream returned non-success status");
            return Err(MixologyError::UpstreamStatus(status));
        }

        let bytes = resp.bytes().await?;
        let envelope: DrinksEnvelope = serde_json::from_slice(&bytes).inspect_err(|e| {
            warn!(
                url = %url,
                error = %e,
                body = %body_preview(&bytes),
                "[CocktailDB] Failed to decode response body"
            );
        })?;

        with_pretty_json_debug(&envelope, |pretty_body| {
            debug!(url = %url, body = %pretty_body, "[CocktailDB] Decoded response");
        });

        Ok(envelope.into_names())
    }
}
