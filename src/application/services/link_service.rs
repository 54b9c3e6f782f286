//! Short link minting and HTML link rewriting.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::ShortLink;
use crate::error::AppError;
use crate::infrastructure::registry::UrlRegistry;
use crate::utils::code_generator::generate_code;
use crate::utils::html_rewriter::rewrite_anchor_hrefs;
use serde_json::json;
use tracing::info;
use url::Url;

/// Maximum attempts to mint an unused id before giving up.
const MAX_MINT_ATTEMPTS: usize = 10;

/// Registers short links and builds their public URLs.
pub struct LinkService {
    registry: Arc<UrlRegistry>,
    base_url: Url,
}

impl LinkService {
    /// Creates a link service publishing short links under `base_url`.
    pub fn new(registry: Arc<UrlRegistry>, base_url: Url) -> Self {
        Self { registry, base_url }
    }

    /// Mints a fresh id for `url` and registers it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if no unused id was found after
    /// several attempts.
    pub fn create_short_link(&self, url: &str) -> Result<ShortLink, AppError> {
        for _ in 0..MAX_MINT_ATTEMPTS {
            let id = generate_code();
            if self.registry.insert_new(&id, url) {
                return Ok(ShortLink::new(id, url));
            }
        }

        Err(AppError::internal(
            "Failed to generate unique short id",
            json!({ "attempts": MAX_MINT_ATTEMPTS }),
        ))
    }

    /// Public URL serving `short_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the id cannot be joined onto the base URL.
    pub fn public_url(&self, short_id: &str) -> Result<Url, AppError> {
        self.base_url.join(short_id).map_err(|e| {
            AppError::internal(
                "Failed to build short URL",
                json!({ "reason": e.to_string() }),
            )
        })
    }

    /// Rewrites every anchor of `html` to point at a short link.
    ///
    /// Each distinct original URL is registered exactly once per document,
    /// and all registrations happen before the rewritten document is returned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if minting or URL building fails.
    pub fn rewrite_html(&self, html: &str) -> Result<String, AppError> {
        let mut minted: HashMap<String, String> = HashMap::new();
        let mut failure = None;

        let rewritten = rewrite_anchor_hrefs(html, |original| {
            if let Some(short_url) = minted.get(original) {
                return short_url.clone();
            }

            let short_url = self
                .create_short_link(original)
                .and_then(|link| self.public_url(&link.id));

            match short_url {
                Ok(short_url) => {
                    let short_url = short_url.to_string();
                    minted.insert(original.to_string(), short_url.clone());
                    short_url
                }
                Err(e) => {
                    failure.get_or_insert(e);
                    original.to_string()
                }
            }
        })
        .map_err(|e| {
            AppError::internal(
                "Failed to rewrite HTML",
                json!({ "reason": e.to_string() }),
            )
        })?;

        if let Some(e) = failure {
            return Err(e);
        }

        info!("Rewrote HTML with {} short links", minted.len());
        Ok(rewritten)
    }
}
