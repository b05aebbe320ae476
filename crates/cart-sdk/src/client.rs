//! Cart service client.
//!
//! One method per cart operation, each performing at most one request.
//! Arguments are validated before any I/O, so an invalid call never reaches
//! the network, and every non-success response is converted through the
//! error funnel in [`crate::error`].

use std::collections::BTreeMap;

use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde_json::json;
use tracing::{debug, error, instrument};

use crate::config::{CartConfig, ConfigError};
use crate::error::{CartError, CartItemValidationError, CartValidationError, map_api_error};
use crate::types::{Cart, CartItem};
use crate::wire::{decode_entity, decode_list};

/// Header carrying the store (tenant) scope.
const STORE_HEADER: &str = "X-Store-Id";

/// Client for the Lumexa cart service.
///
/// Cheap to clone; clones share the underlying connection pool. The client
/// holds no mutable state - callers needing timeouts or retries configure
/// them on the transport passed to [`Self::with_http_client`].
#[derive(Clone)]
pub struct CartClient {
    client: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
}

impl CartClient {
    /// Create a new cart client with a default transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value.
    pub fn new(config: &CartConfig) -> Result<Self, ConfigError> {
        Self::with_http_client(config, reqwest::Client::new())
    }

    /// Create a cart client on top of a pre-configured transport.
    ///
    /// The caller keeps control of timeouts, proxies, and pooling; the
    /// client attaches its own auth and content headers per request.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value.
    pub fn with_http_client(
        config: &CartConfig,
        client: reqwest::Client,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            client,
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            headers: default_headers(config)?,
        })
    }

    /// Fetch a cart by its ID.
    ///
    /// # Errors
    ///
    /// Fails with the `cart_id` validation error, before any I/O, when
    /// `cart_id <= 0`; remote failures map through the error funnel.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: i64) -> Result<Cart, CartError> {
        if cart_id <= 0 {
            return Err(CartValidationError::InvalidCartId.into());
        }

        let body = self
            .send(Method::GET, &format!("/api/carts/{cart_id}"), None)
            .await?;
        Ok(decode_entity(&body)?)
    }

    /// Look up the cart attached to a guest session.
    ///
    /// Returns `Ok(None)` when the service answers 404, so absence is
    /// distinguishable from a malformed request (any other non-success
    /// status still surfaces as an error).
    ///
    /// # Errors
    ///
    /// Fails with the `guest_id` validation error, before any I/O, when the
    /// identifier is blank.
    #[instrument(skip(self), fields(guest_id = %guest_id))]
    pub async fn get_cart_by_guest_id(&self, guest_id: &str) -> Result<Option<Cart>, CartError> {
        if guest_id.trim().is_empty() {
            return Err(CartValidationError::InvalidGuestId.into());
        }

        let path = format!("/api/carts/guest/{}", urlencoding::encode(guest_id));
        match self.send(Method::GET, &path, None).await {
            Ok(body) => Ok(Some(decode_entity(&body)?)),
            Err(CartError::Api { status: 404, .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Create a new cart for a guest session or a user.
    ///
    /// At least one identifier must be provided; the service associates the
    /// cart with whichever is present.
    ///
    /// # Errors
    ///
    /// Fails before any I/O with the `identifier` error when both
    /// identifiers are absent, the `user_id` error when the user ID is not
    /// positive, or the `session_id` error when the session ID is blank.
    #[instrument(skip(self, session_id), fields(user_id = ?user_id))]
    pub async fn create_cart(
        &self,
        session_id: Option<&str>,
        user_id: Option<i64>,
    ) -> Result<Cart, CartError> {
        if session_id.is_none() && user_id.is_none() {
            return Err(CartValidationError::MissingIdentifier.into());
        }

        if let Some(user_id) = user_id
            && user_id <= 0
        {
            return Err(CartValidationError::InvalidUserId.into());
        }

        if let Some(session_id) = session_id
            && session_id.trim().is_empty()
        {
            return Err(CartValidationError::InvalidSessionId.into());
        }

        let body = json!({
            "session_id": session_id,
            "user_id": user_id,
        });

        let text = self.send(Method::POST, "/api/carts", Some(body)).await?;
        Ok(decode_entity(&text)?)
    }

    /// Add a product variant to a cart.
    ///
    /// # Errors
    ///
    /// Fails before any I/O when the cart ID, variant ID, or quantity is
    /// not positive.
    #[instrument(skip(self, attributes), fields(cart_id = %cart_id, variant_id = %variant_id))]
    pub async fn add_item(
        &self,
        cart_id: i64,
        variant_id: i64,
        quantity: i64,
        attributes: BTreeMap<String, serde_json::Value>,
    ) -> Result<CartItem, CartError> {
        if cart_id <= 0 {
            return Err(CartValidationError::InvalidCartId.into());
        }
        if variant_id <= 0 {
            return Err(CartItemValidationError::InvalidVariantId.into());
        }
        if quantity <= 0 {
            return Err(CartItemValidationError::InvalidQuantity.into());
        }

        let body = json!({
            "product_variant_id": variant_id,
            "quantity": quantity,
            "attributes": attributes,
        });

        let text = self
            .send(Method::POST, &format!("/api/carts/{cart_id}/items"), Some(body))
            .await?;
        Ok(decode_entity(&text)?)
    }

    /// Change the quantity of an item already in a cart.
    ///
    /// # Errors
    ///
    /// Fails before any I/O when the cart ID, item ID, or quantity is not
    /// positive.
    #[instrument(skip(self), fields(cart_id = %cart_id, item_id = %item_id))]
    pub async fn update_item_quantity(
        &self,
        cart_id: i64,
        item_id: i64,
        quantity: i64,
    ) -> Result<CartItem, CartError> {
        if cart_id <= 0 {
            return Err(CartValidationError::InvalidCartId.into());
        }
        if item_id <= 0 {
            return Err(CartItemValidationError::InvalidItemId.into());
        }
        if quantity <= 0 {
            return Err(CartItemValidationError::InvalidQuantity.into());
        }

        let body = json!({ "quantity": quantity });
        let text = self
            .send(
                Method::PUT,
                &format!("/api/carts/{cart_id}/items/{item_id}"),
                Some(body),
            )
            .await?;
        Ok(decode_entity(&text)?)
    }

    /// Remove an item from a cart.
    ///
    /// # Errors
    ///
    /// Fails before any I/O when the cart ID or item ID is not positive.
    #[instrument(skip(self), fields(cart_id = %cart_id, item_id = %item_id))]
    pub async fn remove_item(&self, cart_id: i64, item_id: i64) -> Result<(), CartError> {
        if cart_id <= 0 {
            return Err(CartValidationError::InvalidCartId.into());
        }
        if item_id <= 0 {
            return Err(CartItemValidationError::InvalidItemId.into());
        }

        self.send(
            Method::DELETE,
            &format!("/api/carts/{cart_id}/items/{item_id}"),
            None,
        )
        .await?;
        Ok(())
    }

    /// Remove every item from a cart.
    ///
    /// # Errors
    ///
    /// Fails before any I/O when the cart ID is not positive.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn clear_cart(&self, cart_id: i64) -> Result<(), CartError> {
        if cart_id <= 0 {
            return Err(CartValidationError::InvalidCartId.into());
        }

        self.send(Method::DELETE, &format!("/api/carts/{cart_id}/items"), None)
            .await?;
        Ok(())
    }

    /// Fetch the items of a cart, in server response order.
    ///
    /// An empty cart yields an empty vector, not an error.
    ///
    /// # Errors
    ///
    /// Fails before any I/O when the cart ID is not positive.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_items(&self, cart_id: i64) -> Result<Vec<CartItem>, CartError> {
        if cart_id <= 0 {
            return Err(CartValidationError::InvalidCartId.into());
        }

        let body = self
            .send(Method::GET, &format!("/api/carts/{cart_id}/items"), None)
            .await?;
        Ok(decode_list(&body)?)
    }

    /// Send a request and return the raw success body.
    ///
    /// The single exit to the network: every non-success status is converted
    /// here, so operation methods only decode success bodies.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<String, CartError> {
        let url = format!("{}{path}", self.base_url);

        let mut request = self.client.request(method, url).headers(self.headers.clone());
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!(
                status = %status,
                body = %text.chars().take(200).collect::<String>(),
                "cart service returned non-success status"
            );
            return Err(map_api_error(status.as_u16(), &text));
        }

        debug!(status = %status, "cart service request succeeded");
        Ok(text)
    }
}

/// Build the headers carried on every request.
fn default_headers(config: &CartConfig) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();

    let auth_value = format!("Bearer {}", config.api_key.expose_secret());
    let mut auth = HeaderValue::from_str(&auth_value)
        .map_err(|e| ConfigError::InvalidHeader("Authorization", e.to_string()))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    let store = HeaderValue::from_str(&config.store_id.to_string())
        .map_err(|e| ConfigError::InvalidHeader(STORE_HEADER, e.to_string()))?;
    headers.insert(STORE_HEADER, store);

    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(headers)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lumexa_core::StoreId;

    use super::*;

    fn test_config(base_url: &str) -> CartConfig {
        CartConfig::new(base_url.parse().unwrap(), "test-key".to_string(), StoreId::new(7))
    }

    #[test]
    fn test_default_headers() {
        let headers = default_headers(&test_config("https://cart.example.com")).unwrap();

        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer test-key");
        assert_eq!(headers.get(STORE_HEADER).unwrap(), "7");
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_authorization_header_is_sensitive() {
        let headers = default_headers(&test_config("https://cart.example.com")).unwrap();
        assert!(headers.get(AUTHORIZATION).unwrap().is_sensitive());
    }

    #[test]
    fn test_rejects_control_characters_in_api_key() {
        let config = CartConfig::new(
            "https://cart.example.com".parse().unwrap(),
            "bad\nkey".to_string(),
            StoreId::new(1),
        );
        assert!(matches!(
            CartClient::new(&config),
            Err(ConfigError::InvalidHeader("Authorization", _))
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = CartClient::new(&test_config("https://cart.example.com/")).unwrap();
        assert_eq!(client.base_url, "https://cart.example.com");
    }
}
