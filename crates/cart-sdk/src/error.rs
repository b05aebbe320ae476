//! Error taxonomy for the cart SDK.
//!
//! Local validation failures are raised before any request is sent and carry
//! the name of the offending field. Every remote failure is converted through
//! [`map_api_error`], the single funnel shared by all client operations - no
//! call site does its own translation.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

/// Message used when a 422 body omits its own.
const VALIDATION_FAILED: &str = "The given data was invalid.";

/// Errors that can occur when interacting with the cart service.
#[derive(Debug, Error)]
pub enum CartError {
    /// A cart-level argument failed local validation. No request was sent.
    #[error(transparent)]
    InvalidCart(#[from] CartValidationError),

    /// An item-level argument failed local validation. No request was sent.
    #[error(transparent)]
    InvalidItem(#[from] CartItemValidationError),

    /// The service rejected the request with a structured 422 body.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The service answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the response body, or the raw body when none.
        message: String,
    },

    /// The request never produced a response (connection refused, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A success response body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CartError {
    /// Numeric status code carried by this error, when one applies.
    ///
    /// Validation-shaped errors report 422 whether they were raised locally
    /// or by the service; transport failures report the response status only
    /// if a response was received at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidCart(_) | Self::InvalidItem(_) => Some(422),
            Self::Validation(err) => Some(err.status),
            Self::Api { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            Self::Parse(_) => None,
        }
    }

    /// Field → messages map for the validation-shaped variants.
    ///
    /// `None` for transport, API, and parse failures. Callers branch on this
    /// to separate "bad input, don't retry" from "service failure, maybe
    /// retry".
    #[must_use]
    pub fn validation_errors(&self) -> Option<BTreeMap<String, Vec<String>>> {
        match self {
            Self::InvalidCart(err) => Some(err.errors()),
            Self::InvalidItem(err) => Some(err.errors()),
            Self::Validation(err) => Some(err.errors.clone()),
            Self::Api { .. } | Self::Http(_) | Self::Parse(_) => None,
        }
    }
}

/// A structured validation failure returned by the service.
///
/// Raised for HTTP 422 responses whose body carries a field → messages map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Status the service answered with (normally 422).
    pub status: u16,
    /// Top-level message from the body, or a generic default.
    pub message: String,
    /// Field name → human-readable messages, in server order per field.
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    /// First message of the first field, falling back to the top-level
    /// message when the map is empty.
    #[must_use]
    pub fn first_error(&self) -> &str {
        self.errors
            .values()
            .next()
            .and_then(|messages| messages.first())
            .map_or(self.message.as_str(), String::as_str)
    }
}

/// Cart-level argument errors, raised before any network I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartValidationError {
    /// The cart ID was zero or negative.
    #[error("The cart ID must be a positive integer.")]
    InvalidCartId,

    /// The user ID was provided but zero or negative.
    #[error("The user ID must be a positive integer.")]
    InvalidUserId,

    /// The session ID was provided but blank.
    #[error("The session ID must be a non-empty string.")]
    InvalidSessionId,

    /// The guest ID was blank.
    #[error("The guest ID must be a non-empty string.")]
    InvalidGuestId,

    /// Neither a user ID nor a session ID was provided.
    #[error("Either user_id or session_id must be provided.")]
    MissingIdentifier,
}

impl CartValidationError {
    /// Wire name of the offending field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidCartId => "cart_id",
            Self::InvalidUserId => "user_id",
            Self::InvalidSessionId => "session_id",
            Self::InvalidGuestId => "guest_id",
            Self::MissingIdentifier => "identifier",
        }
    }

    /// Field → messages view matching the remote validation shape.
    #[must_use]
    pub fn errors(&self) -> BTreeMap<String, Vec<String>> {
        BTreeMap::from([(self.field().to_string(), vec![self.to_string()])])
    }
}

/// Item-level argument errors, raised before any network I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartItemValidationError {
    /// The item ID was zero or negative.
    #[error("The item ID must be a positive integer.")]
    InvalidItemId,

    /// The product variant ID was zero or negative.
    #[error("The product variant ID must be a positive integer.")]
    InvalidVariantId,

    /// The quantity was zero or negative.
    #[error("The quantity must be a positive integer.")]
    InvalidQuantity,

    /// The requested quantity is not available in stock.
    #[error("The requested quantity is not available in stock.")]
    OutOfStock,

    /// The maximum quantity per item has been exceeded.
    #[error("The maximum quantity per item has been exceeded.")]
    MaxQuantityExceeded,
}

impl CartItemValidationError {
    /// Wire name of the offending field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidItemId => "item_id",
            Self::InvalidVariantId => "variant_id",
            Self::InvalidQuantity | Self::MaxQuantityExceeded => "quantity",
            Self::OutOfStock => "stock",
        }
    }

    /// Field → messages view matching the remote validation shape.
    #[must_use]
    pub fn errors(&self) -> BTreeMap<String, Vec<String>> {
        BTreeMap::from([(self.field().to_string(), vec![self.to_string()])])
    }
}

/// Body shape probed on non-success responses.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    errors: Option<BTreeMap<String, Vec<String>>>,
}

/// Convert a non-success response into the taxonomy.
///
/// A 422 whose body carries a non-empty field → messages map becomes
/// [`ValidationError`]; any body with a `message` keeps its status as
/// [`CartError::Api`]; everything else surfaces the raw status and a
/// truncated copy of the body.
pub(crate) fn map_api_error(status: u16, body: &str) -> CartError {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if status == 422
            && let Some(errors) = parsed.errors.filter(|errors| !errors.is_empty())
        {
            return CartError::Validation(ValidationError {
                status,
                message: parsed
                    .message
                    .unwrap_or_else(|| VALIDATION_FAILED.to_string()),
                errors,
            });
        }

        if let Some(message) = parsed.message {
            return CartError::Api { status, message };
        }
    }

    CartError::Api {
        status,
        message: body.chars().take(200).collect(),
    }
}
