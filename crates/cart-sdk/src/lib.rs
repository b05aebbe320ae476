//! Lumexa Cart SDK - typed client for the Lumexa shopping-cart service.
//!
//! # Architecture
//!
//! - One `reqwest` client per [`CartClient`], reused across sequential calls
//! - The cart service is the source of truth - decoded resources are never
//!   mutated locally; every state change is observed by re-fetching
//! - Arguments are validated before any I/O, so an invalid call never
//!   reaches the network
//! - Every remote failure funnels through a single error-mapping routine
//!   into the [`error::CartError`] taxonomy
//!
//! # Example
//!
//! ```rust,ignore
//! use lumexa_cart_sdk::{CartClient, CartConfig};
//!
//! let config = CartConfig::from_env()?;
//! let client = CartClient::new(&config)?;
//!
//! // Create a guest cart and add an item
//! let cart = client.create_cart(Some("sess-81c3"), None).await?;
//! let item = client
//!     .add_item(cart.id.as_i64(), 42, 2, Default::default())
//!     .await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod config;
pub mod error;
pub mod types;

mod wire;

pub use client::CartClient;
pub use config::{CartConfig, ConfigError};
pub use error::{CartError, CartItemValidationError, CartValidationError, ValidationError};
pub use lumexa_core::{CartId, CartItemId, StoreId, UserId, VariantId};
pub use types::{Cart, CartItem, ProductVariant};
