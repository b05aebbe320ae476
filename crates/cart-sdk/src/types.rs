//! Cart resource DTOs.
//!
//! Canonical shapes for the cart service's wire resources. Deployments
//! disagree on field casing (`guestId` vs `guest_id`) and on the key used
//! for embedded variants (`variant` vs `product_variant`); every observed
//! spelling is accepted on input via serde aliases and normalized to the
//! snake_case canonical form on output. Timestamps are carried as opaque
//! strings - the client never parses them.

use std::collections::BTreeMap;

use lumexa_core::{CartId, CartItemId, StoreId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A server-side cart scoped to a store, owned by a guest session or a user.
///
/// Immutable once decoded: the client never mutates a cart locally. Every
/// state change is obtained by re-fetching or re-requesting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    /// Server-assigned identifier.
    pub id: CartId,

    /// Tenant scope. Some deployments omit it from the body since the
    /// `X-Store-Id` request header already pins it; it then defaults to 0.
    #[serde(default, alias = "storeId")]
    pub store_id: StoreId,

    /// Guest identity the cart is attached to, when anonymous.
    #[serde(default, alias = "sessionId", alias = "guest_id", alias = "guestId")]
    pub session_id: Option<String>,

    /// Authenticated owner, when known.
    #[serde(default, alias = "userId")]
    pub user_id: Option<UserId>,

    /// Lifecycle state (e.g. "active", "completed"), passed through verbatim.
    pub status: String,

    /// Number of items, as counted by the service.
    #[serde(default, alias = "totalItems")]
    pub total_items: i64,

    /// Server-computed total, non-negative.
    #[serde(default, alias = "total", alias = "totalPrice")]
    pub total_price: Decimal,

    /// Line items in server response order.
    #[serde(default)]
    pub items: Vec<CartItem>,

    /// Creation timestamp, opaque ISO-8601 string.
    #[serde(alias = "createdAt")]
    pub created_at: String,

    /// Last-update timestamp, opaque ISO-8601 string.
    #[serde(alias = "updatedAt")]
    pub updated_at: String,
}

/// One line entry in a cart: a product variant, a quantity, and pricing
/// computed by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Server-assigned identifier.
    pub id: CartItemId,

    /// Owning cart (back-reference, not ownership).
    #[serde(alias = "cartId")]
    pub cart_id: CartId,

    /// Positive item count.
    pub quantity: i64,

    /// Price per unit.
    #[serde(alias = "unitPrice")]
    pub unit_price: Decimal,

    /// Server-computed line total.
    #[serde(alias = "totalPrice")]
    pub total_price: Decimal,

    /// Buyer choices (size, color, ...), passed through verbatim.
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,

    /// Embedded variant snapshot, present when the service expands it.
    #[serde(default, alias = "productVariant", alias = "variant")]
    pub product_variant: Option<ProductVariant>,

    /// Creation timestamp, opaque ISO-8601 string.
    #[serde(alias = "createdAt")]
    pub created_at: String,

    /// Last-update timestamp, opaque ISO-8601 string.
    #[serde(alias = "updatedAt")]
    pub updated_at: String,
}

/// Embedded product variant, shape defined by the deployment.
///
/// The SDK guarantees only that it round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductVariant(serde_json::Value);

impl ProductVariant {
    /// Wrap a raw JSON value.
    #[must_use]
    pub const fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Borrow the raw JSON carried by this variant.
    #[must_use]
    pub const fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Consume the wrapper and return the raw JSON.
    #[must_use]
    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_item() -> CartItem {
        CartItem {
            id: CartItemId::new(11),
            cart_id: CartId::new(5),
            quantity: 2,
            unit_price: "19.99".parse().unwrap(),
            total_price: "39.98".parse().unwrap(),
            attributes: BTreeMap::from([
                ("color".to_string(), json!("navy")),
                ("size".to_string(), json!("M")),
            ]),
            product_variant: Some(ProductVariant::new(json!({
                "id": 42,
                "sku": "TEE-NVY-M",
            }))),
            created_at: "2025-03-01T10:00:00Z".to_string(),
            updated_at: "2025-03-01T10:05:00Z".to_string(),
        }
    }

    fn sample_cart() -> Cart {
        Cart {
            id: CartId::new(5),
            store_id: StoreId::new(3),
            session_id: Some("sess-81c3".to_string()),
            user_id: None,
            status: "active".to_string(),
            total_items: 2,
            total_price: "39.98".parse().unwrap(),
            items: vec![sample_item()],
            created_at: "2025-03-01T10:00:00Z".to_string(),
            updated_at: "2025-03-01T10:05:00Z".to_string(),
        }
    }

    #[test]
    fn test_cart_roundtrip() {
        let cart = sample_cart();
        let value = serde_json::to_value(&cart).unwrap();
        let parsed: Cart = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, cart);
    }

    #[test]
    fn test_cart_item_roundtrip() {
        let item = sample_item();
        let value = serde_json::to_value(&item).unwrap();
        let parsed: CartItem = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, item);
    }

    #[test]
    fn test_cart_decodes_camel_case_deployment() {
        let body = json!({
            "id": 5,
            "storeId": 3,
            "guestId": "sess-81c3",
            "status": "active",
            "totalItems": 0,
            "totalPrice": "0",
            "items": [],
            "createdAt": "2025-03-01T10:00:00Z",
            "updatedAt": "2025-03-01T10:05:00Z",
        });

        let cart: Cart = serde_json::from_value(body).unwrap();
        assert_eq!(cart.store_id, StoreId::new(3));
        assert_eq!(cart.session_id.as_deref(), Some("sess-81c3"));
        assert!(cart.items.is_empty());
    }

    #[test]
    fn test_cart_defaults_omitted_fields() {
        // Minimal body from a deployment that omits store_id, totals, items.
        let body = json!({
            "id": 9,
            "status": "active",
            "created_at": "2025-03-01T10:00:00Z",
            "updated_at": "2025-03-01T10:00:00Z",
        });

        let cart: Cart = serde_json::from_value(body).unwrap();
        assert_eq!(cart.store_id, StoreId::default());
        assert_eq!(cart.session_id, None);
        assert_eq!(cart.user_id, None);
        assert_eq!(cart.total_items, 0);
        assert_eq!(cart.total_price, Decimal::ZERO);
        assert!(cart.items.is_empty());
    }

    #[test]
    fn test_item_accepts_variant_alias() {
        let body = json!({
            "id": 11,
            "cart_id": 5,
            "quantity": 1,
            "unit_price": "10",
            "total_price": "10",
            "variant": {"sku": "TEE-NVY-M"},
            "created_at": "2025-03-01T10:00:00Z",
            "updated_at": "2025-03-01T10:00:00Z",
        });

        let item: CartItem = serde_json::from_value(body).unwrap();
        let variant = item.product_variant.unwrap();
        assert_eq!(variant.as_value(), &json!({"sku": "TEE-NVY-M"}));
    }

    #[test]
    fn test_variant_roundtrips_arbitrary_shape() {
        let raw = json!({
            "id": 42,
            "options": [{"name": "size", "value": "M"}],
            "nested": {"deep": [1, 2, 3]},
        });
        let variant = ProductVariant::new(raw.clone());
        let encoded = serde_json::to_value(&variant).unwrap();
        assert_eq!(encoded, raw);

        let decoded: ProductVariant = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded.into_value(), raw);
    }

    #[test]
    fn test_total_alias_maps_to_total_price() {
        let body = json!({
            "id": 9,
            "status": "active",
            "total": "12.50",
            "created_at": "2025-03-01T10:00:00Z",
            "updated_at": "2025-03-01T10:00:00Z",
        });

        let cart: Cart = serde_json::from_value(body).unwrap();
        assert_eq!(cart.total_price, "12.50".parse::<Decimal>().unwrap());
    }
}
