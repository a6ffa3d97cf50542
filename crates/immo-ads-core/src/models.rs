//! Core data models.
//!
//! A [`Listing`] is an opaque JSON object from the search endpoint. Only its
//! `id` field carries meaning here; every other field is display data for
//! notifiers and passes through untouched, in its original key order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One search result, stored verbatim as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Listing {
    fields: Map<String, Value>,
}

impl Listing {
    /// The identity used for new-vs-seen comparison.
    pub fn id(&self) -> &Value {
        // Construction guarantees presence.
        &self.fields["id"]
    }

    /// Returns `true` if both listings carry the same `id`.
    pub fn same_id(&self, other: &Listing) -> bool {
        self.id() == other.id()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// All fields, in the order the endpoint returned them.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// Error returned when a JSON object cannot be a [`Listing`].
#[derive(Debug, thiserror::Error)]
#[error("listing has no `id` field")]
pub struct MissingId;

impl TryFrom<Map<String, Value>> for Listing {
    type Error = MissingId;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        if !fields.contains_key("id") {
            return Err(MissingId);
        }
        Ok(Self { fields })
    }
}

impl From<Listing> for Map<String, Value> {
    fn from(listing: Listing) -> Self {
        listing.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_object_without_id() {
        let err = serde_json::from_value::<Listing>(json!({"title": "Loft"})).unwrap_err();
        assert!(err.to_string().contains("no `id` field"));
    }

    #[test]
    fn test_accepts_string_and_integer_ids() {
        let a: Listing = serde_json::from_value(json!({"id": "abc"})).unwrap();
        let b: Listing = serde_json::from_value(json!({"id": 42})).unwrap();
        assert_eq!(a.id(), &json!("abc"));
        assert_eq!(b.id(), &json!(42));
        assert!(!a.same_id(&b));
    }

    #[test]
    fn test_string_id_differs_from_integer_id() {
        let a: Listing = serde_json::from_value(json!({"id": "7"})).unwrap();
        let b: Listing = serde_json::from_value(json!({"id": 7})).unwrap();
        assert!(!a.same_id(&b));
    }

    #[test]
    fn test_field_order_survives_round_trip() {
        let raw = r#"{"zeta":1,"id":5,"alpha":"x"}"#;
        let listing: Listing = serde_json::from_str(raw).unwrap();
        assert_eq!(serde_json::to_string(&listing).unwrap(), raw);
        let keys: Vec<&str> = listing.fields().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "id", "alpha"]);
    }
}
