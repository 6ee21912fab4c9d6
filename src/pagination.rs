//! Read-only page container and envelope extraction.
//!
//! The API wraps list responses in a HAL-style envelope: items under
//! `_embedded.items`, navigation URLs under `_links`, and a `current_page`
//! number. [`PaginatedResponse`] correlates one page of hydrated items with
//! that metadata. The navigation flags only inform the caller; fetching the
//! next page means issuing a new request with an incremented `page`.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::Error;

/// One page of results plus its navigation metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub has_next: bool,
    pub has_previous: bool,
    pub has_first: bool,
    pub has_last: bool,
    /// Relation name (`next`, `previous`, ...) to URL.
    pub links: IndexMap<String, String>,
}

impl<T> PaginatedResponse<T> {
    /// Build a page from items and a link map; the four navigation flags
    /// derive from which relations the server included.
    #[must_use]
    pub fn new(items: Vec<T>, current_page: u32, links: IndexMap<String, String>) -> Self {
        Self {
            has_next: links.contains_key("next"),
            has_previous: links.contains_key("previous"),
            has_first: links.contains_key("first"),
            has_last: links.contains_key("last"),
            items,
            current_page,
            links,
        }
    }

    /// Restartable traversal over the page's items.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// URL of the given link relation, if the server sent one.
    #[must_use]
    pub fn link(&self, relation: &str) -> Option<&str> {
        self.links.get(relation).map(String::as_str)
    }
}

impl<T: DeserializeOwned> PaginatedResponse<T> {
    /// Hydrate a page from the raw response envelope.
    ///
    /// # Errors
    /// [`Error::UnexpectedResponse`] when `_embedded.items` is missing, and
    /// [`Error::Decode`] when an item does not deserialize into `T`.
    pub fn from_envelope(envelope: Value) -> Result<Self, Error> {
        let current_page = envelope
            .get("current_page")
            .and_then(Value::as_u64)
            .and_then(|page| u32::try_from(page).ok())
            .unwrap_or(1);
        let links = extract_links(&envelope);

        let raw_items = envelope
            .pointer("/_embedded/items")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::UnexpectedResponse {
                message: "list response has no `_embedded.items`".to_string(),
            })?;
        let items = raw_items
            .iter()
            .cloned()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()?;

        Ok(Self::new(items, current_page, links))
    }
}

fn extract_links(envelope: &Value) -> IndexMap<String, String> {
    envelope
        .get("_links")
        .and_then(Value::as_object)
        .map(|links| {
            links
                .iter()
                .filter_map(|(relation, link)| {
                    link.get("href")
                        .and_then(Value::as_str)
                        .map(|href| (relation.clone(), href.to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}

impl<T> IntoIterator for PaginatedResponse<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a PaginatedResponse<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope() -> Value {
        json!({
            "current_page": 3,
            "_links": {
                "self": {"href": "https://pim.example.com/api/rest/v1/products-uuid?page=3"},
                "first": {"href": "https://pim.example.com/api/rest/v1/products-uuid?page=1"},
                "previous": {"href": "https://pim.example.com/api/rest/v1/products-uuid?page=2"},
                "next": {"href": "https://pim.example.com/api/rest/v1/products-uuid?page=4"}
            },
            "_embedded": {
                "items": [{"name": "a"}, {"name": "b"}]
            }
        })
    }

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Named {
        name: String,
    }

    #[test]
    fn flags_derive_from_link_presence() {
        let page: PaginatedResponse<Named> = PaginatedResponse::from_envelope(envelope()).unwrap();
        assert_eq!(page.current_page, 3);
        assert!(page.has_next);
        assert!(page.has_previous);
        assert!(page.has_first);
        assert!(!page.has_last, "no `last` link was sent");
        assert_eq!(
            page.link("next"),
            Some("https://pim.example.com/api/rest/v1/products-uuid?page=4")
        );
    }

    #[test]
    fn iteration_is_restartable() {
        let page: PaginatedResponse<Named> = PaginatedResponse::from_envelope(envelope()).unwrap();
        let first: Vec<_> = page.iter().map(|n| n.name.as_str()).collect();
        let second: Vec<_> = page.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(first, vec!["a", "b"]);
        assert_eq!(first, second);
    }

    #[test]
    fn missing_embedded_items_is_an_error() {
        let result = PaginatedResponse::<Named>::from_envelope(json!({"current_page": 1}));
        assert!(matches!(result, Err(Error::UnexpectedResponse { .. })));
    }

    #[test]
    fn missing_page_number_defaults_to_one() {
        let page: PaginatedResponse<Value> =
            PaginatedResponse::from_envelope(json!({"_embedded": {"items": []}})).unwrap();
        assert_eq!(page.current_page, 1);
        assert!(page.is_empty());
    }
}
