//! Cursor pagination envelopes.
//!
//! Paged endpoints have answered with several shapes over time, so the
//! parser accepts all of them:
//!
//! - a bare array (no cursor);
//! - an object with `<items_key>` or `items`;
//! - an object whose `data` is an array, or an object holding
//!   `<items_key>`/`items` and optionally its own `nextCursor`.
//!
//! The cursor is read from `nextCursor`, `cursor`, `pagination.nextCursor`
//! or `pagination.cursor`, first non-empty string wins.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::with_query;
use crate::client::Payload;
use crate::error::ClientError;

pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// One page of items and the cursor for the next page, if there is one.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

/// Filters for a paged list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams<'a> {
    pub period_id: Option<&'a str>,
    pub cursor: Option<&'a str>,
    pub page_size: u32,
}

impl Default for PageParams<'_> {
    fn default() -> Self {
        Self {
            period_id: None,
            cursor: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageParams<'_> {
    /// `path` with `period_id`, `page_size` and `cursor` appended.
    pub fn apply(&self, path: &str) -> String {
        let page_size = self.page_size.to_string();
        with_query(
            path,
            &[
                ("period_id", self.period_id),
                ("page_size", Some(page_size.as_str())),
                ("cursor", self.cursor),
            ],
        )
    }
}

/// Parse an already camelCased page envelope.
pub fn parse_page<T: DeserializeOwned>(response: Value, items_key: &str) -> Result<Page<T>, ClientError> {
    let (items, next_cursor) = match response {
        Value::Array(items) => (items, None),
        Value::Object(mut payload) => {
            let cursor = top_level_cursor(&payload);
            if let Some(items) = take_items(&mut payload, items_key) {
                (items, cursor)
            } else {
                match payload.remove("data") {
                    Some(Value::Array(items)) => (items, cursor),
                    Some(Value::Object(mut data)) => match take_items(&mut data, items_key) {
                        Some(items) => (items, non_empty(data.get("nextCursor")).or(cursor)),
                        None => (Vec::new(), cursor),
                    },
                    _ => (Vec::new(), cursor),
                }
            }
        }
        _ => (Vec::new(), None),
    };

    Ok(Page {
        items: Payload::Json(Value::Array(items)).into_typed()?,
        next_cursor,
    })
}

fn top_level_cursor(payload: &Map<String, Value>) -> Option<String> {
    let pagination = payload.get("pagination").and_then(Value::as_object);
    non_empty(payload.get("nextCursor"))
        .or_else(|| non_empty(payload.get("cursor")))
        .or_else(|| non_empty(pagination.and_then(|p| p.get("nextCursor"))))
        .or_else(|| non_empty(pagination.and_then(|p| p.get("cursor"))))
}

fn take_items(map: &mut Map<String, Value>, items_key: &str) -> Option<Vec<Value>> {
    [items_key, "items"].into_iter().find_map(|key| {
        if !map.get(key).is_some_and(Value::is_array) {
            return None;
        }
        match map.remove(key) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        }
    })
}

fn non_empty(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::bare_array(json!([1, 2]), vec![1, 2], None)]
    #[case::named_items(json!({ "transactions": [1], "nextCursor": "c1" }), vec![1], Some("c1"))]
    #[case::generic_items(json!({ "items": [1, 2, 3], "cursor": "c2" }), vec![1, 2, 3], Some("c2"))]
    #[case::pagination_block(json!({ "data": [4], "pagination": { "nextCursor": "c3" } }), vec![4], Some("c3"))]
    #[case::pagination_cursor(json!({ "data": [4], "pagination": { "cursor": "c4" } }), vec![4], Some("c4"))]
    #[case::nested_data(json!({ "data": { "transactions": [5], "nextCursor": "c5" } }), vec![5], Some("c5"))]
    #[case::nested_data_outer_cursor(json!({ "data": { "items": [6] }, "cursor": "c6" }), vec![6], Some("c6"))]
    #[case::empty_cursor_ignored(json!({ "items": [7], "nextCursor": "", "cursor": "c7" }), vec![7], Some("c7"))]
    #[case::no_items(json!({ "nextCursor": "c8" }), vec![], Some("c8"))]
    #[case::not_an_object(json!("oops"), vec![], None)]
    #[case::null(Value::Null, vec![], None)]
    fn parses_page_shapes(#[case] response: Value, #[case] items: Vec<u32>, #[case] cursor: Option<&str>) {
        let page: Page<u32> = parse_page(response, "transactions").unwrap();
        assert_eq!(page.items, items);
        assert_eq!(page.next_cursor.as_deref(), cursor);
    }

    #[test]
    fn named_key_wins_over_items() {
        let page: Page<u32> = parse_page(json!({ "categories": [1], "items": [2] }), "categories").unwrap();
        assert_eq!(page.items, vec![1]);
    }

    #[test]
    fn non_array_items_fall_through_to_data() {
        let page: Page<u32> = parse_page(json!({ "items": "x", "data": [9] }), "categories").unwrap();
        assert_eq!(page.items, vec![9]);
    }

    #[test]
    fn undecodable_items_are_an_error() {
        let result: Result<Page<u32>, _> = parse_page(json!(["a"]), "items");
        assert!(matches!(result, Err(ClientError::Deserialization(_))));
    }

    #[test]
    fn params_build_query() {
        assert_eq!(PageParams::default().apply("/api/transactions"), "/api/transactions?page_size=50");
        let params = PageParams {
            period_id: Some("period-1"),
            cursor: Some("abc"),
            page_size: 25,
        };
        assert_eq!(
            params.apply("/api/categories"),
            "/api/categories?period_id=period-1&page_size=25&cursor=abc"
        );
    }
}
