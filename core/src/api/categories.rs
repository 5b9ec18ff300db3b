use serde_json::Value;

use super::pagination::{parse_page, PageParams};
use super::with_query;
use crate::client::{ApiClient, NO_BODY};
use crate::error::ClientError;
use crate::transport::Transport;
use crate::types::{CategoriesPage, Category, CategoryRequest, CategoryWithStats};

const CATEGORIES_PATH: &str = "/api/categories";
const UNBUDGETED_PATH: &str = "/api/categories/not-in-budget";

/// Categories with their statistics for `period_id` (all periods when `None`).
pub fn fetch_categories<T: Transport>(
    client: &ApiClient<T>,
    period_id: Option<&str>,
) -> Result<Vec<CategoryWithStats>, ClientError> {
    client.get(&with_query(CATEGORIES_PATH, &[("period_id", period_id)]))
}

/// Categories that have no budget line yet.
pub fn fetch_unbudgeted_categories<T: Transport>(client: &ApiClient<T>) -> Result<Vec<Category>, ClientError> {
    client.get(UNBUDGETED_PATH)
}

pub fn fetch_category<T: Transport>(client: &ApiClient<T>, id: &str) -> Result<Category, ClientError> {
    client.get(&format!("{CATEGORIES_PATH}/{id}"))
}

pub fn fetch_categories_page<T: Transport>(
    client: &ApiClient<T>,
    params: &PageParams<'_>,
) -> Result<CategoriesPage, ClientError> {
    let response: Value = client.get_raw(&params.apply(CATEGORIES_PATH))?;
    let page = parse_page(response, "categories")?;
    Ok(CategoriesPage {
        categories: page.items,
        next_cursor: page.next_cursor,
    })
}

pub fn create_category<T: Transport>(client: &ApiClient<T>, request: &CategoryRequest) -> Result<Category, ClientError> {
    client.post(CATEGORIES_PATH, Some(request))?.into_typed()
}

pub fn update_category<T: Transport>(
    client: &ApiClient<T>,
    id: &str,
    request: &CategoryRequest,
) -> Result<Category, ClientError> {
    client.put(&format!("{CATEGORIES_PATH}/{id}"), Some(request))?.into_typed()
}

pub fn delete_category<T: Transport>(client: &ApiClient<T>, id: &str) -> Result<(), ClientError> {
    client.delete(&format!("{CATEGORIES_PATH}/{id}"), NO_BODY).map(drop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::http::HttpResponse;
    use crate::testing::StubTransport;
    use crate::types::CategoryType;
    use serde_json::json;

    fn client() -> ApiClient<StubTransport> {
        ApiClient::new(ApiConfig::default(), StubTransport::new())
    }

    fn wire_category(id: &str) -> Value {
        json!({
            "id": id,
            "name": "Groceries",
            "color": "#2f9e44",
            "icon": "cart",
            "parent_id": null,
            "category_type": "Outgoing",
            "budgeted_value": 30000,
            "actual_value": 12000
        })
    }

    #[test]
    fn period_filter_is_optional() {
        let client = client();
        client.transport().push(HttpResponse::json(200, "[]"));
        client.transport().push(HttpResponse::json(200, "[]"));

        fetch_categories(&client, None).unwrap();
        fetch_categories(&client, Some("period-1")).unwrap();

        let urls: Vec<String> = client.transport().requests().into_iter().map(|r| r.url).collect();
        assert_eq!(urls, vec!["/api/v1/categories", "/api/v1/categories?period_id=period-1"]);
    }

    #[test]
    fn stats_survive_decoding() {
        let client = client();
        client
            .transport()
            .push(HttpResponse::json(200, json!([wire_category("c1")]).to_string()));

        let categories = fetch_categories(&client, None).unwrap();

        assert_eq!(categories[0].category.category_type, CategoryType::Outgoing);
        assert_eq!(categories[0].stats.get("actualValue"), Some(&json!(12000)));
    }

    #[test]
    fn page_reads_envelope_and_cursor() {
        let client = client();
        client.transport().push(HttpResponse::json(
            200,
            json!({
                "data": [wire_category("c1"), wire_category("c2")],
                "pagination": { "next_cursor": "c2", "has_more": true }
            })
            .to_string(),
        ));

        let page = fetch_categories_page(
            &client,
            &PageParams {
                period_id: Some("period-1"),
                ..PageParams::default()
            },
        )
        .unwrap();

        assert_eq!(page.categories.len(), 2);
        assert_eq!(page.next_cursor.as_deref(), Some("c2"));
        assert_eq!(
            client.transport().last_request().url,
            "/api/v1/categories?period_id=period-1&page_size=50"
        );
    }

    #[test]
    fn create_serializes_parent_and_type() {
        let client = client();
        client.transport().push(HttpResponse::json(201, wire_category("c9").to_string()));
        let request = CategoryRequest {
            name: "Groceries".to_string(),
            color: "#2f9e44".to_string(),
            icon: "cart".to_string(),
            parent_id: Some("c1".to_string()),
            category_type: CategoryType::Outgoing,
        };

        let created = create_category(&client, &request).unwrap();

        assert_eq!(created.id, "c9");
        let sent: Value = serde_json::from_str(client.transport().last_request().body.as_deref().unwrap()).unwrap();
        assert_eq!(sent["parent_id"], json!("c1"));
        assert_eq!(sent["category_type"], json!("Outgoing"));
    }
}
