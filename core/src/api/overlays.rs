use crate::client::{ApiClient, NO_BODY};
use crate::error::ClientError;
use crate::transport::Transport;
use crate::types::{Overlay, OverlayRequest};

const OVERLAYS_PATH: &str = "/api/overlays";

pub fn fetch_overlays<T: Transport>(client: &ApiClient<T>) -> Result<Vec<Overlay>, ClientError> {
    client.get(OVERLAYS_PATH)
}

pub fn create_overlay<T: Transport>(client: &ApiClient<T>, request: &OverlayRequest) -> Result<Overlay, ClientError> {
    client.post(OVERLAYS_PATH, Some(request))?.into_typed()
}

pub fn update_overlay<T: Transport>(
    client: &ApiClient<T>,
    id: &str,
    request: &OverlayRequest,
) -> Result<Overlay, ClientError> {
    client.put(&format!("{OVERLAYS_PATH}/{id}"), Some(request))?.into_typed()
}

pub fn delete_overlay<T: Transport>(client: &ApiClient<T>, id: &str) -> Result<(), ClientError> {
    client.delete(&format!("{OVERLAYS_PATH}/{id}"), NO_BODY).map(drop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::http::{HttpMethod, HttpResponse};
    use crate::testing::StubTransport;
    use crate::types::{OverlayCategoryCap, OverlayInclusionMode, OverlayRules};
    use serde_json::{json, Value};

    fn client() -> ApiClient<StubTransport> {
        ApiClient::new(ApiConfig::default(), StubTransport::new())
    }

    fn request() -> OverlayRequest {
        OverlayRequest {
            name: "Holiday".to_string(),
            icon: None,
            start_date: "2026-07-01".to_string(),
            end_date: "2026-07-14".to_string(),
            inclusion_mode: OverlayInclusionMode::Rules,
            total_cap_amount: Some(150000),
            category_caps: vec![OverlayCategoryCap {
                category_id: "category-2".to_string(),
                cap_amount: 40000,
            }],
            rules: Some(OverlayRules {
                category_ids: vec!["category-2".to_string()],
                ..OverlayRules::default()
            }),
        }
    }

    #[test]
    fn create_sends_nested_snake_case() {
        let client = client();
        client.transport().push(HttpResponse::json(
            201,
            r#"{"id":"overlay-1","name":"Holiday","start_date":"2026-07-01","end_date":"2026-07-14","inclusion_mode":"rules","spent_amount":0}"#,
        ));

        let overlay = create_overlay(&client, &request()).unwrap();

        assert_eq!(overlay.id, "overlay-1");
        assert_eq!(overlay.inclusion_mode, OverlayInclusionMode::Rules);
        assert_eq!(overlay.spent_amount, Some(0));
        assert!(overlay.category_caps.is_empty());

        let sent: Value = serde_json::from_str(client.transport().last_request().body.as_deref().unwrap()).unwrap();
        assert_eq!(sent["category_caps"], json!([{ "category_id": "category-2", "cap_amount": 40000 }]));
        assert_eq!(sent["rules"]["vendor_ids"], json!([]));
        assert_eq!(sent["total_cap_amount"], json!(150000));
    }

    #[test]
    fn update_and_delete_target_the_overlay() {
        let client = client();
        client.transport().push(HttpResponse::json(
            200,
            r#"{"id":"overlay-1","name":"Holiday","start_date":"2026-07-01","end_date":"2026-07-14","inclusion_mode":"all"}"#,
        ));
        client.transport().push(HttpResponse::new(204, ""));

        update_overlay(&client, "overlay-1", &request()).unwrap();
        delete_overlay(&client, "overlay-1").unwrap();

        let requests = client.transport().requests();
        assert_eq!(requests[0].method, HttpMethod::Put);
        assert_eq!(requests[1].method, HttpMethod::Delete);
        assert!(requests.iter().all(|r| r.url == "/api/v1/overlays/overlay-1"));
    }
}
