use crate::client::{ApiClient, NO_BODY};
use crate::error::ClientError;
use crate::transport::Transport;
use crate::types::{Vendor, VendorRequest};

const VENDORS_PATH: &str = "/api/vendors";

pub fn fetch_vendors<T: Transport>(client: &ApiClient<T>) -> Result<Vec<Vendor>, ClientError> {
    client.get(VENDORS_PATH)
}

pub fn create_vendor<T: Transport>(client: &ApiClient<T>, request: &VendorRequest) -> Result<Vendor, ClientError> {
    client.post(VENDORS_PATH, Some(request))?.into_typed()
}

/// Delete a vendor. The server refuses with 409 while transactions use it.
pub fn delete_vendor<T: Transport>(client: &ApiClient<T>, id: &str) -> Result<(), ClientError> {
    client.delete(&format!("{VENDORS_PATH}/{id}"), NO_BODY).map(drop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::http::HttpResponse;
    use crate::testing::StubTransport;
    use serde_json::json;

    fn client() -> ApiClient<StubTransport> {
        ApiClient::new(ApiConfig::default(), StubTransport::new())
    }

    #[test]
    fn create_and_list() {
        let client = client();
        client.transport().push(HttpResponse::json(201, r#"{"id":"vendor-1","name":"Corner Shop"}"#));
        client.transport().push(HttpResponse::json(200, r#"[{"id":"vendor-1","name":"Corner Shop"}]"#));

        let created = create_vendor(&client, &VendorRequest { name: "Corner Shop".to_string() }).unwrap();
        let vendors = fetch_vendors(&client).unwrap();

        assert_eq!(created.id.as_deref(), Some("vendor-1"));
        assert_eq!(vendors, vec![created]);
    }

    #[test]
    fn vendor_in_use_keeps_conflict_details() {
        let client = client();
        client.transport().push(HttpResponse::json(
            409,
            r#"{"error":"VENDOR_IN_USE","message":"Vendor is used by 3 transactions","transaction_count":3,"vendor_id":"vendor-1"}"#,
        ));

        let err = delete_vendor(&client, "vendor-1").unwrap_err();
        let api = err.as_api().unwrap();

        assert_eq!(api.status, 409);
        assert_eq!(api.error_code(), Some("VENDOR_IN_USE"));
        assert_eq!(api.data.as_ref().unwrap()["transactionCount"], json!(3));
    }
}
