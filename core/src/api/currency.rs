use tracing::debug;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::transport::Transport;
use crate::types::Currency;

/// Currency codes the server is expected to know.
pub const KNOWN_CURRENCY_CODES: [&str; 4] = ["EUR", "USD", "GBP", "JPY"];

pub fn fetch_currency_by_code<T: Transport>(client: &ApiClient<T>, code: &str) -> Result<Currency, ClientError> {
    client.get(&format!("/api/currency/{code}"))
}

/// Every known currency the server can describe. Codes it fails on are
/// skipped, so the result may be shorter than `KNOWN_CURRENCY_CODES`.
pub fn fetch_currencies<T: Transport>(client: &ApiClient<T>) -> Vec<Currency> {
    KNOWN_CURRENCY_CODES
        .iter()
        .filter_map(|code| match fetch_currency_by_code(client, code) {
            Ok(currency) => Some(currency),
            Err(err) => {
                debug!(code, error = %err, "skipping currency");
                None
            }
        })
        .collect()
}
