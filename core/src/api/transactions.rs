use serde_json::Value;

use super::pagination::{parse_page, PageParams};
use super::with_query;
use crate::client::{ApiClient, NO_BODY};
use crate::error::ClientError;
use crate::transport::Transport;
use crate::types::{Transaction, TransactionDraft, TransactionRequest, TransactionsPage};

const TRANSACTIONS_PATH: &str = "/api/transactions";

pub fn fetch_transactions<T: Transport>(
    client: &ApiClient<T>,
    period_id: Option<&str>,
) -> Result<Vec<Transaction>, ClientError> {
    client.get(&with_query(TRANSACTIONS_PATH, &[("period_id", period_id)]))
}

pub fn fetch_transactions_page<T: Transport>(
    client: &ApiClient<T>,
    params: &PageParams<'_>,
) -> Result<TransactionsPage, ClientError> {
    let response: Value = client.get_raw(&params.apply(TRANSACTIONS_PATH))?;
    let page = parse_page(response, "transactions")?;
    Ok(TransactionsPage {
        transactions: page.items,
        next_cursor: page.next_cursor,
    })
}

/// Create a transaction from a draft. Unselected category or source
/// account are sent as empty ids and left for the server to reject.
pub fn create_transaction<T: Transport>(client: &ApiClient<T>, draft: &TransactionDraft) -> Result<Transaction, ClientError> {
    create_transaction_from_request(client, &TransactionRequest::from(draft))
}

pub fn create_transaction_from_request<T: Transport>(
    client: &ApiClient<T>,
    request: &TransactionRequest,
) -> Result<Transaction, ClientError> {
    client.post(TRANSACTIONS_PATH, Some(request))?.into_typed()
}

pub fn update_transaction<T: Transport>(
    client: &ApiClient<T>,
    id: &str,
    request: &TransactionRequest,
) -> Result<Transaction, ClientError> {
    client.put(&format!("{TRANSACTIONS_PATH}/{id}"), Some(request))?.into_typed()
}

pub fn delete_transaction<T: Transport>(client: &ApiClient<T>, id: &str) -> Result<(), ClientError> {
    client.delete(&format!("{TRANSACTIONS_PATH}/{id}"), NO_BODY).map(drop)
}
