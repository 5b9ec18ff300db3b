use crate::client::{ApiClient, NO_BODY};
use crate::error::ClientError;
use crate::transport::Transport;
use crate::types::{Account, AccountRequest};

const ACCOUNTS_PATH: &str = "/api/accounts";

pub fn fetch_accounts<T: Transport>(client: &ApiClient<T>) -> Result<Vec<Account>, ClientError> {
    client.get(ACCOUNTS_PATH)
}

pub fn fetch_account<T: Transport>(client: &ApiClient<T>, id: &str) -> Result<Account, ClientError> {
    client.get(&format!("{ACCOUNTS_PATH}/{id}"))
}

pub fn create_account<T: Transport>(client: &ApiClient<T>, request: &AccountRequest) -> Result<Account, ClientError> {
    client.post(ACCOUNTS_PATH, Some(request))?.into_typed()
}

pub fn delete_account<T: Transport>(client: &ApiClient<T>, id: &str) -> Result<(), ClientError> {
    client.delete(&format!("{ACCOUNTS_PATH}/{id}"), NO_BODY).map(drop)
}
