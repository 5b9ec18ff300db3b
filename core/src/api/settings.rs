use crate::client::ApiClient;
use crate::error::ClientError;
use crate::transport::Transport;
use crate::types::{Settings, SettingsRequest};

const SETTINGS_PATH: &str = "/api/settings";

pub fn fetch_settings<T: Transport>(client: &ApiClient<T>) -> Result<Settings, ClientError> {
    client.get(SETTINGS_PATH)
}

pub fn update_settings<T: Transport>(client: &ApiClient<T>, request: &SettingsRequest) -> Result<Settings, ClientError> {
    client.put(SETTINGS_PATH, Some(request))?.into_typed()
}
