use super::with_query;
use crate::client::{ApiClient, NO_BODY};
use crate::error::ClientError;
use crate::transport::Transport;
use crate::types::{BatchUpsertTargetsRequest, CategoryTargets};

const TARGETS_PATH: &str = "/api/category-targets";

pub fn fetch_category_targets<T: Transport>(client: &ApiClient<T>, period_id: &str) -> Result<CategoryTargets, ClientError> {
    client.get(&with_query(TARGETS_PATH, &[("period_id", Some(period_id))]))
}

pub fn save_category_targets<T: Transport>(
    client: &ApiClient<T>,
    request: &BatchUpsertTargetsRequest,
) -> Result<(), ClientError> {
    client.post(TARGETS_PATH, Some(request)).map(drop)
}

pub fn exclude_category<T: Transport>(client: &ApiClient<T>, category_id: &str) -> Result<(), ClientError> {
    client
        .post(&format!("{TARGETS_PATH}/{category_id}/exclude"), NO_BODY)
        .map(drop)
}

pub fn include_category<T: Transport>(client: &ApiClient<T>, category_id: &str) -> Result<(), ClientError> {
    client
        .post(&format!("{TARGETS_PATH}/{category_id}/include"), NO_BODY)
        .map(drop)
}
