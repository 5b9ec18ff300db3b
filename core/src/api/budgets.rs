//! Budgets, budgeted categories and budget periods.
//!
//! A missing period schedule or gap report is a normal state, so those two
//! reads turn a 404 into an empty value instead of an error.

use serde_json::Value;

use crate::client::{ApiClient, NO_BODY};
use crate::error::ClientError;
use crate::transport::Transport;
use crate::types::{
    Budget, BudgetCategory, BudgetCategoryRequest, BudgetCategoryUpdateRequest, BudgetPeriod, BudgetPeriodGaps,
    BudgetPeriodRequest, BudgetPeriodSchedule, BudgetRequest,
};

const BUDGETS_PATH: &str = "/api/budgets";
const BUDGET_CATEGORIES_PATH: &str = "/api/budget-categories";
const PERIODS_PATH: &str = "/api/budget_period";
const CURRENT_PERIOD_PATH: &str = "/api/budget_period/current";
const SCHEDULE_PATH: &str = "/api/budget_period/schedule";
const GAPS_PATH: &str = "/api/budget_period/gaps";

pub fn fetch_budgets<T: Transport>(client: &ApiClient<T>) -> Result<Vec<Budget>, ClientError> {
    client.get(BUDGETS_PATH)
}

pub fn create_budget<T: Transport>(client: &ApiClient<T>, request: &BudgetRequest) -> Result<Budget, ClientError> {
    client.post(BUDGETS_PATH, Some(request))?.into_typed()
}

pub fn update_budget<T: Transport>(client: &ApiClient<T>, budget: &Budget) -> Result<Budget, ClientError> {
    client.put(&format!("{BUDGETS_PATH}/{}", budget.id), Some(budget))?.into_typed()
}

pub fn fetch_budget_categories<T: Transport>(client: &ApiClient<T>) -> Result<Vec<BudgetCategory>, ClientError> {
    client.get(BUDGET_CATEGORIES_PATH)
}

pub fn create_budget_category<T: Transport>(
    client: &ApiClient<T>,
    request: &BudgetCategoryRequest,
) -> Result<BudgetCategory, ClientError> {
    client.post(BUDGET_CATEGORIES_PATH, Some(request))?.into_typed()
}

pub fn update_budget_category<T: Transport>(
    client: &ApiClient<T>,
    id: &str,
    request: &BudgetCategoryUpdateRequest,
) -> Result<(), ClientError> {
    client
        .put(&format!("{BUDGET_CATEGORIES_PATH}/{id}"), Some(request))
        .map(drop)
}

pub fn delete_budget_category<T: Transport>(client: &ApiClient<T>, id: &str) -> Result<(), ClientError> {
    client
        .delete(&format!("{BUDGET_CATEGORIES_PATH}/{id}"), NO_BODY)
        .map(drop)
}

pub fn fetch_current_period<T: Transport>(client: &ApiClient<T>) -> Result<BudgetPeriod, ClientError> {
    client.get(CURRENT_PERIOD_PATH)
}

pub fn fetch_periods<T: Transport>(client: &ApiClient<T>) -> Result<Vec<BudgetPeriod>, ClientError> {
    client.get(PERIODS_PATH)
}

/// Create a period and return its id. The server answers with the bare id
/// as `text/plain`.
pub fn create_period<T: Transport>(client: &ApiClient<T>, request: &BudgetPeriodRequest) -> Result<String, ClientError> {
    client.post(PERIODS_PATH, Some(request))?.into_typed()
}

pub fn update_period<T: Transport>(
    client: &ApiClient<T>,
    id: &str,
    request: &BudgetPeriodRequest,
) -> Result<BudgetPeriod, ClientError> {
    client.put(&format!("{PERIODS_PATH}/{id}"), Some(request))?.into_typed()
}

pub fn delete_period<T: Transport>(client: &ApiClient<T>, id: &str) -> Result<(), ClientError> {
    client.delete(&format!("{PERIODS_PATH}/{id}"), NO_BODY).map(drop)
}

/// The automatic period schedule, or `None` when none is configured.
pub fn fetch_schedule<T: Transport>(client: &ApiClient<T>) -> Result<Option<BudgetPeriodSchedule>, ClientError> {
    match client.get(SCHEDULE_PATH) {
        Ok(schedule) => Ok(Some(schedule)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

pub fn create_schedule<T: Transport>(client: &ApiClient<T>, request: &Value) -> Result<BudgetPeriodSchedule, ClientError> {
    client.post(SCHEDULE_PATH, Some(request))?.into_typed()
}

pub fn update_schedule<T: Transport>(client: &ApiClient<T>, request: &Value) -> Result<BudgetPeriodSchedule, ClientError> {
    client.put(SCHEDULE_PATH, Some(request))?.into_typed()
}

pub fn delete_schedule<T: Transport>(client: &ApiClient<T>) -> Result<(), ClientError> {
    client.delete(SCHEDULE_PATH, NO_BODY).map(drop)
}

/// Transactions that fall outside every period.
pub fn fetch_gaps<T: Transport>(client: &ApiClient<T>) -> Result<BudgetPeriodGaps, ClientError> {
    match client.get(GAPS_PATH) {
        Err(err) if err.is_not_found() => Ok(BudgetPeriodGaps::default()),
        other => other,
    }
}
