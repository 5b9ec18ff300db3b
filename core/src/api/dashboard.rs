//! Read-only dashboard widgets, all scoped to a budget period except the
//! asset total and stability report.

use serde_json::Value;

use super::with_query;
use crate::client::ApiClient;
use crate::error::ClientError;
use crate::transport::Transport;
use crate::types::{BudgetPerDay, MonthProgress, MonthlyBurnIn, SpentPerCategory, TotalAssets, Transaction};

fn widget_path(widget: &str, period_id: &str) -> String {
    with_query(&format!("/api/dashboard/{widget}"), &[("period_id", Some(period_id))])
}

pub fn spent_per_category<T: Transport>(
    client: &ApiClient<T>,
    period_id: &str,
) -> Result<Vec<SpentPerCategory>, ClientError> {
    client.get(&widget_path("spent-per-category", period_id))
}

pub fn monthly_burn_in<T: Transport>(client: &ApiClient<T>, period_id: &str) -> Result<MonthlyBurnIn, ClientError> {
    client.get(&widget_path("monthly-burn-in", period_id))
}

pub fn month_progress<T: Transport>(client: &ApiClient<T>, period_id: &str) -> Result<MonthProgress, ClientError> {
    client.get(&widget_path("month-progress", period_id))
}

pub fn recent_transactions<T: Transport>(
    client: &ApiClient<T>,
    period_id: &str,
) -> Result<Vec<Transaction>, ClientError> {
    client.get(&widget_path("recent-transactions", period_id))
}

pub fn budget_per_day<T: Transport>(client: &ApiClient<T>, period_id: &str) -> Result<Vec<BudgetPerDay>, ClientError> {
    client.get(&widget_path("budget-per-day", period_id))
}

pub fn total_assets<T: Transport>(client: &ApiClient<T>) -> Result<TotalAssets, ClientError> {
    client.get("/api/dashboard/total-assets")
}

pub fn budget_stability<T: Transport>(client: &ApiClient<T>) -> Result<Value, ClientError> {
    client.get("/api/dashboard/budget-stability")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::http::HttpResponse;
    use crate::testing::StubTransport;

    fn client() -> ApiClient<StubTransport> {
        ApiClient::new(ApiConfig::default(), StubTransport::new())
    }

    #[test]
    fn widgets_are_scoped_to_period() {
        let client = client();
        client.transport().push(HttpResponse::json(
            200,
            r#"[{"category_name":"Groceries","budgeted_value":30000,"amount_spent":12000,"percentage_spent":40.0}]"#,
        ));
        client.transport().push(HttpResponse::json(
            200,
            r#"{"total_budget":90000,"spent_budget":30000,"current_day":10,"days_in_period":31}"#,
        ));

        let spent = spent_per_category(&client, "period-1").unwrap();
        let burn_in = monthly_burn_in(&client, "period-1").unwrap();

        assert_eq!(spent[0].amount_spent, 12000);
        assert_eq!(burn_in.days_in_period, 31);
        let urls: Vec<String> = client.transport().requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "/api/v1/dashboard/spent-per-category?period_id=period-1",
                "/api/v1/dashboard/monthly-burn-in?period_id=period-1",
            ]
        );
    }

    #[test]
    fn total_assets_is_unscoped() {
        let client = client();
        client.transport().push(HttpResponse::json(200, r#"{"data":{"total_assets":420000}}"#));

        assert_eq!(total_assets(&client).unwrap().total_assets, 420000);
        assert_eq!(client.transport().last_request().url, "/api/v1/dashboard/total-assets");
    }
}
