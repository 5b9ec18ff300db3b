//! Wire shapes. Field names are the server's snake_case.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

#[derive(Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Currency {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub currency: String,
    pub decimal_places: u8,
}

impl Currency {
    pub fn new(code: &str, name: &str, symbol: &str, decimal_places: u8) -> Self {
        Self {
            id: format!("currency-{}", code.to_ascii_lowercase()),
            name: name.to_string(),
            symbol: symbol.to_string(),
            currency: code.to_string(),
            decimal_places,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub account_type: String,
    pub currency: Currency,
    pub balance: i64,
}

#[derive(Deserialize)]
pub struct AccountInput {
    pub name: String,
    pub color: String,
    pub icon: String,
    pub account_type: String,
    pub currency: String,
    pub balance: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub parent_id: Option<Uuid>,
    pub category_type: String,
}

#[derive(Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub color: String,
    pub icon: String,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    pub category_type: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vendor {
    pub id: Uuid,
    pub name: String,
}

#[derive(Deserialize)]
pub struct VendorInput {
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub description: String,
    pub amount: i64,
    pub occurred_at: String,
    pub category: Category,
    pub from_account: Account,
    pub to_account: Option<Account>,
    pub vendor: Option<Vendor>,
}

/// Ids arrive as strings so an unselected reference (`""`) is a 400, not a
/// body rejection.
#[derive(Deserialize)]
pub struct TransactionInput {
    pub description: String,
    pub amount: i64,
    pub occurred_at: String,
    pub category_id: String,
    pub from_account_id: String,
    #[serde(default)]
    pub to_account_id: Option<String>,
    #[serde(default)]
    pub vendor_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BudgetPeriod {
    pub id: Uuid,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Deserialize)]
pub struct PeriodInput {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub period_id: Option<String>,
    pub page_size: Option<usize>,
    pub cursor: Option<String>,
}

#[derive(Deserialize)]
pub struct TwoFactorCode {
    pub code: String,
}

#[derive(Deserialize)]
pub struct DisableTwoFactor {
    pub password: String,
    pub code: String,
}

#[derive(Deserialize)]
pub struct EmailInput {
    pub email: String,
}
