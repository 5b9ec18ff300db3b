//! Domain DTOs for the budgeting API.
//!
//! # Design
//! These types describe the in-memory (camelCase) shape. They are decoded
//! only after `ApiClient` has rewritten response keys, and serialized before
//! it rewrites request keys back to snake_case, so the wire format never
//! appears here. Shapes the client does not interpret (dashboard widgets,
//! schedules) stay as `serde_json::Value`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Users and auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetValidateResponse {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoFactorSetup {
    pub secret: String,
    /// Data URL of the QR code image.
    pub qr_code: String,
    pub backup_codes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoFactorStatus {
    pub enabled: bool,
    pub has_backup_codes: bool,
    pub backup_codes_remaining: u32,
}

// ---------------------------------------------------------------------------
// Accounts and currencies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    Checking,
    Savings,
    CreditCard,
    Wallet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub id: String,
    pub name: String,
    pub symbol: String,
    /// ISO code, e.g. `EUR`.
    pub currency: String,
    pub decimal_places: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub account_type: AccountType,
    pub currency: Currency,
    /// Minor units (cents).
    pub balance: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spend_limit: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRequest {
    pub name: String,
    pub color: String,
    pub icon: String,
    pub account_type: AccountType,
    /// Currency code.
    pub currency: String,
    pub balance: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spend_limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Categories and vendors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryType {
    Incoming,
    Outgoing,
    Transfer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub parent_id: Option<String>,
    pub category_type: CategoryType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    pub name: String,
    pub color: String,
    pub icon: String,
    pub parent_id: Option<String>,
    pub category_type: CategoryType,
}

/// A category plus whatever per-period statistics the server attaches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryWithStats {
    #[serde(flatten)]
    pub category: Category,
    #[serde(flatten)]
    pub stats: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesPage {
    pub categories: Vec<CategoryWithStats>,
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorRequest {
    pub name: String,
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub description: String,
    pub amount: i64,
    pub occurred_at: String,
    pub category: Category,
    pub from_account: Account,
    pub to_account: Option<Account>,
    pub vendor: Option<Vendor>,
}

/// A transaction being composed, before it has an id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransactionDraft {
    pub description: String,
    pub amount: i64,
    pub occurred_at: String,
    pub category: Option<Category>,
    pub from_account: Option<Account>,
    pub to_account: Option<Account>,
    pub vendor: Option<Vendor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub description: String,
    pub amount: i64,
    pub occurred_at: String,
    pub category_id: String,
    pub from_account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
}

impl From<&TransactionDraft> for TransactionRequest {
    fn from(draft: &TransactionDraft) -> Self {
        Self {
            description: draft.description.clone(),
            amount: draft.amount,
            occurred_at: draft.occurred_at.clone(),
            category_id: draft.category.as_ref().map(|c| c.id.clone()).unwrap_or_default(),
            from_account_id: draft.from_account.as_ref().map(|a| a.id.clone()).unwrap_or_default(),
            to_account_id: draft.to_account.as_ref().map(|a| a.id.clone()),
            vendor_id: draft.vendor.as_ref().and_then(|v| v.id.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsPage {
    pub transactions: Vec<Transaction>,
    pub next_cursor: Option<String>,
}

// ---------------------------------------------------------------------------
// Budgets and periods
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub name: String,
    pub start_day: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRequest {
    pub name: String,
    pub start_day: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCategory {
    pub id: String,
    pub category_id: String,
    pub budgeted_value: i64,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCategoryRequest {
    pub category_id: String,
    pub budgeted_value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCategoryUpdateRequest {
    pub budgeted_value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPeriod {
    pub id: String,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_auto_generated: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPeriodRequest {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPeriodGaps {
    pub unassigned_count: u64,
    #[serde(default)]
    pub transactions: Vec<Value>,
}

/// Automatic period generation settings; opaque to the client.
pub type BudgetPeriodSchedule = Value;

// ---------------------------------------------------------------------------
// Overlays
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayInclusionMode {
    Manual,
    Rules,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayRules {
    pub category_ids: Vec<String>,
    pub vendor_ids: Vec<String>,
    pub account_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayCategoryCap {
    pub category_id: String,
    pub cap_amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub inclusion_mode: OverlayInclusionMode,
    #[serde(default)]
    pub total_cap_amount: Option<i64>,
    #[serde(default)]
    pub spent_amount: Option<i64>,
    #[serde(default)]
    pub transaction_count: Option<u64>,
    #[serde(default)]
    pub category_caps: Vec<OverlayCategoryCap>,
    #[serde(default)]
    pub rules: Option<OverlayRules>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub inclusion_mode: OverlayInclusionMode,
    pub total_cap_amount: Option<i64>,
    #[serde(default)]
    pub category_caps: Vec<OverlayCategoryCap>,
    pub rules: Option<OverlayRules>,
}

// ---------------------------------------------------------------------------
// Settings and category targets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub id: String,
    pub theme: Theme,
    /// Two-letter language code.
    pub language: String,
    pub default_currency_id: Option<String>,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRequest {
    pub theme: Theme,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_currency_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTargetRow {
    pub id: String,
    pub category_id: String,
    pub category_name: String,
    pub category_type: CategoryType,
    pub category_icon: String,
    pub category_color: String,
    pub is_archived: bool,
    pub is_parent: bool,
    pub parent_category_name: Option<String>,
    pub current_target: Option<i64>,
    pub previous_target: Option<i64>,
    pub is_excluded: bool,
    pub exclusion_reason: Option<String>,
    pub projected_variance_basis_points: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTargets {
    pub period_id: String,
    pub period_name: String,
    pub period_start_date: String,
    pub period_end_date: String,
    pub period_progress_percent: f64,
    pub total_targeted: i64,
    pub total_categories: u32,
    pub targeted_categories: u32,
    pub outgoing_targets: Vec<CategoryTargetRow>,
    pub incoming_targets: Vec<CategoryTargetRow>,
    pub excluded_categories: Vec<CategoryTargetRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetEntry {
    pub category_id: String,
    pub budgeted_value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchUpsertTargetsRequest {
    pub targets: Vec<TargetEntry>,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpentPerCategory {
    pub category_name: String,
    pub budgeted_value: i64,
    pub amount_spent: i64,
    pub percentage_spent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBurnIn {
    pub total_budget: i64,
    pub spent_budget: i64,
    pub current_day: u32,
    pub days_in_period: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthProgress {
    pub current_date: String,
    pub days_in_period: u32,
    pub remaining_days: u32,
    pub days_passed_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPerDay {
    pub account_name: String,
    pub date: String,
    pub balance: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalAssets {
    pub total_assets: i64,
}
