//! In-memory stand-in for the budgeting backend.
//!
//! Serves `/api/v1` with snake_case JSON and a cookie session. State lives in
//! one `RwLock`, so every handler sees a consistent snapshot.

pub mod model;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};
use uuid::Uuid;

pub use model::*;

pub const SESSION_COOKIE: &str = "budget_session";
pub const MAX_FAILED_LOGINS: u32 = 5;
pub const RETRY_AFTER_SECONDS: u64 = 30;
pub const LOCKED_EMAIL: &str = "locked@example.com";
pub const LOCKED_UNTIL: &str = "2026-02-26T10:00:00Z";
/// The only code the fake authenticator accepts.
pub const TWO_FACTOR_CODE: &str = "123456";
const DEFAULT_PAGE_SIZE: usize = 50;

struct StoredUser {
    user: User,
    password: String,
    locked: bool,
    two_factor_enabled: bool,
}

#[derive(Default)]
pub struct Db {
    users: HashMap<String, StoredUser>,
    sessions: HashMap<String, String>,
    failed_logins: HashMap<String, u32>,
    currencies: Vec<Currency>,
    accounts: Vec<Account>,
    categories: Vec<Category>,
    vendors: Vec<Vendor>,
    transactions: Vec<Transaction>,
    periods: Vec<BudgetPeriod>,
    schedule: Option<Value>,
}

impl Db {
    /// Known currencies (no JPY) and one permanently locked account.
    pub fn seeded() -> Self {
        let mut db = Db {
            currencies: vec![
                Currency::new("EUR", "Euro", "€", 2),
                Currency::new("USD", "US Dollar", "$", 2),
                Currency::new("GBP", "Pound Sterling", "£", 2),
            ],
            ..Db::default()
        };
        db.users.insert(
            LOCKED_EMAIL.to_string(),
            StoredUser {
                user: User {
                    id: Uuid::new_v4(),
                    email: LOCKED_EMAIL.to_string(),
                    name: "Locked User".to_string(),
                },
                password: "password123".to_string(),
                locked: true,
                two_factor_enabled: false,
            },
        );
        db
    }

    fn start_session(&mut self, email: &str) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions.insert(token.clone(), email.to_string());
        format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
    }

    fn current_user(&self, headers: &HeaderMap) -> ApiResult<&StoredUser> {
        session_token(headers)
            .and_then(|token| self.sessions.get(token))
            .and_then(|email| self.users.get(email))
            .ok_or_else(ApiFailure::unauthorized)
    }
}

pub type SharedDb = Arc<RwLock<Db>>;

/// A non-2xx JSON answer: `{"message": ..}` plus optional extra fields.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    body: Value,
}

impl ApiFailure {
    fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            body: json!({ "message": message }),
        }
    }

    fn coded(status: StatusCode, error: &str, message: &str) -> Self {
        Self {
            status,
            body: json!({ "error": error, "message": message }),
        }
    }

    fn with(mut self, key: &str, value: Value) -> Self {
        if let Value::Object(map) = &mut self.body {
            map.insert(key.to_string(), value);
        }
        self
    }

    fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Authentication required")
    }

    fn not_found(what: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, &format!("{what} not found"))
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiFailure>;

fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE).then_some(value)
        })
}

pub fn app() -> Router {
    app_with(Arc::new(RwLock::new(Db::seeded())))
}

pub fn app_with(db: SharedDb) -> Router {
    let api = Router::new()
        .route("/users/", post(register))
        .route("/users/login", post(login))
        .route("/users/logout", post(logout))
        .route("/users/me", get(me))
        .route("/password-reset/request", post(request_password_reset))
        .route("/two-factor/status", get(two_factor_status))
        .route("/two-factor/setup", post(two_factor_setup))
        .route("/two-factor/verify", post(two_factor_verify))
        .route("/two-factor/disable", delete(two_factor_disable))
        .route("/currency/{code}", get(get_currency))
        .route("/accounts", get(list_accounts).post(create_account))
        .route("/accounts/{id}", get(get_account).delete(delete_account))
        .route("/categories", get(list_categories).post(create_category))
        .route("/vendors", get(list_vendors).post(create_vendor))
        .route("/vendors/{id}", delete(delete_vendor))
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route("/transactions/{id}", delete(delete_transaction))
        .route("/budget_period", get(list_periods).post(create_period))
        .route("/budget_period/current", get(current_period))
        .route("/budget_period/schedule", get(get_schedule).post(put_schedule).put(put_schedule))
        .route("/budget_period/{id}", delete(delete_period));

    Router::new().nest("/api/v1", api).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// --- users ---

async fn register(State(state): State<SharedDb>, Json(input): Json<Registration>) -> ApiResult<impl IntoResponse> {
    if input.name.trim().is_empty() || input.email.trim().is_empty() || input.password.len() < 8 {
        return Err(ApiFailure::new(
            StatusCode::BAD_REQUEST,
            "Name, email and a password of at least 8 characters are required",
        ));
    }
    let mut db = state.write().await;
    if db.users.contains_key(&input.email) {
        return Err(ApiFailure::coded(StatusCode::CONFLICT, "email_taken", "Email already registered"));
    }
    let user = User {
        id: Uuid::new_v4(),
        email: input.email.clone(),
        name: input.name,
    };
    db.users.insert(
        input.email.clone(),
        StoredUser {
            user: user.clone(),
            password: input.password,
            locked: false,
            two_factor_enabled: false,
        },
    );
    let cookie = db.start_session(&input.email);
    info!(email = %user.email, "registered user");
    Ok((StatusCode::CREATED, [(header::SET_COOKIE, cookie)], Json(user)))
}

async fn login(State(state): State<SharedDb>, Json(input): Json<Credentials>) -> ApiResult<impl IntoResponse> {
    let mut db = state.write().await;

    let attempts = db.failed_logins.get(&input.email).copied().unwrap_or(0);
    if attempts >= MAX_FAILED_LOGINS {
        return Err(
            ApiFailure::coded(StatusCode::TOO_MANY_REQUESTS, "too_many_attempts", "Too many login attempts")
                .with("retry_after_seconds", json!(RETRY_AFTER_SECONDS)),
        );
    }

    let (locked, password_ok) = match db.users.get(&input.email) {
        Some(stored) => (stored.locked, stored.password == input.password),
        None => (false, false),
    };
    if locked {
        return Err(
            ApiFailure::coded(StatusCode::LOCKED, "account_locked", "Account locked")
                .with("locked_until", json!(LOCKED_UNTIL)),
        );
    }
    if !password_ok {
        *db.failed_logins.entry(input.email.clone()).or_insert(0) += 1;
        warn!(email = %input.email, attempts = attempts + 1, "login failed");
        return Err(ApiFailure::new(StatusCode::UNAUTHORIZED, "Invalid credentials"));
    }

    db.failed_logins.remove(&input.email);
    let user = db
        .users
        .get(&input.email)
        .map(|stored| stored.user.clone())
        .ok_or_else(ApiFailure::unauthorized)?;
    let cookie = db.start_session(&input.email);
    info!(email = %user.email, "user logged in");
    Ok(([(header::SET_COOKIE, cookie)], Json(user)))
}

async fn logout(State(state): State<SharedDb>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = session_token(&headers) {
        state.write().await.sessions.remove(token);
    }
    let expired = format!("{SESSION_COOKIE}=; Path=/; Max-Age=0");
    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, expired)])
}

async fn me(State(state): State<SharedDb>, headers: HeaderMap) -> ApiResult<Json<Value>> {
    let db = state.read().await;
    let stored = db.current_user(&headers)?;
    Ok(Json(json!({ "user": stored.user })))
}

async fn request_password_reset(Json(input): Json<EmailInput>) -> Json<Value> {
    info!(email = %input.email, "password reset requested");
    Json(json!({ "message": "If that email is registered, a reset link has been sent." }))
}

// --- two-factor ---

async fn two_factor_status(State(state): State<SharedDb>, headers: HeaderMap) -> ApiResult<Json<Value>> {
    let db = state.read().await;
    let enabled = db.current_user(&headers)?.two_factor_enabled;
    let remaining = if enabled { 8 } else { 0 };
    Ok(Json(json!({
        "enabled": enabled,
        "has_backup_codes": enabled,
        "backup_codes_remaining": remaining,
    })))
}

async fn two_factor_setup(State(state): State<SharedDb>, headers: HeaderMap) -> ApiResult<Json<Value>> {
    let db = state.read().await;
    db.current_user(&headers)?;
    let backup_codes: Vec<String> = (1..=8).map(|n| format!("backup-{n:02}")).collect();
    Ok(Json(json!({
        "secret": "JBSWY3DPEHPK3PXP",
        "qr_code": "data:image/png;base64,iVBORw0KGgo=",
        "backup_codes": backup_codes,
    })))
}

async fn two_factor_verify(
    State(state): State<SharedDb>,
    headers: HeaderMap,
    Json(input): Json<TwoFactorCode>,
) -> ApiResult<StatusCode> {
    let mut db = state.write().await;
    let email = db.current_user(&headers)?.user.email.clone();
    if input.code != TWO_FACTOR_CODE {
        return Err(ApiFailure::new(StatusCode::BAD_REQUEST, "Invalid verification code"));
    }
    if let Some(stored) = db.users.get_mut(&email) {
        stored.two_factor_enabled = true;
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn two_factor_disable(
    State(state): State<SharedDb>,
    headers: HeaderMap,
    Json(input): Json<DisableTwoFactor>,
) -> ApiResult<StatusCode> {
    let mut db = state.write().await;
    let stored = db.current_user(&headers)?;
    if stored.password != input.password || input.code != TWO_FACTOR_CODE {
        return Err(ApiFailure::new(StatusCode::BAD_REQUEST, "Invalid password or code"));
    }
    let email = stored.user.email.clone();
    if let Some(stored) = db.users.get_mut(&email) {
        stored.two_factor_enabled = false;
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- accounts and currencies ---

async fn get_currency(
    State(state): State<SharedDb>,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> ApiResult<Json<Currency>> {
    let db = state.read().await;
    db.current_user(&headers)?;
    db.currencies
        .iter()
        .find(|c| c.currency == code)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiFailure::not_found("Currency"))
}

async fn list_accounts(State(state): State<SharedDb>, headers: HeaderMap) -> ApiResult<Json<Value>> {
    let db = state.read().await;
    db.current_user(&headers)?;
    Ok(Json(json!({ "data": db.accounts })))
}

async fn create_account(
    State(state): State<SharedDb>,
    headers: HeaderMap,
    Json(input): Json<AccountInput>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    let mut db = state.write().await;
    db.current_user(&headers)?;
    if input.name.trim().is_empty() {
        return Err(ApiFailure::new(StatusCode::UNPROCESSABLE_ENTITY, "Account name must not be empty"));
    }
    let currency = db
        .currencies
        .iter()
        .find(|c| c.currency == input.currency)
        .cloned()
        .ok_or_else(|| ApiFailure::new(StatusCode::BAD_REQUEST, "Unknown currency"))?;
    let account = Account {
        id: Uuid::new_v4(),
        name: input.name,
        color: input.color,
        icon: input.icon,
        account_type: input.account_type,
        currency,
        balance: input.balance,
    };
    db.accounts.push(account.clone());
    Ok((StatusCode::CREATED, Json(account)))
}

async fn get_account(
    State(state): State<SharedDb>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Account>> {
    let db = state.read().await;
    db.current_user(&headers)?;
    db.accounts
        .iter()
        .find(|a| a.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiFailure::not_found("Account"))
}

async fn delete_account(
    State(state): State<SharedDb>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let mut db = state.write().await;
    db.current_user(&headers)?;
    let before = db.accounts.len();
    db.accounts.retain(|a| a.id != id);
    if db.accounts.len() == before {
        return Err(ApiFailure::not_found("Account"));
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- categories and vendors ---

async fn list_categories(State(state): State<SharedDb>, headers: HeaderMap) -> ApiResult<Json<Value>> {
    let db = state.read().await;
    db.current_user(&headers)?;
    Ok(Json(json!({ "data": db.categories })))
}

async fn create_category(
    State(state): State<SharedDb>,
    headers: HeaderMap,
    Json(input): Json<CategoryInput>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let mut db = state.write().await;
    db.current_user(&headers)?;
    let category = Category {
        id: Uuid::new_v4(),
        name: input.name,
        color: input.color,
        icon: input.icon,
        parent_id: input.parent_id,
        category_type: input.category_type,
    };
    db.categories.push(category.clone());
    Ok((StatusCode::CREATED, Json(category)))
}

async fn list_vendors(State(state): State<SharedDb>, headers: HeaderMap) -> ApiResult<Json<Vec<Vendor>>> {
    let db = state.read().await;
    db.current_user(&headers)?;
    Ok(Json(db.vendors.clone()))
}

async fn create_vendor(
    State(state): State<SharedDb>,
    headers: HeaderMap,
    Json(input): Json<VendorInput>,
) -> ApiResult<(StatusCode, Json<Vendor>)> {
    let mut db = state.write().await;
    db.current_user(&headers)?;
    if input.name.trim().is_empty() {
        return Err(ApiFailure::new(StatusCode::UNPROCESSABLE_ENTITY, "Vendor name must not be empty"));
    }
    let vendor = Vendor {
        id: Uuid::new_v4(),
        name: input.name,
    };
    db.vendors.push(vendor.clone());
    Ok((StatusCode::CREATED, Json(vendor)))
}

async fn delete_vendor(
    State(state): State<SharedDb>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let mut db = state.write().await;
    db.current_user(&headers)?;
    let in_use = db
        .transactions
        .iter()
        .filter(|t| t.vendor.as_ref().is_some_and(|v| v.id == id))
        .count();
    if in_use > 0 {
        return Err(ApiFailure::coded(
            StatusCode::CONFLICT,
            "VENDOR_IN_USE",
            &format!("Vendor is used by {in_use} transactions"),
        )
        .with("transaction_count", json!(in_use))
        .with("vendor_id", json!(id)));
    }
    let before = db.vendors.len();
    db.vendors.retain(|v| v.id != id);
    if db.vendors.len() == before {
        return Err(ApiFailure::not_found("Vendor"));
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- transactions ---

async fn list_transactions(
    State(state): State<SharedDb>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Value>> {
    let db = state.read().await;
    db.current_user(&headers)?;

    let start = query
        .cursor
        .as_deref()
        .and_then(|cursor| db.transactions.iter().position(|t| t.id.to_string() == cursor))
        .map_or(0, |index| index + 1);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
    let page: Vec<&Transaction> = db.transactions.iter().skip(start).take(page_size).collect();
    let next_cursor = if start + page.len() < db.transactions.len() {
        page.last().map(|t| t.id.to_string())
    } else {
        None
    };

    Ok(Json(json!({
        "data": page,
        "pagination": {
            "next_cursor": next_cursor,
            "page_size": page_size,
            "period_id": query.period_id,
        },
    })))
}

fn find_by_id<'a, T>(items: &'a [T], id: &str, id_of: impl Fn(&T) -> Uuid) -> Option<&'a T> {
    let id = Uuid::parse_str(id).ok()?;
    items.iter().find(|item| id_of(item) == id)
}

async fn create_transaction(
    State(state): State<SharedDb>,
    headers: HeaderMap,
    Json(input): Json<TransactionInput>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let mut db = state.write().await;
    db.current_user(&headers)?;

    let category = find_by_id(&db.categories, &input.category_id, |c| c.id)
        .cloned()
        .ok_or_else(|| ApiFailure::new(StatusCode::BAD_REQUEST, "Unknown category"))?;
    let from_account = find_by_id(&db.accounts, &input.from_account_id, |a| a.id)
        .cloned()
        .ok_or_else(|| ApiFailure::new(StatusCode::BAD_REQUEST, "Unknown source account"))?;
    let to_account = match input.to_account_id.as_deref() {
        Some(id) => Some(
            find_by_id(&db.accounts, id, |a| a.id)
                .cloned()
                .ok_or_else(|| ApiFailure::new(StatusCode::BAD_REQUEST, "Unknown destination account"))?,
        ),
        None => None,
    };
    let vendor = match input.vendor_id.as_deref() {
        Some(id) => Some(
            find_by_id(&db.vendors, id, |v| v.id)
                .cloned()
                .ok_or_else(|| ApiFailure::new(StatusCode::BAD_REQUEST, "Unknown vendor"))?,
        ),
        None => None,
    };

    let transaction = Transaction {
        id: Uuid::new_v4(),
        description: input.description,
        amount: input.amount,
        occurred_at: input.occurred_at,
        category,
        from_account,
        to_account,
        vendor,
    };
    db.transactions.push(transaction.clone());
    Ok((StatusCode::CREATED, Json(transaction)))
}

async fn delete_transaction(
    State(state): State<SharedDb>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let mut db = state.write().await;
    db.current_user(&headers)?;
    let before = db.transactions.len();
    db.transactions.retain(|t| t.id != id);
    if db.transactions.len() == before {
        return Err(ApiFailure::not_found("Transaction"));
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- budget periods ---

async fn list_periods(State(state): State<SharedDb>, headers: HeaderMap) -> ApiResult<Json<Vec<BudgetPeriod>>> {
    let db = state.read().await;
    db.current_user(&headers)?;
    Ok(Json(db.periods.clone()))
}

/// Answers with the new id as plain text.
async fn create_period(
    State(state): State<SharedDb>,
    headers: HeaderMap,
    Json(input): Json<PeriodInput>,
) -> ApiResult<(StatusCode, String)> {
    let mut db = state.write().await;
    db.current_user(&headers)?;
    let period = BudgetPeriod {
        id: Uuid::new_v4(),
        name: input.name,
        start_date: input.start_date,
        end_date: input.end_date,
    };
    let id = period.id.to_string();
    db.periods.push(period);
    Ok((StatusCode::CREATED, id))
}

async fn current_period(State(state): State<SharedDb>, headers: HeaderMap) -> ApiResult<Json<BudgetPeriod>> {
    let db = state.read().await;
    db.current_user(&headers)?;
    db.periods
        .last()
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiFailure::not_found("Budget period"))
}

async fn delete_period(
    State(state): State<SharedDb>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let mut db = state.write().await;
    db.current_user(&headers)?;
    let before = db.periods.len();
    db.periods.retain(|p| p.id != id);
    if db.periods.len() == before {
        return Err(ApiFailure::not_found("Budget period"));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn get_schedule(State(state): State<SharedDb>, headers: HeaderMap) -> ApiResult<Json<Value>> {
    let db = state.read().await;
    db.current_user(&headers)?;
    db.schedule
        .clone()
        .map(Json)
        .ok_or_else(|| ApiFailure::not_found("Schedule"))
}

async fn put_schedule(
    State(state): State<SharedDb>,
    headers: HeaderMap,
    Json(input): Json<Value>,
) -> ApiResult<Json<Value>> {
    let mut db = state.write().await;
    db.current_user(&headers)?;
    db.schedule = Some(input.clone());
    Ok(Json(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn session_token_is_read_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; budget_session=abc-123; other=1"),
        );
        assert_eq!(session_token(&headers), Some("abc-123"));
    }

    #[test]
    fn missing_cookie_has_no_session() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(session_token(&headers), None);
        assert_eq!(session_token(&HeaderMap::new()), None);
    }

    #[test]
    fn failure_body_carries_extra_fields() {
        let failure = ApiFailure::coded(StatusCode::LOCKED, "account_locked", "Account locked")
            .with("locked_until", json!(LOCKED_UNTIL));
        assert_eq!(failure.status, StatusCode::LOCKED);
        assert_eq!(
            failure.body,
            json!({ "error": "account_locked", "message": "Account locked", "locked_until": LOCKED_UNTIL })
        );
    }

    #[test]
    fn seeded_db_has_locked_user_and_no_yen() {
        let db = Db::seeded();
        assert!(db.users.get(LOCKED_EMAIL).is_some_and(|u| u.locked));
        assert!(db.currencies.iter().all(|c| c.currency != "JPY"));
    }

    #[test]
    fn sessions_map_tokens_to_users() {
        let mut db = Db::seeded();
        let cookie = db.start_session(LOCKED_EMAIL);
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(&cookie).unwrap());
        assert_eq!(db.current_user(&headers).unwrap().user.email, LOCKED_EMAIL);
    }
}
