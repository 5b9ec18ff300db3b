//! End-to-end flows against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the typed API
//! functions over real HTTP through `UreqTransport`. The agent's cookie jar
//! carries the session, so these tests also cover the credential handling
//! and the 401 teardown with real responses.

use std::net::SocketAddr;
use std::sync::Arc;

use piggy_core::api::pagination::PageParams;
use piggy_core::api::{accounts, auth, budgets, categories, currency, transactions, two_factor, vendors};
use piggy_core::session::{LOGIN_ROUTE, USER_STORAGE_KEY};
use piggy_core::types::{
    AccountRequest, AccountType, BudgetPeriodRequest, CategoryRequest, CategoryType, LoginRequest, RegisterRequest,
    TransactionDraft, VendorRequest,
};
use piggy_core::{ApiClient, ApiConfig, DomainError, MemoryNavigator, MemoryStore, SessionHooks, UreqTransport};

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

struct Harness {
    client: ApiClient<UreqTransport>,
    store: Arc<MemoryStore>,
    navigator: Arc<MemoryNavigator>,
}

fn harness(addr: SocketAddr) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let navigator = Arc::new(MemoryNavigator::at("/dashboard"));
    let config = ApiConfig::from_parts(None, Some(&format!("http://{addr}/api/v1")));
    let client = ApiClient::new(config, UreqTransport::new()).with_session(SessionHooks::new(
        store.clone(),
        store.clone(),
        navigator.clone(),
    ));
    Harness {
        client,
        store,
        navigator,
    }
}

fn registration(email: &str) -> RegisterRequest {
    RegisterRequest {
        name: "John Doe".to_string(),
        email: email.to_string(),
        password: "password123".to_string(),
    }
}

#[test]
fn budgeting_flow() {
    let addr = start_server();
    let h = harness(addr);
    let client = &h.client;

    // Register; the session cookie is set by the server.
    auth::register(client, &registration("flow@example.com")).unwrap();
    let me = auth::fetch_current_user(client).unwrap();
    assert_eq!(me.email, "flow@example.com");

    // Currencies: JPY is unknown to the server and skipped.
    let codes: Vec<String> = currency::fetch_currencies(client).into_iter().map(|c| c.currency).collect();
    assert_eq!(codes, vec!["EUR", "USD", "GBP"]);

    let account = accounts::create_account(
        client,
        &AccountRequest {
            name: "Checking".to_string(),
            color: "#0088cc".to_string(),
            icon: "bank".to_string(),
            account_type: AccountType::Checking,
            currency: "EUR".to_string(),
            balance: 100_000,
            spend_limit: None,
        },
    )
    .unwrap();
    assert_eq!(account.currency.currency, "EUR");
    assert_eq!(accounts::fetch_accounts(client).unwrap(), vec![account.clone()]);
    assert_eq!(accounts::fetch_account(client, &account.id).unwrap(), account);

    let category = categories::create_category(
        client,
        &CategoryRequest {
            name: "Groceries".to_string(),
            color: "#2f9e44".to_string(),
            icon: "cart".to_string(),
            parent_id: None,
            category_type: CategoryType::Outgoing,
        },
    )
    .unwrap();

    let vendor = vendors::create_vendor(client, &VendorRequest { name: "Corner Shop".to_string() }).unwrap();

    for n in 1..=3 {
        let draft = TransactionDraft {
            description: format!("Purchase {n}"),
            amount: 1_000 * n,
            occurred_at: "2026-03-01".to_string(),
            category: Some(category.clone()),
            from_account: Some(account.clone()),
            vendor: Some(vendor.clone()),
            ..TransactionDraft::default()
        };
        let created = transactions::create_transaction(client, &draft).unwrap();
        assert_eq!(created.vendor.as_ref().map(|v| v.name.as_str()), Some("Corner Shop"));
    }

    // Page through two at a time.
    let first = transactions::fetch_transactions_page(
        client,
        &PageParams {
            page_size: 2,
            ..PageParams::default()
        },
    )
    .unwrap();
    assert_eq!(first.transactions.len(), 2);
    let cursor = first.next_cursor.clone().expect("a second page");
    let second = transactions::fetch_transactions_page(
        client,
        &PageParams {
            page_size: 2,
            cursor: Some(&cursor),
            ..PageParams::default()
        },
    )
    .unwrap();
    assert_eq!(second.transactions.len(), 1);
    assert_eq!(second.next_cursor, None);
    assert_eq!(transactions::fetch_transactions(client, None).unwrap().len(), 3);

    // A vendor in use cannot be deleted.
    let vendor_id = vendor.id.clone().unwrap();
    let err = vendors::delete_vendor(client, &vendor_id).unwrap_err();
    let api = err.as_api().unwrap();
    assert_eq!(api.status, 409);
    assert_eq!(api.error_code(), Some("VENDOR_IN_USE"));
    assert_eq!(api.url, format!("/api/vendors/{vendor_id}"));

    // Empty vendor names are a validation error.
    let err = vendors::create_vendor(client, &VendorRequest { name: String::new() }).unwrap_err();
    assert!(err.as_api().unwrap().is_validation_error());

    // Budget periods: id comes back as plain text; no schedule yet.
    let period_id = budgets::create_period(
        client,
        &BudgetPeriodRequest {
            name: "March".to_string(),
            start_date: "2026-03-01".to_string(),
            end_date: "2026-03-31".to_string(),
        },
    )
    .unwrap();
    assert_eq!(budgets::fetch_current_period(client).unwrap().id, period_id);
    assert_eq!(budgets::fetch_schedule(client).unwrap(), None);

    // Two-factor disable is a DELETE carrying a JSON body.
    two_factor::verify(client, mock_server::TWO_FACTOR_CODE).unwrap();
    assert!(two_factor::status(client).unwrap().enabled);
    two_factor::disable(client, "password123", mock_server::TWO_FACTOR_CODE).unwrap();
    assert!(!two_factor::status(client).unwrap().enabled);

    // None of this should have touched the host session.
    assert!(h.navigator.assigned().is_empty());
}

#[test]
fn expired_session_clears_storage_and_redirects() {
    let addr = start_server();
    let h = harness(addr);
    h.store.set(USER_STORAGE_KEY, r#"{"id":"stale"}"#);

    let err = auth::fetch_current_user(&h.client).unwrap_err();

    let api = err.as_api().unwrap();
    assert!(api.is_unauthorized());
    assert_eq!(api.url, "/api/users/me");
    assert_eq!(h.store.get(USER_STORAGE_KEY), None);
    assert_eq!(h.navigator.assigned(), vec![LOGIN_ROUTE.to_string()]);

    // Already on the login page: storage is cleared again, no second redirect.
    h.store.set(USER_STORAGE_KEY, "again");
    accounts::fetch_accounts(&h.client).unwrap_err();
    assert_eq!(h.store.get(USER_STORAGE_KEY), None);
    assert_eq!(h.navigator.assigned().len(), 1);
}

#[test]
fn logout_drops_the_session() {
    let addr = start_server();
    let h = harness(addr);

    auth::register(&h.client, &registration("logout@example.com")).unwrap();
    assert!(auth::fetch_current_user(&h.client).is_ok());

    auth::logout(&h.client);

    assert!(auth::fetch_current_user(&h.client).unwrap_err().as_api().unwrap().is_unauthorized());
}

#[test]
fn login_failures_map_to_domain_errors() {
    let addr = start_server();
    let h = harness(addr);
    auth::register(&h.client, &registration("john@example.com")).unwrap();

    // Locked account.
    let locked = auth::login(
        &h.client,
        &LoginRequest {
            email: mock_server::LOCKED_EMAIL.to_string(),
            password: "password123".to_string(),
        },
    )
    .unwrap_err();
    match locked {
        DomainError::AccountLocked(err) => assert_eq!(err.locked_until, mock_server::LOCKED_UNTIL),
        other => panic!("expected account locked, got {other:?}"),
    }

    // Wrong password until throttled.
    let wrong = LoginRequest {
        email: "john@example.com".to_string(),
        password: "wrong-password".to_string(),
    };
    for _ in 0..mock_server::MAX_FAILED_LOGINS {
        assert_eq!(
            auth::login(&h.client, &wrong).unwrap_err(),
            DomainError::failed(auth::INVALID_CREDENTIALS_MESSAGE)
        );
    }
    match auth::login(&h.client, &wrong).unwrap_err() {
        DomainError::RateLimited(err) => assert_eq!(err.retry_after_seconds, mock_server::RETRY_AFTER_SECONDS),
        other => panic!("expected rate limit, got {other:?}"),
    }

    // A 401 from the login endpoint never redirects.
    assert!(h.navigator.assigned().is_empty());
}

#[test]
fn unreachable_server_is_a_transport_error() {
    // Bind then drop to get a port with nothing listening.
    let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let h = harness(addr);

    let err = auth::login(
        &h.client,
        &LoginRequest {
            email: "john@example.com".to_string(),
            password: "password123".to_string(),
        },
    )
    .unwrap_err();

    assert_eq!(err, DomainError::failed(piggy_core::api::CONNECTION_MESSAGE));
    assert!(h.navigator.assigned().is_empty());
}
