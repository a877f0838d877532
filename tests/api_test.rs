mod common;

use reqwest::StatusCode;
use serde_json::json;
use tempfile::TempDir;

use common::setup_db;
use neobank::{AppState, create_app};

async fn spawn_app() -> (String, TempDir) {
    let (dir, pool) = setup_db().await;
    let app = create_app(AppState { db: pool });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), dir)
}

async fn register_and_login(client: &reqwest::Client, base_url: &str, seed: u32) -> String {
    let res = client
        .post(format!("{}/users", base_url))
        .json(&json!({
            "full_name": format!("API User {}", seed),
            "cpf": format!("{:011}", seed),
            "email": format!("api{}@example.com", seed),
            "password": "hunter2",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{}/users/login", base_url))
        .json(&json!({
            "email": format!("api{}@example.com", seed),
            "password": "hunter2",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_reports_connected_database() {
    let (base_url, _dir) = spawn_app().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["db"], "connected");
}

#[tokio::test]
async fn full_banking_flow_over_http() {
    let (base_url, _dir) = spawn_app().await;
    let client = reqwest::Client::new();

    let token = register_and_login(&client, &base_url, 1).await;

    // Open a checking account seeded with 100.
    let res = client
        .post(format!("{}/accounts", base_url))
        .bearer_auth(&token)
        .json(&json!({ "account_type": "checking", "initial_deposit": "100.00" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let account: serde_json::Value = res.json().await.unwrap();
    let account_id = account["id"].as_str().unwrap().to_string();
    assert_eq!(account["balance"], "100.00");
    assert_eq!(account["credit_limit"], "500");

    // Deposit another 50.
    let res = client
        .post(format!("{}/transactions/deposit", base_url))
        .bearer_auth(&token)
        .json(&json!({ "account_id": account_id, "amount": "50.00" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let deposit: serde_json::Value = res.json().await.unwrap();
    assert_eq!(deposit["tx_type"], "deposit");
    assert_eq!(deposit["status"], "completed");

    // Withdraw 30.
    let res = client
        .post(format!("{}/transactions/withdraw", base_url))
        .bearer_auth(&token)
        .json(&json!({ "account_id": account_id, "amount": "30.00" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    // The statement shows the seed deposit plus both movements.
    let res = client
        .get(format!(
            "{}/transactions/statement/{}",
            base_url, account_id
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let statement: serde_json::Value = res.json().await.unwrap();
    assert_eq!(statement["current_balance"], "120.00");
    assert_eq!(statement["transactions"].as_array().unwrap().len(), 3);

    // Account listing reflects the same balance.
    let res = client
        .get(format!("{}/accounts", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let accounts: serde_json::Value = res.json().await.unwrap();
    assert_eq!(accounts.as_array().unwrap().len(), 1);
    assert_eq!(accounts[0]["balance"], "120.00");
}

#[tokio::test]
async fn missing_credentials_are_rejected() {
    let (base_url, _dir) = spawn_app().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/accounts", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/accounts", base_url))
        .bearer_auth("not-a-valid-token")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn foreign_accounts_are_forbidden() {
    let (base_url, _dir) = spawn_app().await;
    let client = reqwest::Client::new();

    let owner_token = register_and_login(&client, &base_url, 1).await;
    let stranger_token = register_and_login(&client, &base_url, 2).await;

    let res = client
        .post(format!("{}/accounts", base_url))
        .bearer_auth(&owner_token)
        .json(&json!({ "account_type": "savings", "initial_deposit": "25.00" }))
        .send()
        .await
        .unwrap();
    let account: serde_json::Value = res.json().await.unwrap();
    let account_id = account["id"].as_str().unwrap();

    let res = client
        .get(format!("{}/accounts/{}", base_url, account_id))
        .bearer_auth(&stranger_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .post(format!("{}/transactions/withdraw", base_url))
        .bearer_auth(&stranger_token)
        .json(&json!({ "account_id": account_id, "amount": "5.00" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn duplicate_identity_is_a_conflict() {
    let (base_url, _dir) = spawn_app().await;
    let client = reqwest::Client::new();

    register_and_login(&client, &base_url, 7).await;

    let res = client
        .post(format!("{}/users", base_url))
        .json(&json!({
            "full_name": "Someone Else",
            "cpf": format!("{:011}", 7),
            "email": "other@example.com",
            "password": "hunter2",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn same_account_transfer_is_a_bad_request() {
    let (base_url, _dir) = spawn_app().await;
    let client = reqwest::Client::new();

    let token = register_and_login(&client, &base_url, 1).await;

    let res = client
        .post(format!("{}/accounts", base_url))
        .bearer_auth(&token)
        .json(&json!({ "account_type": "checking" }))
        .send()
        .await
        .unwrap();
    let account: serde_json::Value = res.json().await.unwrap();
    let account_id = account["id"].as_str().unwrap();

    let res = client
        .post(format!("{}/transactions/transfer", base_url))
        .bearer_auth(&token)
        .json(&json!({
            "from_account_id": account_id,
            "to_account_id": account_id,
            "amount": "10.00",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deactivation_revokes_the_bearer_token() {
    let (base_url, _dir) = spawn_app().await;
    let client = reqwest::Client::new();

    let token = register_and_login(&client, &base_url, 1).await;

    let res = client
        .delete(format!("{}/users/me", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // The same token no longer resolves to a user.
    let res = client
        .get(format!("{}/users/me", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // And the credentials are gone from login too.
    let res = client
        .post(format!("{}/users/login", base_url))
        .json(&json!({ "email": "api1@example.com", "password": "hunter2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_update_over_http() {
    let (base_url, _dir) = spawn_app().await;
    let client = reqwest::Client::new();

    let token = register_and_login(&client, &base_url, 1).await;

    let res = client
        .put(format!("{}/users/me", base_url))
        .bearer_auth(&token)
        .json(&json!({ "full_name": "Renamed Person", "phone": "11999998888" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["full_name"], "Renamed Person");
    assert_eq!(body["phone"], "11999998888");
    assert_eq!(body["email"], "api1@example.com");
}

#[tokio::test]
async fn deposit_accepts_amounts_as_json_numbers() {
    let (base_url, _dir) = spawn_app().await;
    let client = reqwest::Client::new();

    let token = register_and_login(&client, &base_url, 1).await;

    let res = client
        .post(format!("{}/accounts", base_url))
        .bearer_auth(&token)
        .json(&json!({ "account_type": "savings" }))
        .send()
        .await
        .unwrap();
    let account: serde_json::Value = res.json().await.unwrap();
    let account_id = account["id"].as_str().unwrap();

    // 10.10 has no exact f64 form; the boundary snaps it back to cents.
    let res = client
        .post(format!("{}/transactions/deposit", base_url))
        .bearer_auth(&token)
        .json(&json!({ "account_id": account_id, "amount": 10.10 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["amount"], "10.10");

    let res = client
        .get(format!("{}/accounts/{}", base_url, account_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let account: serde_json::Value = res.json().await.unwrap();
    assert_eq!(account["balance"], "10.10");
}
