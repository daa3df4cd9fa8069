#![allow(dead_code)]

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{web, App};
use counsel_api::config::ApiConfig;
use counsel_api::handlers::AppState;
use counsel_api::routes::configure_routes;
use counsel_api::storage::{Document, DocumentStore, Filter, SqliteDocumentStore};
use serde_json::{json, Value};
use std::sync::Arc;

pub const TEST_DATABASE_NAME: &str = "counsel_test";

pub struct TestApp<S> {
    pub store: Arc<dyn DocumentStore>,
    pub app: S,
}

pub async fn setup_test_app() -> anyhow::Result<
    TestApp<
        impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    >,
> {
    let store: Arc<dyn DocumentStore> =
        Arc::new(SqliteDocumentStore::open_in_memory(TEST_DATABASE_NAME)?);
    Ok(setup_test_app_with_store(store).await)
}

pub async fn setup_test_app_with_store(
    store: Arc<dyn DocumentStore>,
) -> TestApp<impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>> {
    let state = web::Data::new(AppState::new(store.clone(), ApiConfig::default()));

    let app = test::init_service(
        App::new()
            .app_data(state)
            .configure(configure_routes),
    )
    .await;

    TestApp { store, app }
}

pub fn acme_request() -> Value {
    json!({
        "business_name": "Acme",
        "industry": "retail",
        "goal": "grow sales"
    })
}

/// Creates a consultation through the API and returns the response body.
pub async fn create_consultation<S>(app: &S, body: Value) -> Value
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = TestRequest::post()
        .uri("/api/consultations")
        .set_json(&body)
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    test::read_body_json(resp).await
}

pub async fn send_message<S>(app: &S, consultation_id: &str, content: &str) -> ServiceResponse
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = TestRequest::post()
        .uri(&format!("/api/consultations/{}/messages", consultation_id))
        .set_json(json!({ "content": content }))
        .to_request();
    test::call_service(app, req).await
}

pub async fn get<S>(app: &S, uri: &str) -> ServiceResponse
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = TestRequest::get().uri(uri).to_request();
    test::call_service(app, req).await
}

pub async fn stored_documents(store: &dyn DocumentStore, collection: &str) -> Vec<Document> {
    store
        .find_many(collection, &Filter::all(), usize::MAX)
        .await
        .expect("store query should succeed")
}
