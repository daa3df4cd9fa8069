use super::AppState;
use actix_web::{web, HttpResponse, Responder};
use shared_types::{DiagnosticsResponse, StatusMessage};
use tracing::warn;

const MAX_REPORTED_COLLECTIONS: usize = 10;
const MAX_ERROR_CHARS: usize = 50;

pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(StatusMessage::new("AI Business Consultant Backend Running"))
}

pub async fn hello() -> impl Responder {
    HttpResponse::Ok().json(StatusMessage::new("Hello from the backend API!"))
}

/// Reports store connectivity. Never fails: store errors end up in the
/// `database` status string.
pub async fn diagnostics(data: web::Data<AppState>) -> impl Responder {
    let store = data.store.as_ref();
    let database_url = if data.config.database.path.as_os_str().is_empty() {
        "❌ Not Set"
    } else {
        "✅ Set"
    };
    let mut response = DiagnosticsResponse {
        database: "✅ Available".to_string(),
        database_url: database_url.to_string(),
        database_name: if store.name().is_empty() {
            "✅ Connected".to_string()
        } else {
            store.name().to_string()
        },
        connection_status: "Connected".to_string(),
        ..DiagnosticsResponse::default()
    };

    match store.list_collection_names().await {
        Ok(names) => {
            response.collections = names.into_iter().take(MAX_REPORTED_COLLECTIONS).collect();
            response.database = "✅ Connected & Working".to_string();
        }
        Err(e) => {
            warn!(error = %e, "Store diagnostics failed");
            let detail: String = e.to_string().chars().take(MAX_ERROR_CHARS).collect();
            response.database = format!("⚠️ Connected but Error: {}", detail);
        }
    }

    HttpResponse::Ok().json(response)
}
