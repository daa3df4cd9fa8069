use super::{
    decode, find_consultation, find_inserted, parse_consultation_id, AppState,
    MESSAGE_COLLECTION,
};
use crate::advisor::{generate_advice, ConsultationMeta};
use crate::error::AppError;
use crate::storage::{Document, Filter, StoreValue};
use actix_web::{web, HttpResponse, Result};
use shared_types::{Message, MessageRole, SendMessageRequest, DEFAULT_STAGE};
use tracing::info;

pub const MESSAGE_LIST_LIMIT: usize = 200;

fn message_document(consultation_id: &str, role: MessageRole, content: String) -> Document {
    let mut doc = Document::new();
    doc.insert("consultation_id".to_string(), consultation_id.into());
    doc.insert("role".to_string(), role.as_str().into());
    doc.insert("content".to_string(), content.into());
    doc
}

/// Rebuilds advisor input from a stored consultation. Missing or non-text
/// fields fall back to empty strings and the default stage.
fn consultation_meta(doc: &Document) -> ConsultationMeta {
    let text = |field: &str| doc.get(field).and_then(StoreValue::as_str).map(str::to_string);

    ConsultationMeta {
        business_name: text("business_name").unwrap_or_default(),
        industry: text("industry").unwrap_or_default(),
        stage: text("stage").unwrap_or_else(|| DEFAULT_STAGE.to_string()),
        goal: text("goal").unwrap_or_default(),
        notes: text("notes"),
    }
}

pub async fn list_messages(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let consultation_id = parse_consultation_id(&path)?;
    let store = data.store.as_ref();
    find_consultation(store, consultation_id).await?;

    let filter = Filter::all().eq("consultation_id", consultation_id.to_string());
    let docs = store
        .find_many(MESSAGE_COLLECTION, &filter, MESSAGE_LIST_LIMIT)
        .await?;

    let messages = docs
        .iter()
        .map(decode)
        .collect::<Result<Vec<Message>, _>>()?;

    info!(
        consultation_id = %consultation_id,
        count = messages.len(),
        "Listed messages"
    );
    Ok(HttpResponse::Ok().json(messages))
}

/// Stores the user's message, then the advisor's reply, and returns the reply.
pub async fn send_message(
    data: web::Data<AppState>,
    path: web::Path<String>,
    request: web::Json<SendMessageRequest>,
) -> Result<HttpResponse, AppError> {
    let req = request.into_inner();
    req.validate().map_err(AppError::InvalidRequest)?;

    let consultation_id = parse_consultation_id(&path)?;
    let store = data.store.as_ref();
    let consultation = find_consultation(store, consultation_id).await?;
    let consultation_key = consultation_id.to_string();

    let reply = generate_advice(&req.content, &consultation_meta(&consultation));

    store
        .insert_one(
            MESSAGE_COLLECTION,
            message_document(&consultation_key, MessageRole::User, req.content),
        )
        .await?;
    let reply_id = store
        .insert_one(
            MESSAGE_COLLECTION,
            message_document(&consultation_key, MessageRole::Assistant, reply),
        )
        .await?;

    let saved = find_inserted(store, MESSAGE_COLLECTION, reply_id).await?;
    let message: Message = decode(&saved)?;

    info!(
        consultation_id = %consultation_key,
        message_id = %message.id,
        "Stored advisor reply"
    );
    Ok(HttpResponse::Created().json(message))
}
