use super::{
    decode, find_consultation, find_inserted, parse_consultation_id, AppState,
    CONSULTATION_COLLECTION,
};
use crate::error::AppError;
use crate::storage::{Document, Filter, StoreValue};
use actix_web::{web, HttpResponse, Result};
use shared_types::{Consultation, CreateConsultationRequest};
use tracing::info;

pub const CONSULTATION_LIST_LIMIT: usize = 50;

fn consultation_document(req: CreateConsultationRequest) -> Document {
    let mut doc = Document::new();
    doc.insert("business_name".to_string(), req.business_name.into());
    doc.insert("industry".to_string(), req.industry.into());
    doc.insert("stage".to_string(), req.stage.into());
    doc.insert("goal".to_string(), req.goal.into());
    doc.insert("notes".to_string(), StoreValue::from(req.notes));
    doc
}

pub async fn create_consultation(
    data: web::Data<AppState>,
    request: web::Json<CreateConsultationRequest>,
) -> Result<HttpResponse, AppError> {
    let req = request.into_inner();
    let store = data.store.as_ref();

    let id = store
        .insert_one(CONSULTATION_COLLECTION, consultation_document(req))
        .await?;
    let saved = find_inserted(store, CONSULTATION_COLLECTION, id).await?;
    let consultation: Consultation = decode(&saved)?;

    info!(
        consultation_id = %consultation.id,
        stage = %consultation.stage,
        "Created consultation"
    );
    Ok(HttpResponse::Created().json(consultation))
}

pub async fn list_consultations(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let docs = data
        .store
        .find_many(CONSULTATION_COLLECTION, &Filter::all(), CONSULTATION_LIST_LIMIT)
        .await?;

    let consultations = docs
        .iter()
        .map(decode)
        .collect::<Result<Vec<Consultation>, _>>()?;

    info!(count = consultations.len(), "Listed consultations");
    Ok(HttpResponse::Ok().json(consultations))
}

pub async fn get_consultation(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_consultation_id(&path)?;
    let doc = find_consultation(data.store.as_ref(), id).await?;
    let consultation: Consultation = decode(&doc)?;
    Ok(HttpResponse::Ok().json(consultation))
}
