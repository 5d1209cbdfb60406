//! JSON REST handlers for producers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use farmledger_app::ports::{
    CropRepository, FarmRepository, HarvestRepository, PlantingRepository, ProducerRepository,
};
use farmledger_domain::document::DocumentKind;
use farmledger_domain::id::ProducerId;
use farmledger_domain::page::Page;
use farmledger_domain::producer::{Producer, ProducerPatch};
use farmledger_domain::time::Timestamp;

use super::PageQuery;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a producer.
#[derive(Deserialize)]
pub struct CreateProducerRequest {
    /// CPF or CNPJ, with or without punctuation.
    pub document: String,
    pub name: String,
}

/// A producer as returned by the API.
#[derive(Debug, Serialize)]
pub struct ProducerResponse {
    pub id: ProducerId,
    /// Bare digits.
    pub document: String,
    /// Punctuated form, e.g. `111.444.777-35`.
    pub document_formatted: String,
    pub document_kind: DocumentKind,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Producer> for ProducerResponse {
    fn from(producer: Producer) -> Self {
        Self {
            id: producer.id,
            document: producer.document.as_str().to_string(),
            document_formatted: producer.document.formatted(),
            document_kind: producer.document.kind(),
            name: producer.name,
            created_at: producer.created_at,
            updated_at: producer.updated_at,
        }
    }
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Page<ProducerResponse>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get and update endpoints.
pub enum GetResponse {
    Ok(Json<ProducerResponse>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<ProducerResponse>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/producers`
pub async fn list<PR, FR, CR, HR, PLR>(
    State(state): State<AppState<PR, FR, CR, HR, PLR>>,
    Query(query): Query<PageQuery>,
) -> Result<ListResponse, ApiError>
where
    PR: ProducerRepository + Send + Sync + 'static,
    FR: FarmRepository + Send + Sync + 'static,
    CR: CropRepository + Send + Sync + 'static,
    HR: HarvestRepository + Send + Sync + 'static,
    PLR: PlantingRepository + Send + Sync + 'static,
{
    let page = state
        .producer_service
        .list_producers(query.request()?)
        .await?;
    Ok(ListResponse::Ok(Json(page.map(ProducerResponse::from))))
}

/// `GET /api/producers/{id}`
pub async fn get<PR, FR, CR, HR, PLR>(
    State(state): State<AppState<PR, FR, CR, HR, PLR>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    PR: ProducerRepository + Send + Sync + 'static,
    FR: FarmRepository + Send + Sync + 'static,
    CR: CropRepository + Send + Sync + 'static,
    HR: HarvestRepository + Send + Sync + 'static,
    PLR: PlantingRepository + Send + Sync + 'static,
{
    let producer = state.producer_service.get_producer(ProducerId::parse(&id)?).await?;
    Ok(GetResponse::Ok(Json(producer.into())))
}

/// `POST /api/producers`
pub async fn create<PR, FR, CR, HR, PLR>(
    State(state): State<AppState<PR, FR, CR, HR, PLR>>,
    Json(req): Json<CreateProducerRequest>,
) -> Result<CreateResponse, ApiError>
where
    PR: ProducerRepository + Send + Sync + 'static,
    FR: FarmRepository + Send + Sync + 'static,
    CR: CropRepository + Send + Sync + 'static,
    HR: HarvestRepository + Send + Sync + 'static,
    PLR: PlantingRepository + Send + Sync + 'static,
{
    let producer = Producer::builder()
        .document(req.document)
        .name(req.name)
        .build()?;
    let created = state.producer_service.create_producer(producer).await?;
    Ok(CreateResponse::Created(Json(created.into())))
}

/// `PATCH /api/producers/{id}`
pub async fn update<PR, FR, CR, HR, PLR>(
    State(state): State<AppState<PR, FR, CR, HR, PLR>>,
    Path(id): Path<String>,
    Json(patch): Json<ProducerPatch>,
) -> Result<GetResponse, ApiError>
where
    PR: ProducerRepository + Send + Sync + 'static,
    FR: FarmRepository + Send + Sync + 'static,
    CR: CropRepository + Send + Sync + 'static,
    HR: HarvestRepository + Send + Sync + 'static,
    PLR: PlantingRepository + Send + Sync + 'static,
{
    let updated = state
        .producer_service
        .update_producer(ProducerId::parse(&id)?, patch)
        .await?;
    Ok(GetResponse::Ok(Json(updated.into())))
}

/// `DELETE /api/producers/{id}`
pub async fn delete<PR, FR, CR, HR, PLR>(
    State(state): State<AppState<PR, FR, CR, HR, PLR>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    PR: ProducerRepository + Send + Sync + 'static,
    FR: FarmRepository + Send + Sync + 'static,
    CR: CropRepository + Send + Sync + 'static,
    HR: HarvestRepository + Send + Sync + 'static,
    PLR: PlantingRepository + Send + Sync + 'static,
{
    state.producer_service.delete_producer(ProducerId::parse(&id)?).await?;
    Ok(DeleteResponse::NoContent)
}
