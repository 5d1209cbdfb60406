//! JSON REST handlers for harvests.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use farmledger_app::ports::{
    CropRepository, FarmRepository, HarvestRepository, PlantingRepository, ProducerRepository,
};
use farmledger_domain::harvest::{Harvest, HarvestPatch};
use farmledger_domain::id::HarvestId;
use farmledger_domain::page::Page;

use super::PageQuery;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a harvest.
#[derive(Deserialize)]
pub struct CreateHarvestRequest {
    pub name: String,
    pub year: i32,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Page<Harvest>>),
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
    Ok(Json<Harvest>),
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
    Created(Json<Harvest>),
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

/// `GET /api/harvests`
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
    let harvests = state.harvest_service.list_harvests(query.request()?).await?;
    Ok(ListResponse::Ok(Json(harvests)))
}

/// `GET /api/harvests/{id}`
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
    let harvest = state
        .harvest_service
        .get_harvest(HarvestId::parse(&id)?)
        .await?;
    Ok(GetResponse::Ok(Json(harvest)))
}

/// `POST /api/harvests`
pub async fn create<PR, FR, CR, HR, PLR>(
    State(state): State<AppState<PR, FR, CR, HR, PLR>>,
    Json(req): Json<CreateHarvestRequest>,
) -> Result<CreateResponse, ApiError>
where
    PR: ProducerRepository + Send + Sync + 'static,
    FR: FarmRepository + Send + Sync + 'static,
    CR: CropRepository + Send + Sync + 'static,
    HR: HarvestRepository + Send + Sync + 'static,
    PLR: PlantingRepository + Send + Sync + 'static,
{
    let harvest = Harvest::new(req.name, req.year)?;
    let created = state.harvest_service.create_harvest(harvest).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PATCH /api/harvests/{id}`
pub async fn update<PR, FR, CR, HR, PLR>(
    State(state): State<AppState<PR, FR, CR, HR, PLR>>,
    Path(id): Path<String>,
    Json(patch): Json<HarvestPatch>,
) -> Result<GetResponse, ApiError>
where
    PR: ProducerRepository + Send + Sync + 'static,
    FR: FarmRepository + Send + Sync + 'static,
    CR: CropRepository + Send + Sync + 'static,
    HR: HarvestRepository + Send + Sync + 'static,
    PLR: PlantingRepository + Send + Sync + 'static,
{
    let updated = state
        .harvest_service
        .update_harvest(HarvestId::parse(&id)?, patch)
        .await?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `DELETE /api/harvests/{id}`
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
    state
        .harvest_service
        .delete_harvest(HarvestId::parse(&id)?)
        .await?;
    Ok(DeleteResponse::NoContent)
}
