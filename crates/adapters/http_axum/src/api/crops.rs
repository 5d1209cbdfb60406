//! JSON REST handlers for crops.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use farmledger_app::ports::{
    CropRepository, FarmRepository, HarvestRepository, PlantingRepository, ProducerRepository,
};
use farmledger_domain::crop::{Crop, CropPatch};
use farmledger_domain::id::CropId;
use farmledger_domain::page::Page;

use super::PageQuery;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a crop.
#[derive(Deserialize)]
pub struct CreateCropRequest {
    pub name: String,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Page<Crop>>),
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
    Ok(Json<Crop>),
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
    Created(Json<Crop>),
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

/// `GET /api/crops`
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
    let crops = state.crop_service.list_crops(query.request()?).await?;
    Ok(ListResponse::Ok(Json(crops)))
}

/// `GET /api/crops/{id}`
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
    let crop = state.crop_service.get_crop(CropId::parse(&id)?).await?;
    Ok(GetResponse::Ok(Json(crop)))
}

/// `POST /api/crops`
pub async fn create<PR, FR, CR, HR, PLR>(
    State(state): State<AppState<PR, FR, CR, HR, PLR>>,
    Json(req): Json<CreateCropRequest>,
) -> Result<CreateResponse, ApiError>
where
    PR: ProducerRepository + Send + Sync + 'static,
    FR: FarmRepository + Send + Sync + 'static,
    CR: CropRepository + Send + Sync + 'static,
    HR: HarvestRepository + Send + Sync + 'static,
    PLR: PlantingRepository + Send + Sync + 'static,
{
    let created = state.crop_service.create_crop(Crop::new(req.name)?).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PATCH /api/crops/{id}`
pub async fn update<PR, FR, CR, HR, PLR>(
    State(state): State<AppState<PR, FR, CR, HR, PLR>>,
    Path(id): Path<String>,
    Json(patch): Json<CropPatch>,
) -> Result<GetResponse, ApiError>
where
    PR: ProducerRepository + Send + Sync + 'static,
    FR: FarmRepository + Send + Sync + 'static,
    CR: CropRepository + Send + Sync + 'static,
    HR: HarvestRepository + Send + Sync + 'static,
    PLR: PlantingRepository + Send + Sync + 'static,
{
    let updated = state
        .crop_service
        .update_crop(CropId::parse(&id)?, patch)
        .await?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `DELETE /api/crops/{id}`
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
    state.crop_service.delete_crop(CropId::parse(&id)?).await?;
    Ok(DeleteResponse::NoContent)
}
