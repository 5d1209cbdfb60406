//! JSON REST handlers for crop plantings.
//!
//! A planting that does not fit in its farm's cultivable area for the
//! harvest is answered with `400` and `"kind": "capacity"`.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use farmledger_app::ports::{
    CropRepository, FarmRepository, HarvestRepository, PlantingFilter, PlantingRepository,
    ProducerRepository,
};
use farmledger_domain::error::ValidationError;
use farmledger_domain::id::{CropId, FarmId, HarvestId, PlantingId};
use farmledger_domain::page::{Page, PageRequest};
use farmledger_domain::planting::{CropPlanting, PlantingPatch};

use super::parse_opt;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a planting. `area` is in hectares.
#[derive(Deserialize)]
pub struct CreatePlantingRequest {
    pub farm_id: String,
    pub crop_id: String,
    pub harvest_id: String,
    pub area: f64,
}

/// Query parameters for `GET /api/plantings`.
#[derive(Debug, Default, Deserialize)]
pub struct ListPlantingsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub farm_id: Option<String>,
    pub crop_id: Option<String>,
    pub harvest_id: Option<String>,
}

impl ListPlantingsQuery {
    fn into_parts(self) -> Result<(PlantingFilter, PageRequest), ValidationError> {
        let filter = PlantingFilter {
            farm_id: parse_opt(self.farm_id.as_deref(), FarmId::parse)?,
            crop_id: parse_opt(self.crop_id.as_deref(), CropId::parse)?,
            harvest_id: parse_opt(self.harvest_id.as_deref(), HarvestId::parse)?,
        };
        Ok((filter, PageRequest::new(self.page, self.limit)?))
    }
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Page<CropPlanting>>),
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
    Ok(Json<CropPlanting>),
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
    Created(Json<CropPlanting>),
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

/// `GET /api/plantings`
pub async fn list<PR, FR, CR, HR, PLR>(
    State(state): State<AppState<PR, FR, CR, HR, PLR>>,
    Query(query): Query<ListPlantingsQuery>,
) -> Result<ListResponse, ApiError>
where
    PR: ProducerRepository + Send + Sync + 'static,
    FR: FarmRepository + Send + Sync + 'static,
    CR: CropRepository + Send + Sync + 'static,
    HR: HarvestRepository + Send + Sync + 'static,
    PLR: PlantingRepository + Send + Sync + 'static,
{
    let (filter, page) = query.into_parts()?;
    let plantings = state.planting_service.list_plantings(filter, page).await?;
    Ok(ListResponse::Ok(Json(plantings)))
}

/// `GET /api/plantings/{id}`
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
    let planting = state
        .planting_service
        .get_planting(PlantingId::parse(&id)?)
        .await?;
    Ok(GetResponse::Ok(Json(planting)))
}

/// `POST /api/plantings`
pub async fn create<PR, FR, CR, HR, PLR>(
    State(state): State<AppState<PR, FR, CR, HR, PLR>>,
    Json(req): Json<CreatePlantingRequest>,
) -> Result<CreateResponse, ApiError>
where
    PR: ProducerRepository + Send + Sync + 'static,
    FR: FarmRepository + Send + Sync + 'static,
    CR: CropRepository + Send + Sync + 'static,
    HR: HarvestRepository + Send + Sync + 'static,
    PLR: PlantingRepository + Send + Sync + 'static,
{
    let planting = CropPlanting::new(
        FarmId::parse(&req.farm_id)?,
        CropId::parse(&req.crop_id)?,
        HarvestId::parse(&req.harvest_id)?,
        req.area,
    )?;
    let created = state.planting_service.create_planting(planting).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PATCH /api/plantings/{id}`
pub async fn update<PR, FR, CR, HR, PLR>(
    State(state): State<AppState<PR, FR, CR, HR, PLR>>,
    Path(id): Path<String>,
    Json(patch): Json<PlantingPatch>,
) -> Result<GetResponse, ApiError>
where
    PR: ProducerRepository + Send + Sync + 'static,
    FR: FarmRepository + Send + Sync + 'static,
    CR: CropRepository + Send + Sync + 'static,
    HR: HarvestRepository + Send + Sync + 'static,
    PLR: PlantingRepository + Send + Sync + 'static,
{
    let updated = state
        .planting_service
        .update_planting(PlantingId::parse(&id)?, patch)
        .await?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `DELETE /api/plantings/{id}`
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
        .planting_service
        .delete_planting(PlantingId::parse(&id)?)
        .await?;
    Ok(DeleteResponse::NoContent)
}
