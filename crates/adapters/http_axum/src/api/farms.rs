//! JSON REST handlers for farms.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use farmledger_app::ports::{
    CropRepository, FarmFilter, FarmRepository, HarvestRepository, PlantingRepository,
    ProducerRepository,
};
use farmledger_domain::error::ValidationError;
use farmledger_domain::farm::{Farm, FarmPatch};
use farmledger_domain::id::{FarmId, ProducerId};
use farmledger_domain::page::{Page, PageRequest};

use super::parse_opt;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a farm. Areas are in hectares.
#[derive(Deserialize)]
pub struct CreateFarmRequest {
    pub producer_id: String,
    pub name: String,
    pub city: String,
    pub state: String,
    pub total_area: f64,
    pub cultivable_area: f64,
    pub vegetation_area: f64,
}

/// Query parameters for `GET /api/farms`.
#[derive(Debug, Default, Deserialize)]
pub struct ListFarmsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub producer_id: Option<String>,
    pub state: Option<String>,
}

impl ListFarmsQuery {
    fn into_parts(self) -> Result<(FarmFilter, PageRequest), ValidationError> {
        let filter = FarmFilter {
            producer_id: parse_opt(self.producer_id.as_deref(), ProducerId::parse)?,
            state: self.state,
        };
        Ok((filter, PageRequest::new(self.page, self.limit)?))
    }
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Page<Farm>>),
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
    Ok(Json<Farm>),
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
    Created(Json<Farm>),
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

/// `GET /api/farms`
pub async fn list<PR, FR, CR, HR, PLR>(
    State(state): State<AppState<PR, FR, CR, HR, PLR>>,
    Query(query): Query<ListFarmsQuery>,
) -> Result<ListResponse, ApiError>
where
    PR: ProducerRepository + Send + Sync + 'static,
    FR: FarmRepository + Send + Sync + 'static,
    CR: CropRepository + Send + Sync + 'static,
    HR: HarvestRepository + Send + Sync + 'static,
    PLR: PlantingRepository + Send + Sync + 'static,
{
    let (filter, page) = query.into_parts()?;
    let farms = state.farm_service.list_farms(filter, page).await?;
    Ok(ListResponse::Ok(Json(farms)))
}

/// `GET /api/farms/{id}`
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
    let farm = state.farm_service.get_farm(FarmId::parse(&id)?).await?;
    Ok(GetResponse::Ok(Json(farm)))
}

/// `POST /api/farms`
pub async fn create<PR, FR, CR, HR, PLR>(
    State(state): State<AppState<PR, FR, CR, HR, PLR>>,
    Json(req): Json<CreateFarmRequest>,
) -> Result<CreateResponse, ApiError>
where
    PR: ProducerRepository + Send + Sync + 'static,
    FR: FarmRepository + Send + Sync + 'static,
    CR: CropRepository + Send + Sync + 'static,
    HR: HarvestRepository + Send + Sync + 'static,
    PLR: PlantingRepository + Send + Sync + 'static,
{
    let farm = Farm::builder()
        .producer_id(ProducerId::parse(&req.producer_id)?)
        .name(req.name)
        .city(req.city)
        .state(req.state)
        .areas(req.total_area, req.cultivable_area, req.vegetation_area)
        .build()?;
    let created = state.farm_service.create_farm(farm).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PATCH /api/farms/{id}`
pub async fn update<PR, FR, CR, HR, PLR>(
    State(state): State<AppState<PR, FR, CR, HR, PLR>>,
    Path(id): Path<String>,
    Json(patch): Json<FarmPatch>,
) -> Result<GetResponse, ApiError>
where
    PR: ProducerRepository + Send + Sync + 'static,
    FR: FarmRepository + Send + Sync + 'static,
    CR: CropRepository + Send + Sync + 'static,
    HR: HarvestRepository + Send + Sync + 'static,
    PLR: PlantingRepository + Send + Sync + 'static,
{
    let updated = state
        .farm_service
        .update_farm(FarmId::parse(&id)?, patch)
        .await?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `DELETE /api/farms/{id}`
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
    state.farm_service.delete_farm(FarmId::parse(&id)?).await?;
    Ok(DeleteResponse::NoContent)
}
