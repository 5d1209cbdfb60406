//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod crops;
#[allow(clippy::missing_errors_doc)]
pub mod farms;
#[allow(clippy::missing_errors_doc)]
pub mod harvests;
#[allow(clippy::missing_errors_doc)]
pub mod plantings;
#[allow(clippy::missing_errors_doc)]
pub mod producers;

use axum::Router;
use axum::routing::get;
use serde::Deserialize;

use farmledger_app::ports::{
    CropRepository, FarmRepository, HarvestRepository, PlantingRepository, ProducerRepository,
};
use farmledger_domain::error::ValidationError;
use farmledger_domain::page::PageRequest;

use crate::state::AppState;

/// `?page=&limit=` query parameters shared by list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    fn request(&self) -> Result<PageRequest, ValidationError> {
        PageRequest::new(self.page, self.limit)
    }
}

/// Parse an optional id query parameter.
fn parse_opt<T>(
    value: Option<&str>,
    parse: impl Fn(&str) -> Result<T, ValidationError>,
) -> Result<Option<T>, ValidationError> {
    value.map(parse).transpose()
}

/// Build the `/api` sub-router.
pub fn routes<PR, FR, CR, HR, PLR>() -> Router<AppState<PR, FR, CR, HR, PLR>>
where
    PR: ProducerRepository + Send + Sync + 'static,
    FR: FarmRepository + Send + Sync + 'static,
    CR: CropRepository + Send + Sync + 'static,
    HR: HarvestRepository + Send + Sync + 'static,
    PLR: PlantingRepository + Send + Sync + 'static,
{
    Router::new()
        // Producers
        .route(
            "/producers",
            get(producers::list::<PR, FR, CR, HR, PLR>)
                .post(producers::create::<PR, FR, CR, HR, PLR>),
        )
        .route(
            "/producers/{id}",
            get(producers::get::<PR, FR, CR, HR, PLR>)
                .patch(producers::update::<PR, FR, CR, HR, PLR>)
                .delete(producers::delete::<PR, FR, CR, HR, PLR>),
        )
        // Farms
        .route(
            "/farms",
            get(farms::list::<PR, FR, CR, HR, PLR>).post(farms::create::<PR, FR, CR, HR, PLR>),
        )
        .route(
            "/farms/{id}",
            get(farms::get::<PR, FR, CR, HR, PLR>)
                .patch(farms::update::<PR, FR, CR, HR, PLR>)
                .delete(farms::delete::<PR, FR, CR, HR, PLR>),
        )
        // Crops
        .route(
            "/crops",
            get(crops::list::<PR, FR, CR, HR, PLR>).post(crops::create::<PR, FR, CR, HR, PLR>),
        )
        .route(
            "/crops/{id}",
            get(crops::get::<PR, FR, CR, HR, PLR>)
                .patch(crops::update::<PR, FR, CR, HR, PLR>)
                .delete(crops::delete::<PR, FR, CR, HR, PLR>),
        )
        // Harvests
        .route(
            "/harvests",
            get(harvests::list::<PR, FR, CR, HR, PLR>)
                .post(harvests::create::<PR, FR, CR, HR, PLR>),
        )
        .route(
            "/harvests/{id}",
            get(harvests::get::<PR, FR, CR, HR, PLR>)
                .patch(harvests::update::<PR, FR, CR, HR, PLR>)
                .delete(harvests::delete::<PR, FR, CR, HR, PLR>),
        )
        // Plantings
        .route(
            "/plantings",
            get(plantings::list::<PR, FR, CR, HR, PLR>)
                .post(plantings::create::<PR, FR, CR, HR, PLR>),
        )
        .route(
            "/plantings/{id}",
            get(plantings::get::<PR, FR, CR, HR, PLR>)
                .patch(plantings::update::<PR, FR, CR, HR, PLR>)
                .delete(plantings::delete::<PR, FR, CR, HR, PLR>),
        )
}
