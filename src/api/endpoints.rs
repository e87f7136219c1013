use actix_web::{
    HttpRequest, HttpResponse, get,
    web::{self, Path},
};
use tracing::{Instrument, instrument};

use crate::{
    api::{
        rest::{PrecipitationListResponse, StationListResponse, TemperatureObservationListResponse, TemperatureStatsResponse},
        state::AppState,
    },
    model::{apperror::ApplicationError, models::TemperatureStatsInputType},
};

/**
 * Plain text listing of the available API routes.
 */
const ROUTE_LISTING: &str = "Available Routes:
/api/v1.0/precipitation
/api/v1.0/stations
/api/v1.0/tobs
/api/v1.0/<start> (YYYY-MM-DD)
/api/v1.0/<start>/<end> (YYYY-MM-DD/YYYY-MM-DD)
";

/**
 * Endpoint listing the available routes.
 */
#[get("/")]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain; charset=utf-8").body(ROUTE_LISTING)
}

/**
 * Endpoint to retrieve all precipitation readings ordered by date.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "listPrecipitation", trace_id = get_trace_id(&http_request), result))]
#[get("/api/v1.0/precipitation")]
pub async fn precipitation_list(http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let output_values = app_state.climate_service.get_precipitation_list().instrument(span).await?;
    Ok(HttpResponse::Ok().json(PrecipitationListResponse::from(output_values)))
}

/**
 * Endpoint to retrieve the station names.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "listStations", trace_id = get_trace_id(&http_request), result))]
#[get("/api/v1.0/stations")]
pub async fn station_list(http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let output_values = app_state.climate_service.get_station_list().instrument(span).await?;
    Ok(HttpResponse::Ok().json(StationListResponse::from(output_values)))
}

/**
 * Endpoint to retrieve the temperature observations of the most-active
 * station over the trailing observation window.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "listTemperatureObservations", trace_id = get_trace_id(&http_request), result))]
#[get("/api/v1.0/tobs")]
pub async fn temperature_observation_list(http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let output_values = app_state.climate_service.get_recent_temperature_observations().instrument(span).await?;
    Ok(HttpResponse::Ok().json(TemperatureObservationListResponse::from(output_values)))
}

/**
 * Endpoint to retrieve temperature statistics from a start date onward.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "temperatureStatsStart", trace_id = get_trace_id(&http_request), result))]
#[get("/api/v1.0/{start}")]
pub async fn temperature_stats_start(path: Path<String>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let start = path.into_inner();
    let stats_input = TemperatureStatsInputType::new(start, None);
    let output_values = app_state.climate_service.get_temperature_stats(stats_input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(TemperatureStatsResponse::from(output_values)))
}

/**
 * Endpoint to retrieve temperature statistics for an inclusive date range.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "temperatureStatsRange", trace_id = get_trace_id(&http_request), result))]
#[get("/api/v1.0/{start}/{end}")]
pub async fn temperature_stats_range(path: Path<(String, String)>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let (start, end) = path.into_inner();
    let stats_input = TemperatureStatsInputType::new(start, Some(end));
    let output_values = app_state.climate_service.get_temperature_stats(stats_input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(TemperatureStatsResponse::from(output_values)))
}

/**
 * Retrieves the trace ID from the HTTP request headers.
 * If the trace ID is not present, a new UUID is generated.
 */
fn get_trace_id(http_request: &HttpRequest) -> String {
    http_request.headers().get("X-Trace-ID")
        .and_then(|v| v.to_str().ok().map(std::string::ToString::to_string))
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}
