use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;

use crate::model::{
    apperror::{ApplicationError, ErrorType},
    models::{PrecipitationDetailType, PrecipitationListOutputType, StationListOutputType, TemperatureObservationDetailType, TemperatureObservationListOutputType, TemperatureStatsOutputType},
};

/***************** Precipitation models *********************/

/**
 * Response structure for the precipitation listing. Serializes as a bare
 * JSON array, one record per measurement row.
 */
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct PrecipitationListResponse(Vec<PrecipitationElement>);

impl From<PrecipitationListOutputType> for PrecipitationListResponse {
    fn from(output: PrecipitationListOutputType) -> Self {
        PrecipitationListResponse(output.readings.into_iter().map(PrecipitationElement::from).collect())
    }
}

/**
 * One precipitation record. Field order is the JSON key order.
 */
#[derive(Debug, Serialize)]
pub struct PrecipitationElement {
    date: String,
    precipitation: Option<f64>,
}

impl From<PrecipitationDetailType> for PrecipitationElement {
    fn from(reading: PrecipitationDetailType) -> Self {
        PrecipitationElement { date: reading.date, precipitation: reading.precipitation }
    }
}

/***************** Station models *********************/

/**
 * Response structure for the station listing. A flat array of station
 * names.
 */
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct StationListResponse(Vec<String>);

impl From<StationListOutputType> for StationListResponse {
    fn from(output: StationListOutputType) -> Self {
        StationListResponse(output.names)
    }
}

/***************** Temperature observation models *********************/

/**
 * Response structure for the temperature observation listing.
 */
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct TemperatureObservationListResponse(Vec<TemperatureObservationElement>);

impl From<TemperatureObservationListOutputType> for TemperatureObservationListResponse {
    fn from(output: TemperatureObservationListOutputType) -> Self {
        TemperatureObservationListResponse(output.observations.into_iter().map(TemperatureObservationElement::from).collect())
    }
}

/**
 * One temperature observation record. Field order is the JSON key order.
 */
#[derive(Debug, Serialize)]
pub struct TemperatureObservationElement {
    #[serde(rename = "Station")]
    station: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Temperature")]
    temperature: i64,
}

impl From<TemperatureObservationDetailType> for TemperatureObservationElement {
    fn from(observation: TemperatureObservationDetailType) -> Self {
        TemperatureObservationElement { station: observation.station, date: observation.date, temperature: observation.temperature }
    }
}

/***************** Temperature statistics models *********************/

/**
 * Response structure for the temperature statistics. A single-element
 * array wrapping one statistics record.
 */
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct TemperatureStatsResponse(Vec<TemperatureStatsElement>);

impl From<TemperatureStatsOutputType> for TemperatureStatsResponse {
    fn from(output: TemperatureStatsOutputType) -> Self {
        TemperatureStatsResponse(vec![TemperatureStatsElement::from(output)])
    }
}

/**
 * Temperature statistics record. The end date key is omitted entirely when
 * no end bound was requested; the aggregates serialize as null when no
 * rows matched.
 */
#[derive(Debug, Serialize)]
pub struct TemperatureStatsElement {
    #[serde(rename = "Start date")]
    start_date: String,
    #[serde(rename = "End date", skip_serializing_if = "Option::is_none")]
    end_date: Option<String>,
    #[serde(rename = "Minimum temperature")]
    minimum_temperature: Option<f64>,
    #[serde(rename = "Average temperature")]
    average_temperature: Option<f64>,
    #[serde(rename = "Maximum temperature")]
    maximum_temperature: Option<f64>,
}

impl From<TemperatureStatsOutputType> for TemperatureStatsElement {
    fn from(output: TemperatureStatsOutputType) -> Self {
        TemperatureStatsElement { start_date: output.start, end_date: output.end, minimum_temperature: output.minimum, average_temperature: output.average, maximum_temperature: output.maximum }
    }
}

/***************** Error models *********************/

/**
 * Custom error response for the application.
 */
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /**
     * The error code associated with the error type.
     */
    pub code: u16,
    /**
     * A human-readable message describing the error.
     */
    pub message: String,
}

impl ResponseError for ApplicationError {
    /**
     * Generates an error response for the application error.
     */
    fn error_response(&self) -> HttpResponse {
        let error_response = ErrorResponse { code: get_error_code(&self.error_type), message: self.message.clone() };
        HttpResponse::build(get_statuscode(&self.error_type)).json(&error_response)
    }
}

/**
* Maps application errors to HTTP status codes.
*
* # Arguments
* `application_error`: The type of error that occurred.
*
* # Returns
* The corresponding HTTP status code.
*/
fn get_statuscode(application_error: &ErrorType) -> StatusCode {
    match application_error {
        ErrorType::Initialization => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorType::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorType::Format => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorType::NotFound => StatusCode::NOT_FOUND,
    }
}

/**
 * Maps application errors to error codes.
 *
 * # Arguments
 * `application_error`: The type of error that occurred.
 *
 * # Returns
 * The corresponding error code.
 */
fn get_error_code(application_error: &ErrorType) -> u16 {
    match application_error {
        ErrorType::Initialization => 1001,
        ErrorType::DatabaseError => 1003,
        ErrorType::Format => 1004,
        ErrorType::NotFound => 1005,
    }
}
