use sqlx::SqliteConnection;
use tracing::{Instrument, instrument};

use crate::model::{
    apperror::{ApplicationError, ErrorType},
    models::{PrecipitationDetailType, PrecipitationListOutputType, StationListOutputType, TemperatureObservationDetailType, TemperatureObservationListOutputType, TemperatureStatsInputType},
};

/**
 * Database response type for querying the precipitation list.
 */
pub type QueryPrecipitationDbResp = (String, Option<f64>);

/**
 * Database response type for querying station names.
 */
pub type QueryStationNameDbResp = (String,);

/**
 * Database response type for querying the station activity ranking.
 */
pub type QueryStationActivityDbResp = (String, i64);

/**
 * Database response type for querying temperature observations.
 */
pub type QueryStationObservationDbResp = (String, String, f64);

/**
 * Database response type for querying temperature statistics.
 */
pub type QueryTemperatureStatsDbResp = (Option<f64>, Option<f64>, Option<f64>);

/**
 * SQL query to retrieve all precipitation readings ordered by date.
 */
const QUERY_PRECIPITATION_LIST: &str = "SELECT date, prcp FROM measurement ORDER BY date ASC";

/**
 * SQL query to retrieve all station names in store order.
 */
const QUERY_STATION_NAMES: &str = "SELECT name FROM station";

/**
 * SQL query to retrieve the most recent measurement date.
 */
const QUERY_MOST_RECENT_DATE: &str = "SELECT MAX(date) FROM measurement";

/**
 * SQL query to rank stations by measurement count. Ties are broken by the
 * lowest station code so the ranking is deterministic.
 */
const QUERY_STATION_ACTIVITY: &str = "SELECT station, COUNT(*) FROM measurement GROUP BY station ORDER BY COUNT(*) DESC, station ASC";

/**
 * SQL query to retrieve the observations of a station strictly after a
 * cutoff date.
 */
const QUERY_STATION_OBSERVATIONS: &str = "SELECT station, date, tobs FROM measurement WHERE date > $1 AND station = $2";

/**
 * SQL query to retrieve temperature statistics from a start date.
 */
const QUERY_TEMPERATURE_STATS_FROM_START: &str = "SELECT MIN(tobs), AVG(tobs), MAX(tobs) FROM measurement WHERE date >= $1";

/**
 * SQL query to retrieve temperature statistics for an inclusive date range.
 */
const QUERY_TEMPERATURE_STATS_RANGE: &str = "SELECT MIN(tobs), AVG(tobs), MAX(tobs) FROM measurement WHERE date >= $1 AND date <= $2";

/**
 * DAO for climate-related database operations.
 */
pub struct ClimateDao {}

impl ClimateDao {
    /**
     * Creates a new instance of `ClimateDao`.
     *
     * # Returns
     * A new instance of `ClimateDao`.
     */
    pub fn new() -> Self {
        ClimateDao {}
    }

    /**
     * Retrieves all precipitation readings ordered by date ascending.
     *
     * # Arguments
     * `connection`: The database connection.
     *
     * # Returns
     * A Result containing `PrecipitationListOutputType` or an `ApplicationError`.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_precipitation_list(&self, connection: &mut SqliteConnection) -> Result<PrecipitationListOutputType, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryPrecipitationDbResp> = sqlx::query_as(QUERY_PRECIPITATION_LIST)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get precipitation list: {err}")))?;
        let readings: Vec<PrecipitationDetailType> = results.into_iter().map(PrecipitationDetailType::from).collect();
        Ok(PrecipitationListOutputType::new(readings))
    }

    /**
     * Retrieves all station names in the store's natural order.
     *
     * # Arguments
     * `connection`: The database connection.
     *
     * # Returns
     * A Result containing `StationListOutputType` or an `ApplicationError`.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_station_names(&self, connection: &mut SqliteConnection) -> Result<StationListOutputType, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryStationNameDbResp> = sqlx::query_as(QUERY_STATION_NAMES)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get station names: {err}")))?;
        let names: Vec<String> = results.into_iter().map(|row| row.0).collect();
        Ok(StationListOutputType::new(names))
    }

    /**
     * Retrieves the most recent measurement date. `MAX` over an empty table
     * yields a null, which is returned as `None`.
     *
     * # Arguments
     * `connection`: The database connection.
     *
     * # Returns
     * A Result containing the most recent date string or an `ApplicationError`.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_most_recent_date(&self, connection: &mut SqliteConnection) -> Result<Option<String>, ApplicationError> {
        let span = tracing::Span::current();
        let result: (Option<String>,) = sqlx::query_as(QUERY_MOST_RECENT_DATE)
            .fetch_one(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get most recent date: {err}")))?;
        Ok(result.0)
    }

    /**
     * Retrieves the station activity ranking, most measurements first.
     *
     * # Arguments
     * `connection`: The database connection.
     *
     * # Returns
     * A Result containing the ranked station codes with their measurement
     * counts or an `ApplicationError`.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_station_activity(&self, connection: &mut SqliteConnection) -> Result<Vec<QueryStationActivityDbResp>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryStationActivityDbResp> = sqlx::query_as(QUERY_STATION_ACTIVITY)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get station activity: {err}")))?;
        Ok(results)
    }

    /**
     * Retrieves the temperature observations of a station strictly after the
     * cutoff date, in store row order.
     *
     * # Arguments
     * `connection`: The database connection.
     * `cutoff_date`: Exclusive lower bound for the observation dates.
     * `station`: The station code to filter on.
     *
     * # Returns
     * A Result containing `TemperatureObservationListOutputType` or an `ApplicationError`.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_station_observations(&self, connection: &mut SqliteConnection, cutoff_date: &str, station: &str) -> Result<TemperatureObservationListOutputType, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryStationObservationDbResp> = sqlx::query_as(QUERY_STATION_OBSERVATIONS)
            .bind(cutoff_date)
            .bind(station)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get station observations: {err}")))?;
        let observations: Vec<TemperatureObservationDetailType> = results.into_iter().map(TemperatureObservationDetailType::from).collect();
        Ok(TemperatureObservationListOutputType::new(observations))
    }

    /**
     * Retrieves the minimum, average and maximum temperature for a date
     * range. The range bounds are inclusive; the end bound is only applied
     * when present. All aggregates are null when no rows match.
     *
     * # Arguments
     * `connection`: The database connection.
     * `stats_input`: The date range to aggregate over.
     *
     * # Returns
     * A Result containing the raw (min, avg, max) aggregates or an `ApplicationError`.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_temperature_stats(&self, connection: &mut SqliteConnection, stats_input: &TemperatureStatsInputType) -> Result<QueryTemperatureStatsDbResp, ApplicationError> {
        let span = tracing::Span::current();
        let query = match &stats_input.end {
            Some(end) => sqlx::query_as(QUERY_TEMPERATURE_STATS_RANGE).bind(&stats_input.start).bind(end),
            None => sqlx::query_as(QUERY_TEMPERATURE_STATS_FROM_START).bind(&stats_input.start),
        };
        let result: QueryTemperatureStatsDbResp = query
            .fetch_one(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get temperature stats: {err}")))?;
        Ok(result)
    }
}
