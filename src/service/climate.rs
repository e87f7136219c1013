use chrono::{Days, NaiveDate};
use sqlx::{Pool, Sqlite};

use crate::{
    dao::climate::ClimateDao,
    model::{
        apperror::{ApplicationError, ErrorType},
        models::{PrecipitationListOutputType, StationListOutputType, TemperatureObservationListOutputType, TemperatureStatsInputType, TemperatureStatsOutputType},
    },
};

/**
 * Date format used by the measurement table.
 */
const DATE_FORMAT: &str = "%Y-%m-%d";

/**
 * Length of the trailing observation window in days. One year plus one day
 * of leap slack, not 365.
 */
const TRAILING_WINDOW_DAYS: u64 = 366;

/**
 * Represents the service for reading climate observations.
 */
pub struct ClimateService {
    /**
     * The DAO for climate operations.
     */
    climate_dao: ClimateDao,
    /**
     * Optional connection pool for database operations. Optional for test purposes until we have a better way to mock the database.
     */
    connection_pool: Option<Pool<Sqlite>>,
}

impl ClimateService {
    /**
     * Creates a new instance of `ClimateService`.
     *
     * # Arguments
     * `climate_dao`: The DAO for climate operations.
     * `connection_pool`: Optional connection pool for database operations.
     *
     * # Returns
     * A new instance of `ClimateService`.
     */
    pub fn new(climate_dao: ClimateDao, connection_pool: Option<Pool<Sqlite>>) -> Self {
        ClimateService { climate_dao, connection_pool }
    }

    /**
     * Retrieves all precipitation readings ordered by date ascending.
     *
     * # Returns
     * A Result containing `PrecipitationListOutputType` or an `ApplicationError`.
     */
    pub async fn get_precipitation_list(&self) -> Result<PrecipitationListOutputType, ApplicationError> {
        let mut connection = self.acquire_connection().await?;
        self.climate_dao.get_precipitation_list(&mut connection).await
    }

    /**
     * Retrieves all station names in the store's natural order.
     *
     * # Returns
     * A Result containing `StationListOutputType` or an `ApplicationError`.
     */
    pub async fn get_station_list(&self) -> Result<StationListOutputType, ApplicationError> {
        let mut connection = self.acquire_connection().await?;
        self.climate_dao.get_station_names(&mut connection).await
    }

    /**
     * Retrieves the temperature observations of the most-active station for
     * the trailing observation window.
     *
     * Finds the most recent measurement date, derives the cutoff one window
     * length earlier, ranks stations by measurement count and returns the
     * observations of the top station strictly after the cutoff.
     *
     * # Returns
     * A Result containing `TemperatureObservationListOutputType` or an `ApplicationError`.
     */
    pub async fn get_recent_temperature_observations(&self) -> Result<TemperatureObservationListOutputType, ApplicationError> {
        let mut connection = self.acquire_connection().await?;
        let most_recent_date = self
            .climate_dao
            .get_most_recent_date(&mut connection)
            .await?
            .ok_or_else(|| ApplicationError::new(ErrorType::Format, "No measurement dates recorded".to_string()))?;
        let most_recent_date = NaiveDate::parse_from_str(&most_recent_date, DATE_FORMAT)
            .map_err(|err| ApplicationError::new(ErrorType::Format, format!("Failed to parse most recent date '{most_recent_date}': {err}")))?;
        let cutoff_date = most_recent_date
            .checked_sub_days(Days::new(TRAILING_WINDOW_DAYS))
            .ok_or_else(|| ApplicationError::new(ErrorType::Format, format!("Failed to compute cutoff date from {most_recent_date}")))?;
        let station_activity = self.climate_dao.get_station_activity(&mut connection).await?;
        let Some((most_active_station, _)) = station_activity.into_iter().next() else {
            return Err(ApplicationError::new(ErrorType::NotFound, "No stations recorded".to_string()));
        };
        self.climate_dao.get_station_observations(&mut connection, &cutoff_date.format(DATE_FORMAT).to_string(), &most_active_station).await
    }

    /**
     * Retrieves the minimum, average and maximum temperature for a date
     * range, echoing the requested bounds. The average is rounded to one
     * decimal place.
     *
     * # Arguments
     * `stats_input`: The date range to aggregate over.
     *
     * # Returns
     * A Result containing `TemperatureStatsOutputType` or an `ApplicationError`.
     */
    pub async fn get_temperature_stats(&self, stats_input: TemperatureStatsInputType) -> Result<TemperatureStatsOutputType, ApplicationError> {
        let mut connection = self.acquire_connection().await?;
        let (minimum, average, maximum) = self.climate_dao.get_temperature_stats(&mut connection, &stats_input).await?;
        Ok(TemperatureStatsOutputType::new(stats_input.start, stats_input.end, minimum, average.map(round_to_one_decimal), maximum))
    }

    /**
     * Acquires a connection from the pool. Each operation gets its own
     * connection, returned to the pool when the guard drops on any exit
     * path.
     *
     * # Returns
     * A Result containing the pooled connection or an `ApplicationError`.
     */
    async fn acquire_connection(&self) -> Result<sqlx::pool::PoolConnection<Sqlite>, ApplicationError> {
        let Some(connection_pool) = &self.connection_pool else {
            return Err(ApplicationError::new(ErrorType::DatabaseError, "No database connection available".to_string()));
        };
        connection_pool.acquire().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to acquire database connection: {err}")))
    }
}

/**
 * Rounds to one decimal place, half away from zero.
 */
fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod test {
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

    #[test]
    fn test_round_to_one_decimal_half_away_from_zero() {
        assert_eq!(round_to_one_decimal(74.25), 74.3);
        assert_eq!(round_to_one_decimal(-74.25), -74.3);
    }

    #[test]
    fn test_round_to_one_decimal_plain_values() {
        assert_eq!(round_to_one_decimal(71.0625), 71.1);
        assert_eq!(round_to_one_decimal(71.0), 71.0);
    }

    #[tokio::test]
    async fn test_no_connection_pool() {
        let climate_service = ClimateService::new(ClimateDao::new(), None);
        let result = climate_service.get_precipitation_list().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_recent_temperature_observations_window_and_station() {
        let climate_service = init_service().await;
        let result = climate_service.get_recent_temperature_observations().await.unwrap();
        // Latest date 2017-08-23 puts the cutoff at 2016-08-22.
        assert_eq!(result.observations.len(), 23);
        assert!(result.observations.iter().all(|observation| observation.station == "USC1"));
        assert!(result.observations.iter().all(|observation| observation.date.as_str() > "2016-08-22"));
    }

    #[tokio::test]
    async fn test_recent_temperature_observations_cutoff_bounds() {
        let pool = init_schema().await;
        sqlx::query("INSERT INTO measurement (station, date, prcp, tobs) VALUES ('USC1', '2017-08-23', 0.0, 80), ('USC1', '2016-08-22', 0.0, 81), ('USC1', '2016-08-23', 0.0, 82)").execute(&pool).await.unwrap();
        let climate_service = ClimateService::new(ClimateDao::new(), Some(pool));
        let result = climate_service.get_recent_temperature_observations().await.unwrap();
        let dates: Vec<&str> = result.observations.iter().map(|observation| observation.date.as_str()).collect();
        assert!(dates.contains(&"2016-08-23"));
        assert!(dates.contains(&"2017-08-23"));
        assert!(!dates.contains(&"2016-08-22"));
    }

    #[tokio::test]
    async fn test_recent_temperature_observations_truncates_temperature() {
        let pool = init_schema().await;
        sqlx::query("INSERT INTO measurement (station, date, prcp, tobs) VALUES ('USC1', '2017-08-23', 0.0, 71.9), ('USC1', '2017-08-22', 0.0, -2.7)").execute(&pool).await.unwrap();
        let climate_service = ClimateService::new(ClimateDao::new(), Some(pool));
        let result = climate_service.get_recent_temperature_observations().await.unwrap();
        let temperatures: Vec<i64> = result.observations.iter().map(|observation| observation.temperature).collect();
        assert!(temperatures.contains(&71));
        assert!(temperatures.contains(&-2));
    }

    #[tokio::test]
    async fn test_recent_temperature_observations_unparseable_date() {
        let pool = init_schema().await;
        sqlx::query("INSERT INTO measurement (station, date, prcp, tobs) VALUES ('USC1', 'not-a-date', 0.0, 70)").execute(&pool).await.unwrap();
        let climate_service = ClimateService::new(ClimateDao::new(), Some(pool));
        let result = climate_service.get_recent_temperature_observations().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_recent_temperature_observations_empty_store() {
        let pool = init_schema().await;
        let climate_service = ClimateService::new(ClimateDao::new(), Some(pool));
        let result = climate_service.get_recent_temperature_observations().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_temperature_stats_rounded_average() {
        let climate_service = init_service().await;
        let stats_input = TemperatureStatsInputType::new("2017-08-01".to_string(), Some("2017-08-10".to_string()));
        let result = climate_service.get_temperature_stats(stats_input).await.unwrap();
        assert_eq!(result.start, "2017-08-01");
        assert_eq!(result.end, Some("2017-08-10".to_string()));
        assert_eq!(result.minimum, Some(70.0));
        assert_eq!(result.average, Some(74.5));
        assert_eq!(result.maximum, Some(79.0));
    }

    #[tokio::test]
    async fn test_temperature_stats_average_within_bounds() {
        let climate_service = init_service().await;
        let stats_input = TemperatureStatsInputType::new("2015-01-01".to_string(), None);
        let result = climate_service.get_temperature_stats(stats_input).await.unwrap();
        let average = result.average.unwrap();
        assert!(result.minimum.unwrap() <= average);
        assert!(result.maximum.unwrap() >= average);
    }

    #[tokio::test]
    async fn test_temperature_stats_empty_range_passes_nulls() {
        let climate_service = init_service().await;
        let stats_input = TemperatureStatsInputType::new("2019-01-01".to_string(), None);
        let result = climate_service.get_temperature_stats(stats_input).await.unwrap();
        assert_eq!(result.minimum, None);
        assert_eq!(result.average, None);
        assert_eq!(result.maximum, None);
    }

    async fn init_schema() -> Pool<Sqlite> {
        let pool = SqlitePoolOptions::new().max_connections(1).connect("sqlite::memory:").await.unwrap();
        sqlx::query("CREATE TABLE station (id INTEGER PRIMARY KEY, station TEXT NOT NULL, name TEXT NOT NULL)").execute(&pool).await.unwrap();
        sqlx::query("CREATE TABLE measurement (id INTEGER PRIMARY KEY, station TEXT NOT NULL, date TEXT NOT NULL, prcp REAL, tobs REAL NOT NULL)").execute(&pool).await.unwrap();
        pool
    }

    async fn init_service() -> ClimateService {
        let pool = init_schema().await;
        sqlx::query("INSERT INTO station (station, name) VALUES ('USC1', 'Waihee'), ('USC2', 'Kaneohe')").execute(&pool).await.unwrap();
        for day in 1..=23 {
            sqlx::query("INSERT INTO measurement (station, date, prcp, tobs) VALUES ('USC1', $1, 0.05, $2)")
                .bind(format!("2017-08-{day:02}"))
                .bind(f64::from(69 + day))
                .execute(&pool)
                .await
                .unwrap();
        }
        sqlx::query("INSERT INTO measurement (station, date, prcp, tobs) VALUES ('USC2', '2016-09-01', 0.3, 75)").execute(&pool).await.unwrap();
        ClimateService::new(ClimateDao::new(), Some(pool))
    }
}
