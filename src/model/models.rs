pub struct PrecipitationListOutputType {
    pub readings: Vec<PrecipitationDetailType>,
}

impl PrecipitationListOutputType {
    pub fn new(readings: Vec<PrecipitationDetailType>) -> Self {
        PrecipitationListOutputType { readings }
    }
}

/**
 * One precipitation reading. Precipitation is nullable in the dataset and
 * stays nullable all the way out to the response.
 */
pub struct PrecipitationDetailType {
    pub date: String,
    pub precipitation: Option<f64>,
}

impl PrecipitationDetailType {
    pub fn new(date: String, precipitation: Option<f64>) -> Self {
        PrecipitationDetailType { date, precipitation }
    }
}

impl From<(String, Option<f64>)> for PrecipitationDetailType {
    fn from(row: (String, Option<f64>)) -> Self {
        PrecipitationDetailType::new(row.0, row.1)
    }
}

pub struct StationListOutputType {
    pub names: Vec<String>,
}

impl StationListOutputType {
    pub fn new(names: Vec<String>) -> Self {
        StationListOutputType { names }
    }
}

pub struct TemperatureObservationListOutputType {
    pub observations: Vec<TemperatureObservationDetailType>,
}

impl TemperatureObservationListOutputType {
    pub fn new(observations: Vec<TemperatureObservationDetailType>) -> Self {
        TemperatureObservationListOutputType { observations }
    }
}

/**
 * One temperature observation of the most-active station. The temperature
 * is truncated toward zero, not rounded.
 */
pub struct TemperatureObservationDetailType {
    pub station: String,
    pub date: String,
    pub temperature: i64,
}

impl TemperatureObservationDetailType {
    pub fn new(station: String, date: String, temperature: i64) -> Self {
        TemperatureObservationDetailType { station, date, temperature }
    }
}

impl From<(String, String, f64)> for TemperatureObservationDetailType {
    #[allow(clippy::cast_possible_truncation)]
    fn from(row: (String, String, f64)) -> Self {
        // Truncated toward zero, not rounded.
        TemperatureObservationDetailType::new(row.0, row.1, row.2 as i64)
    }
}

/**
 * Date range for the temperature statistics query. The bounds are passed to
 * the store as-is: an unparseable date string matches no rows instead of
 * raising a validation error.
 */
#[derive(Debug)]
pub struct TemperatureStatsInputType {
    pub start: String,
    pub end: Option<String>,
}

impl TemperatureStatsInputType {
    pub fn new(start: String, end: Option<String>) -> Self {
        TemperatureStatsInputType { start, end }
    }
}

/**
 * Temperature statistics over a date range. All three aggregates are None
 * when no rows matched the range.
 */
pub struct TemperatureStatsOutputType {
    pub start: String,
    pub end: Option<String>,
    pub minimum: Option<f64>,
    pub average: Option<f64>,
    pub maximum: Option<f64>,
}

impl TemperatureStatsOutputType {
    pub fn new(start: String, end: Option<String>, minimum: Option<f64>, average: Option<f64>, maximum: Option<f64>) -> Self {
        TemperatureStatsOutputType { start, end, minimum, average, maximum }
    }
}
