use crate::service::climate::ClimateService;

/**
* Represents the application state shared across the Actix web application.
*/
pub struct AppState {
    /**
     * The climate service for answering the read queries.
     */
    pub climate_service: ClimateService,
}

/**
 * Creates a new instance of `AppState`.
 *
 * # Arguments
 * `climate_service`: The climate service for answering the read queries.
 */
impl AppState {
    pub fn new(climate_service: ClimateService) -> Self {
        AppState { climate_service }
    }
}
