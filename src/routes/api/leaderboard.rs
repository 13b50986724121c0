use log::{error, warn};
use rocket::get;
use rocket::http::uri::Origin;
use rocket::serde::json::Json;
use rocket::State;
use serde::{Deserialize, Serialize};

use crate::errors::{CustomResult, Error};
use crate::macros::database_error_handler::db_handle_error;
use crate::macros::request_caching::{cache_response, read_cache_request};
use crate::modules::helpers::config::Config;
use crate::modules::helpers::general::Helpers;
use crate::modules::helpers::leaderboard::{
    compute_driver_details, compute_leaderboard, last_team_for_driver, DriverDetail, DriverStanding, LastTeam,
    TeamStanding,
};
use crate::modules::helpers::points::{get_points, PointsTable};
use crate::modules::models::general::establish_connection;
use crate::modules::models::race_result::ResultRow;
use crate::modules::redis::Redis;

pub const POINTS_RULE: &str = "points = points[place - 1]; places beyond the table score 0";

/**************************************************************************************************/
/**************** ROUTES **************************************************************************/
/**************************************************************************************************/

/// # points configuration
/// never fails, an unreachable database gives the default table
#[get("/config")]
pub fn get_config(config: &State<Config>) -> Json<ApiConfig> {
    Json(ApiConfig {
        points: load_points(config),
        rule: POINTS_RULE.to_string(),
    })
}

/// # all-time leaderboard
#[get("/leaderboard")]
pub fn get_leaderboard(origin: &Origin, config: &State<Config>) -> CustomResult<Json<ApiLeaderboard>> {
    read_cache_request!(origin, config);

    let conn = &mut establish_connection(&config.database_url)?;
    let points = get_points(conn);
    let rows = db_handle_error!(ResultRow::get_all(conn), "routes/api/leaderboard:get_leaderboard", "results");

    let board = compute_leaderboard(&rows, &points);

    cache_response!(origin, config, ApiLeaderboard {
        points,
        leaderboard: board.driver_standings,
        teamboard: board.team_standings,
    });
}

/// # results of one driver
#[get("/driver/<id>")]
pub fn get_driver(id: &str, origin: &Origin, config: &State<Config>) -> CustomResult<Json<ApiDriverDetails>> {
    let driver_id = Helpers::parse_id(id, "Bad driver id")?;

    read_cache_request!(origin, config);

    let conn = &mut establish_connection(&config.database_url)?;
    let points = get_points(conn);
    let rows = db_handle_error!(ResultRow::for_driver(conn, driver_id), "routes/api/leaderboard:get_driver", "driver results");

    cache_response!(origin, config, ApiDriverDetails {
        driver_id,
        details: compute_driver_details(driver_id, &rows, &points),
    });
}

/// # team of the most recent result of a driver
/// `null` when the driver has no results
#[get("/driver/<id>/last-team")]
pub fn get_last_team(id: &str, origin: &Origin, config: &State<Config>) -> CustomResult<Json<Option<LastTeam>>> {
    let driver_id = Helpers::parse_id(id, "Bad driver id")?;

    read_cache_request!(origin, config);

    let conn = &mut establish_connection(&config.database_url)?;
    let rows = db_handle_error!(ResultRow::for_driver(conn, driver_id), "routes/api/leaderboard:get_last_team", "driver results");

    cache_response!(origin, config, last_team_for_driver(driver_id, &rows));
}

/**************************************************************************************************/
/**************** HELPERS *************************************************************************/
/**************************************************************************************************/

/// the active points table, or the default when the database cannot be reached
pub fn load_points(config: &Config) -> PointsTable {
    match establish_connection(&config.database_url) {
        Ok(mut conn) => get_points(&mut conn),
        Err(error) => {
            warn!(target:"routes/api/leaderboard:load_points", "Using default points table: {}", error);
            PointsTable::default()
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiConfig {
    pub points: PointsTable,
    pub rule: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiLeaderboard {
    pub points: PointsTable,
    pub leaderboard: Vec<DriverStanding>,
    pub teamboard: Vec<TeamStanding>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ApiDriverDetails {
    pub driver_id: i32,
    pub details: Vec<DriverDetail>,
}
