use log::{error, info, warn};
use rocket::serde::json::Json;
use rocket::State;
use rocket::{delete, get, post, put};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{CustomResult, Error};
use crate::macros::database_error_handler::{db_handle_error, db_handle_write_error};
use crate::macros::redis::clear_cache;
use crate::modules::helpers::config::Config;
use crate::modules::helpers::general::Helpers;
use crate::modules::helpers::guards::admin::AdminUser;
use crate::modules::helpers::points::{save_points, PointsTable};
use crate::modules::models::driver::Driver;
use crate::modules::models::general::establish_connection;
use crate::modules::models::map::Map;
use crate::modules::models::race_result::{NewRaceResult, RaceResult, ResultRow};
use crate::modules::models::team::Team;
use crate::modules::redis::Redis;
use crate::routes::api::leaderboard::load_points;

const DEFAULT_RESULTS_LIMIT: i64 = 200;
const MAX_RESULTS_LIMIT: i64 = 1000;

/**************************************************************************************************/
/**************** ROUTES **************************************************************************/
/**************************************************************************************************/

/***** POINTS *****/

#[get("/admin/points")]
pub fn get_points(_admin: AdminUser, config: &State<Config>) -> Json<ApiPoints> {
    Json(ApiPoints {
        points: load_points(config),
    })
}

/// # replace the points table
/// the payload is validated before the database is touched
#[put("/admin/points", data = "<payload>")]
pub fn put_points(admin: AdminUser, payload: Json<Value>, config: &State<Config>) -> CustomResult<Json<ApiPoints>> {
    let candidate = match payload.get("points") {
        Some(Value::Array(values)) => values,
        _ => return Err(Error::invalid("points must be array")),
    };
    let points = PointsTable::from_candidate(candidate)?;

    let conn = &mut establish_connection(&config.database_url)?;
    save_points(conn, &points)?;
    info!(target:"routes/api/admin:put_points", "{} updated the points table", admin.username);

    clear_cache!(config);
    Ok(Json(ApiPoints { points }))
}

/***** DRIVERS *****/

#[get("/admin/drivers")]
pub fn list_drivers(_admin: AdminUser, config: &State<Config>) -> CustomResult<Json<Vec<Driver>>> {
    let conn = &mut establish_connection(&config.database_url)?;
    let drivers = db_handle_error!(Driver::get_all(conn), "routes/api/admin:list_drivers", "drivers");

    Ok(Json(drivers))
}

#[post("/admin/drivers", data = "<payload>")]
pub fn create_driver(_admin: AdminUser, payload: Json<DriverPayload>, config: &State<Config>) -> CustomResult<Json<Driver>> {
    let nickname = Helpers::required_name(payload.nickname.as_deref(), "nickname")?;

    let conn = &mut establish_connection(&config.database_url)?;
    let driver = db_handle_error!(Driver::new(conn, &nickname), "routes/api/admin:create_driver", "driver");

    Ok(Json(driver))
}

#[delete("/admin/drivers/<id>")]
pub fn delete_driver(_admin: AdminUser, id: &str, config: &State<Config>) -> CustomResult<Json<ApiOk>> {
    let id = Helpers::parse_id(id, "bad id")?;

    let conn = &mut establish_connection(&config.database_url)?;
    db_handle_write_error!(
        Driver::delete_id(conn, id),
        "routes/api/admin:delete_driver",
        "driver",
        Error::StillReferenced { entity: "driver".to_string() }
    );

    clear_cache!(config);
    Ok(Json(ApiOk::default()))
}

/***** TEAMS *****/

#[get("/admin/teams")]
pub fn list_teams(_admin: AdminUser, config: &State<Config>) -> CustomResult<Json<Vec<Team>>> {
    let conn = &mut establish_connection(&config.database_url)?;
    let teams = db_handle_error!(Team::get_all(conn), "routes/api/admin:list_teams", "teams");

    Ok(Json(teams))
}

#[post("/admin/teams", data = "<payload>")]
pub fn create_team(_admin: AdminUser, payload: Json<NamePayload>, config: &State<Config>) -> CustomResult<Json<Team>> {
    let name = Helpers::required_name(payload.name.as_deref(), "name")?;

    let conn = &mut establish_connection(&config.database_url)?;
    let team = db_handle_error!(Team::new(conn, &name), "routes/api/admin:create_team", "team");

    Ok(Json(team))
}

#[delete("/admin/teams/<id>")]
pub fn delete_team(_admin: AdminUser, id: &str, config: &State<Config>) -> CustomResult<Json<ApiOk>> {
    let id = Helpers::parse_id(id, "bad id")?;

    let conn = &mut establish_connection(&config.database_url)?;
    db_handle_write_error!(
        Team::delete_id(conn, id),
        "routes/api/admin:delete_team",
        "team",
        Error::StillReferenced { entity: "team".to_string() }
    );

    clear_cache!(config);
    Ok(Json(ApiOk::default()))
}

/***** MAPS *****/

#[get("/admin/maps")]
pub fn list_maps(_admin: AdminUser, config: &State<Config>) -> CustomResult<Json<Vec<Map>>> {
    let conn = &mut establish_connection(&config.database_url)?;
    let maps = db_handle_error!(Map::get_all(conn), "routes/api/admin:list_maps", "maps");

    Ok(Json(maps))
}

#[post("/admin/maps", data = "<payload>")]
pub fn create_map(_admin: AdminUser, payload: Json<NamePayload>, config: &State<Config>) -> CustomResult<Json<Map>> {
    let name = Helpers::required_name(payload.name.as_deref(), "name")?;

    let conn = &mut establish_connection(&config.database_url)?;
    let map = db_handle_error!(Map::new(conn, &name), "routes/api/admin:create_map", "map");

    Ok(Json(map))
}

#[delete("/admin/maps/<id>")]
pub fn delete_map(_admin: AdminUser, id: &str, config: &State<Config>) -> CustomResult<Json<ApiOk>> {
    let id = Helpers::parse_id(id, "bad id")?;

    let conn = &mut establish_connection(&config.database_url)?;
    db_handle_write_error!(
        Map::delete_id(conn, id),
        "routes/api/admin:delete_map",
        "map",
        Error::StillReferenced { entity: "map".to_string() }
    );

    clear_cache!(config);
    Ok(Json(ApiOk::default()))
}

/***** RESULTS *****/

/// # most recent results
/// newest first. `limit` defaults to 200 and is clamped to 1..=1000
#[get("/admin/results?<limit>")]
pub fn list_results(_admin: AdminUser, limit: Option<i64>, config: &State<Config>) -> CustomResult<Json<Vec<ResultRow>>> {
    let conn = &mut establish_connection(&config.database_url)?;
    let rows = db_handle_error!(
        ResultRow::get_recent(conn, clamp_limit(limit)),
        "routes/api/admin:list_results",
        "results"
    );

    Ok(Json(rows))
}

#[post("/admin/results", data = "<payload>")]
pub fn create_result(_admin: AdminUser, payload: Json<ResultPayload>, config: &State<Config>) -> CustomResult<Json<ApiCreated>> {
    let new_result = payload.into_inner().into_new_result()?;

    let conn = &mut establish_connection(&config.database_url)?;
    let result = db_handle_write_error!(
        RaceResult::new(conn, &new_result),
        "routes/api/admin:create_result",
        "result",
        Error::invalid("unknown driver, team or map")
    );

    clear_cache!(config);
    Ok(Json(ApiCreated { id: result.id }))
}

#[put("/admin/results/<id>", data = "<payload>")]
pub fn update_result(_admin: AdminUser, id: &str, payload: Json<ResultPayload>, config: &State<Config>) -> CustomResult<Json<ApiOk>> {
    let id = Helpers::parse_id(id, "bad id")?;
    let values = payload.into_inner().into_new_result()?;

    let conn = &mut establish_connection(&config.database_url)?;
    let updated = db_handle_write_error!(
        RaceResult::update(conn, id, &values),
        "routes/api/admin:update_result",
        "result",
        Error::invalid("unknown driver, team or map")
    );
    if !updated {
        info!(target:"routes/api/admin:update_result", "No result with id {}, nothing updated", id);
    }

    clear_cache!(config);
    Ok(Json(ApiOk::default()))
}

#[delete("/admin/results/<id>")]
pub fn delete_result(_admin: AdminUser, id: &str, config: &State<Config>) -> CustomResult<Json<ApiOk>> {
    let id = Helpers::parse_id(id, "bad id")?;

    let conn = &mut establish_connection(&config.database_url)?;
    db_handle_error!(RaceResult::delete_id(conn, id), "routes/api/admin:delete_result", "result");

    clear_cache!(config);
    Ok(Json(ApiOk::default()))
}

/**************************************************************************************************/
/**************** HELPERS *************************************************************************/
/**************************************************************************************************/

fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_RESULTS_LIMIT).clamp(1, MAX_RESULTS_LIMIT)
}

/// an integer from a json number or numeric string. blanks and anything else give `None`.
fn lenient_int(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(i),
            None => n.as_f64().filter(|f| f.is_finite() && f.fract() == 0.0).map(|f| f as i64),
        },
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed.parse::<i64>().ok().or_else(|| {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i64)
            })
        }
        _ => None,
    }
}

fn lenient_id(value: Option<&Value>) -> Option<i32> {
    lenient_int(value).and_then(|i| i32::try_from(i).ok())
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiPoints {
    pub points: PointsTable,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiOk {
    pub ok: bool,
}

impl Default for ApiOk {
    fn default() -> Self {
        ApiOk { ok: true }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiCreated {
    pub id: i32,
}

#[derive(Deserialize, Debug)]
pub struct DriverPayload {
    pub nickname: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct NamePayload {
    pub name: Option<String>,
}

/// A result as sent by the admin page. Numbers may arrive as strings.
#[derive(Deserialize, Debug, Default)]
pub struct ResultPayload {
    pub driver_id: Option<Value>,
    pub team_id: Option<Value>,
    pub map_id: Option<Value>,
    pub place: Option<Value>,
    pub time_ms: Option<Value>,
}

impl ResultPayload {
    /// # validate the payload
    /// driver, map and place are required. a team or time that is null, blank
    /// or not a number is stored as absent.
    pub fn into_new_result(self) -> CustomResult<NewRaceResult> {
        let driver_id = lenient_id(self.driver_id.as_ref());
        let map_id = lenient_id(self.map_id.as_ref());
        let place = lenient_id(self.place.as_ref());

        let (driver_id, map_id, place) = match (driver_id, map_id, place) {
            (Some(driver_id), Some(map_id), Some(place)) => (driver_id, map_id, place),
            _ => return Err(Error::invalid("driver_id, map_id, place required")),
        };

        if place < 1 {
            return Err(Error::invalid("place must be at least 1"));
        }

        let time_ms = lenient_int(self.time_ms.as_ref());
        if time_ms.map_or(false, |t| t < 0) {
            return Err(Error::invalid("time_ms must not be negative"));
        }

        Ok(NewRaceResult {
            driver_id,
            team_id: lenient_id(self.team_id.as_ref()),
            map_id,
            place,
            time_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payload(value: Value) -> ResultPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(clamp_limit(None), 200);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(50)), 50);
        assert_eq!(clamp_limit(Some(5000)), 1000);
    }

    #[test]
    fn result_payload_accepts_numeric_strings() {
        let result = payload(json!({
            "driver_id": "3", "team_id": "", "map_id": 2, "place": "1", "time_ms": null
        }))
        .into_new_result()
        .unwrap();

        assert_eq!(result, NewRaceResult {
            driver_id: 3,
            team_id: None,
            map_id: 2,
            place: 1,
            time_ms: None,
        });
    }

    #[test]
    fn result_payload_keeps_team_and_time() {
        let result = payload(json!({
            "driver_id": 1, "team_id": 4, "map_id": 2, "place": 3, "time_ms": "61234"
        }))
        .into_new_result()
        .unwrap();

        assert_eq!(result.team_id, Some(4));
        assert_eq!(result.time_ms, Some(61234));
    }

    #[test]
    fn result_payload_requires_driver_map_and_place() {
        for value in [
            json!({ "map_id": 2, "place": 1 }),
            json!({ "driver_id": 1, "place": 1 }),
            json!({ "driver_id": 1, "map_id": 2 }),
            json!({ "driver_id": "x", "map_id": 2, "place": 1 }),
            json!({ "driver_id": 1, "map_id": 2, "place": 1.5 }),
        ] {
            let err = payload(value).into_new_result().unwrap_err();
            assert_eq!(err.to_string(), "driver_id, map_id, place required");
        }
    }

    #[test]
    fn result_payload_rejects_bad_place_and_time() {
        let err = payload(json!({ "driver_id": 1, "map_id": 2, "place": 0 })).into_new_result().unwrap_err();
        assert!(matches!(err, Error::InvalidPayload { .. }));

        let err = payload(json!({ "driver_id": 1, "map_id": 2, "place": 1, "time_ms": -5 }))
            .into_new_result()
            .unwrap_err();
        assert_eq!(err.to_string(), "time_ms must not be negative");
    }

    #[test]
    fn unparseable_optional_fields_are_absent() {
        let result = payload(json!({
            "driver_id": 1, "team_id": "abc", "map_id": 2, "place": 1, "time_ms": true
        }))
        .into_new_result()
        .unwrap();

        assert_eq!(result.team_id, None);
        assert_eq!(result.time_ms, None);
    }
}
