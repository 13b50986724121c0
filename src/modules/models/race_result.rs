use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Integer, Nullable, VarChar};
use log::error;
use serde::{Deserialize, Serialize};

use crate::schema::race_results;

const JOINED_RESULTS_SELECT: &str = "
    select
        r.id        as result_id,
        r.driver_id as driver_id,
        d.nickname  as driver_name,
        r.team_id   as team_id,
        t.name      as team_name,
        r.map_id    as map_id,
        m.name      as map_name,
        r.place     as place,
        r.time_ms   as time_ms
    from race_results r
    inner join drivers d on d.id = r.driver_id
    left join teams t on t.id = r.team_id
    inner join maps m on m.id = r.map_id
";

#[derive(Insertable, AsChangeset, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = race_results)]
#[diesel(treat_none_as_null = true)]
pub struct NewRaceResult {
    pub driver_id: i32,
    pub team_id: Option<i32>,
    pub map_id: i32,
    pub place: i32,
    pub time_ms: Option<i64>,
}

#[derive(Queryable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = race_results)]
pub struct RaceResult {
    pub id: i32,
    pub driver_id: i32,
    pub team_id: Option<i32>,
    pub map_id: i32,
    pub place: i32,
    pub time_ms: Option<i64>,
}

/// A race result joined with the display names of its driver, team and map.
#[derive(QueryableByName, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResultRow {
    #[diesel(sql_type = Integer)]
    #[serde(rename = "id")]
    pub result_id: i32,
    #[diesel(sql_type = Integer)]
    pub driver_id: i32,
    #[diesel(sql_type = VarChar)]
    pub driver_name: String,
    #[diesel(sql_type = Nullable<Integer>)]
    pub team_id: Option<i32>,
    #[diesel(sql_type = Nullable<VarChar>)]
    pub team_name: Option<String>,
    #[diesel(sql_type = Integer)]
    pub map_id: i32,
    #[diesel(sql_type = VarChar)]
    pub map_name: String,
    #[diesel(sql_type = Integer)]
    pub place: i32,
    #[diesel(sql_type = Nullable<BigInt>)]
    pub time_ms: Option<i64>,
}

impl RaceResult {
    /// # insert a race result
    ///
    /// ## Arguments
    /// * `conn` - the database connection
    /// * `new_result` - the values of the result
    ///
    /// ## Returns
    /// * `RaceResult` - the inserted result
    pub fn new(conn: &mut PgConnection, new_result: &NewRaceResult) -> QueryResult<RaceResult> {
        match diesel::insert_into(race_results::table)
            .values(new_result)
            .get_result::<RaceResult>(conn) {
            Ok(result) => Ok(result),
            Err(error) => {
                error!(target:"models/race_result:new", "Error inserting result: {}", error);
                Err(error)
            }
        }
    }

    /// # update a race result
    /// overwrite every column of the result with the given id.
    ///
    /// ## Returns
    /// * `bool` - false when no result has the given id
    pub fn update(conn: &mut PgConnection, id_in: i32, values: &NewRaceResult) -> QueryResult<bool> {
        use crate::schema::race_results::dsl::*;

        let updated = diesel::update(race_results.filter(id.eq(id_in)))
            .set(values)
            .execute(conn)?;

        Ok(updated > 0)
    }

    pub fn delete_id(conn: &mut PgConnection, id_in: i32) -> QueryResult<bool> {
        use crate::schema::race_results::dsl::*;

        let deleted = diesel::delete(race_results.filter(id.eq(id_in))).execute(conn)?;
        Ok(deleted > 0)
    }
}

impl ResultRow {
    /// # get all result rows
    /// every result with its names, oldest first
    pub fn get_all(conn: &mut PgConnection) -> QueryResult<Vec<ResultRow>> {
        sql_query(format!("{} order by r.id asc", JOINED_RESULTS_SELECT))
            .load::<ResultRow>(conn)
    }

    /// # get result rows of a driver
    /// all results of the given driver, oldest first
    ///
    /// ## Arguments
    /// * `conn` - the database connection
    /// * `driver_id` - the database id of the driver
    pub fn for_driver(conn: &mut PgConnection, driver_id: i32) -> QueryResult<Vec<ResultRow>> {
        sql_query(format!("{} where r.driver_id = $1 order by r.id asc", JOINED_RESULTS_SELECT))
            .bind::<Integer, _>(driver_id)
            .load::<ResultRow>(conn)
    }

    /// # get the most recent result rows
    /// newest first, at most `limit` rows
    pub fn get_recent(conn: &mut PgConnection, limit: i64) -> QueryResult<Vec<ResultRow>> {
        sql_query(format!("{} order by r.id desc limit $1", JOINED_RESULTS_SELECT))
            .bind::<BigInt, _>(limit)
            .load::<ResultRow>(conn)
    }
}
