use diesel::pg::PgConnection;
use diesel::prelude::*;
use log::{error, warn};
use serde::{Deserialize, Serialize};

use crate::schema::drivers;

#[derive(Insertable, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = drivers)]
pub struct NewDriver {
    pub nickname: String,
}

#[derive(Queryable, Identifiable, Serialize, Deserialize, PartialEq, Eq, Hash, Debug, Clone)]
pub struct Driver {
    pub id: i32,
    pub nickname: String,
}

impl Driver {
    /// # create driver
    ///
    /// ## Arguments
    /// * `conn` - the database connection
    /// * `nickname` - the name shown on the leaderboard
    ///
    /// ## Returns
    /// * `Driver` - the created driver
    pub fn new(conn: &mut PgConnection, nickname: &str) -> QueryResult<Driver> {
        let new_driver = NewDriver {
            nickname: nickname.to_string(),
        };

        match diesel::insert_into(drivers::table)
            .values(&new_driver)
            .get_result::<Driver>(conn) {
            Ok(driver) => Ok(driver),
            Err(error) => {
                error!(target:"models/driver:new", "Error creating driver: {}", error);
                Err(error)
            }
        }
    }

    /// # get all drivers
    /// newest first
    pub fn get_all(conn: &mut PgConnection) -> QueryResult<Vec<Driver>> {
        use crate::schema::drivers::dsl::*;

        drivers.order(id.desc()).load::<Driver>(conn)
    }

    /// # delete driver by id
    /// fails with a foreign key violation while results still reference the driver
    ///
    /// ## Returns
    /// * `bool` - false when no driver has the given id
    pub fn delete_id(conn: &mut PgConnection, id_in: i32) -> QueryResult<bool> {
        use crate::schema::drivers::dsl::*;

        let deleted = diesel::delete(drivers.filter(id.eq(id_in))).execute(conn)?;
        if deleted == 0 {
            warn!(target:"models/driver:delete_id", "Driver not found: {}", id_in);
        }

        Ok(deleted > 0)
    }
}
