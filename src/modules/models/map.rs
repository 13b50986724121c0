use diesel::pg::PgConnection;
use diesel::prelude::*;
use log::{error, warn};
use serde::{Deserialize, Serialize};

use crate::schema::maps;

#[derive(Insertable, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = maps)]
pub struct NewMap {
    pub name: String,
}

/// A track or event that races are held on.
#[derive(Queryable, Identifiable, Serialize, Deserialize, PartialEq, Eq, Hash, Debug, Clone)]
pub struct Map {
    pub id: i32,
    pub name: String,
}

impl Map {
    pub fn new(conn: &mut PgConnection, name: &str) -> QueryResult<Map> {
        let new_map = NewMap {
            name: name.to_string(),
        };

        match diesel::insert_into(maps::table)
            .values(&new_map)
            .get_result::<Map>(conn) {
            Ok(map) => Ok(map),
            Err(error) => {
                error!(target:"models/map:new", "Error creating map: {}", error);
                Err(error)
            }
        }
    }

    pub fn get_all(conn: &mut PgConnection) -> QueryResult<Vec<Map>> {
        use crate::schema::maps::dsl::*;

        maps.order(id.desc()).load::<Map>(conn)
    }

    pub fn delete_id(conn: &mut PgConnection, id_in: i32) -> QueryResult<bool> {
        use crate::schema::maps::dsl::*;

        let deleted = diesel::delete(maps.filter(id.eq(id_in))).execute(conn)?;
        if deleted == 0 {
            warn!(target:"models/map:delete_id", "Map not found: {}", id_in);
        }

        Ok(deleted > 0)
    }
}
