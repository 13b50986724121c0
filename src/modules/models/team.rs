use diesel::pg::PgConnection;
use diesel::prelude::*;
use log::{error, warn};
use serde::{Deserialize, Serialize};

use crate::schema::teams;

#[derive(Insertable, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = teams)]
pub struct NewTeam {
    pub name: String,
}

#[derive(Queryable, Identifiable, Serialize, Deserialize, PartialEq, Eq, Hash, Debug, Clone)]
pub struct Team {
    pub id: i32,
    pub name: String,
}

impl Team {
    pub fn new(conn: &mut PgConnection, name: &str) -> QueryResult<Team> {
        let new_team = NewTeam {
            name: name.to_string(),
        };

        match diesel::insert_into(teams::table)
            .values(&new_team)
            .get_result::<Team>(conn) {
            Ok(team) => Ok(team),
            Err(error) => {
                error!(target:"models/team:new", "Error creating team: {}", error);
                Err(error)
            }
        }
    }

    pub fn get_all(conn: &mut PgConnection) -> QueryResult<Vec<Team>> {
        use crate::schema::teams::dsl::*;

        teams.order(id.desc()).load::<Team>(conn)
    }

    /// # delete team by id
    /// blocked by the database while results are tagged with the team
    pub fn delete_id(conn: &mut PgConnection, id_in: i32) -> QueryResult<bool> {
        use crate::schema::teams::dsl::*;

        let deleted = diesel::delete(teams.filter(id.eq(id_in))).execute(conn)?;
        if deleted == 0 {
            warn!(target:"models/team:delete_id", "Team not found: {}", id_in);
        }

        Ok(deleted > 0)
    }
}
