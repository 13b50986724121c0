use diesel::pg::PgConnection;
use diesel::prelude::*;
use log::error;

use crate::errors::{CustomResult, Error};

/// # connect to the database
///
/// ## Arguments
/// * `database_url` - the postgres connection url
///
/// ## Returns
/// * `PgConnection` - a fresh connection
pub fn establish_connection(database_url: &str) -> CustomResult<PgConnection> {
    PgConnection::establish(database_url).map_err(|source| {
        error!(target:"models/general:establish_connection", "Error connecting to database: {}", source);
        Error::Connection { source }
    })
}
