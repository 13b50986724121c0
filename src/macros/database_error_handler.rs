/// unwrap a query result inside a route, turning failures into `Error`s.
/// a missing row becomes `Error::NotFound`, anything else is logged.
macro_rules! db_handle_error {
    ( $data:expr, $target:expr, $type_str:expr ) => {
        match $data {
            Ok(e) => e,
            Err(diesel::result::Error::NotFound) => {
                return Err(Error::NotFound { what: $type_str.to_string() });
            }
            Err(error) => {
                error!(target:$target, "Error getting {}. (error: {})", $type_str, error);
                return Err(Error::Database { source: error });
            }
        }
    }
}

/// like `db_handle_error` but for writes. a foreign key violation returns `$on_fk` instead.
macro_rules! db_handle_write_error {
    ( $data:expr, $target:expr, $type_str:expr, $on_fk:expr ) => {
        match $data {
            Ok(e) => e,
            Err(diesel::result::Error::DatabaseError(diesel::result::DatabaseErrorKind::ForeignKeyViolation, info)) => {
                warn!(target:$target, "Foreign key violation writing {}. ({})", $type_str, info.message());
                return Err($on_fk);
            }
            Err(error) => {
                error!(target:$target, "Error writing {}. (error: {})", $type_str, error);
                return Err(Error::Database { source: error });
            }
        }
    }
}

pub(crate) use db_handle_error;
pub(crate) use db_handle_write_error;
