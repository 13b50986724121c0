use log::error;
use rocket::http::Status;
use rocket::response::{self, Responder, Response};
use rocket::serde::json::Json;
use rocket::Request;
use serde::Serialize;
use snafu::Snafu;

pub type CustomResult<T> = Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Points array is empty"))]
    EmptyPointsArray {},

    #[snafu(display("{}", message))]
    InvalidPayload { message: String },

    #[snafu(display("{} not found", what))]
    NotFound { what: String },

    #[snafu(display("Cannot delete {}: it is still referenced by race results", entity))]
    StillReferenced { entity: String },

    #[snafu(display("Database error: {}", source))]
    Database { source: diesel::result::Error },

    #[snafu(display("Could not connect to the database: {}", source))]
    Connection { source: diesel::ConnectionError },

    #[snafu(display("Serialization error: {}", source))]
    Serialization { source: serde_json::Error },

    #[snafu(display("Missing configuration value: {}", key))]
    MissingConfig { key: String },
}

impl Error {
    pub fn invalid(message: impl Into<String>) -> Error {
        Error::InvalidPayload {
            message: message.into(),
        }
    }

    /// # http status
    /// the status code this error is reported with
    pub fn status(&self) -> Status {
        match self {
            Error::EmptyPointsArray { .. } | Error::InvalidPayload { .. } => Status::BadRequest,
            Error::NotFound { .. } => Status::NotFound,
            Error::StillReferenced { .. } => Status::Conflict,
            Error::Database { .. }
            | Error::Connection { .. }
            | Error::Serialization { .. }
            | Error::MissingConfig { .. } => Status::InternalServerError,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        let message = if status == Status::InternalServerError {
            error!(target:"errors:respond_to", "{} {} failed: {}", request.method(), request.uri(), self);
            "Server error".to_string()
        } else {
            self.to_string()
        };

        Response::build_from(Json(ErrorBody { error: message }).respond_to(request)?)
            .status(status)
            .ok()
    }
}
