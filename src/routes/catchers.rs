use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catch, Request, Responder};
use serde_json::{json, Value};

use crate::modules::helpers::guards::admin::AuthFailure;

/// 401 with a basic auth challenge so browsers ask for credentials
#[derive(Responder)]
#[response(status = 401, content_type = "json")]
pub struct AuthRequired {
    body: String,
    challenge: Header<'static>,
}

#[catch(401)]
pub fn unauthorized() -> AuthRequired {
    AuthRequired {
        body: json!({ "error": "Auth required" }).to_string(),
        challenge: Header::new("WWW-Authenticate", "Basic realm=\"Admin\""),
    }
}

#[catch(default)]
pub fn default_catcher(status: Status, request: &Request) -> (Status, Json<Value>) {
    let message = match request.local_cache(|| AuthFailure(None)) {
        AuthFailure(Some(failure)) if status == Status::InternalServerError => failure.to_string(),
        _ if status == Status::InternalServerError => "Server error".to_string(),
        _ => status.reason_lossy().to_string(),
    };

    (status, Json(json!({ "error": message })))
}
