use super::*;

fn error_body(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "message": message,
            "documentation_url": "https://docs.github.com/rest",
        })),
    )
        .into_response()
}

pub(super) fn unauthorized() -> Response {
    error_body(StatusCode::UNAUTHORIZED, "Requires authentication")
}

pub(super) fn bad_credentials() -> Response {
    error_body(StatusCode::UNAUTHORIZED, "Bad credentials")
}

pub(super) fn not_found() -> Response {
    error_body(StatusCode::NOT_FOUND, "Not Found")
}

pub(super) fn bad_request(msg: &str) -> Response {
    error_body(StatusCode::BAD_REQUEST, msg)
}

pub(super) fn conflict(msg: &str) -> Response {
    error_body(StatusCode::CONFLICT, msg)
}

pub(super) fn unprocessable(msg: &str) -> Response {
    error_body(StatusCode::UNPROCESSABLE_ENTITY, msg)
}
