use axum::{
    http::header,
    response::{IntoResponse, Response},
};

/// Serves CSV text as a downloadable attachment named `{name}.csv`
pub fn attachment(name: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.csv\"", name),
            ),
        ],
        body,
    )
        .into_response()
}
