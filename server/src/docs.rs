//! Interactive API documentation.
use crate::config::ApiDocs;
use crate::AppState;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;

const OPENAPI_DOCUMENT: &str = include_str!("openapi.json");

const SWAGGER_UI_DIST: &str = "https://unpkg.com/swagger-ui-dist@5";

/// `GET /openapi.json`
pub(crate) async fn openapi_document() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], OPENAPI_DOCUMENT)
}

/// Routes serving a Swagger UI page for the configured OpenAPI document.
pub(crate) fn router(docs: &ApiDocs) -> Router<AppState> {
    let page = swagger_page(&docs.spec_url);
    let mut router = Router::new().route(&docs.path, get(move || async move { Html(page) }));
    if docs.path != "/" {
        let page = swagger_page(&docs.spec_url);
        router = router.route(
            &format!("{}/", docs.path),
            get(move || async move { Html(page) }),
        );
    }
    router
}

fn swagger_page(spec_url: &str) -> String {
    // JSON string literals are valid JavaScript,
    // but must not close the surrounding script element
    let spec_url = serde_json::Value::from(spec_url)
        .to_string()
        .replace("</", "<\\/");
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>dicom-vault API</title>
  <link rel="stylesheet" href="{dist}/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="{dist}/swagger-ui-bundle.js"></script>
  <script>
    window.onload = function () {{
      window.ui = SwaggerUIBundle({{ url: {spec_url}, dom_id: "#swagger-ui" }});
    }};
  </script>
</body>
</html>
"##,
        dist = SWAGGER_UI_DIST,
        spec_url = spec_url,
    )
}
