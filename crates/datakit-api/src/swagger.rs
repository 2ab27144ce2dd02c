//! Swagger UI page rendering.
//!
//! A single HTML template pointing the swagger-ui-dist bundle at the
//! app's synthesized OpenAPI document.

const SWAGGER_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Swagger UI</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = () => {
            SwaggerUIBundle({
                url: "__SCHEMA_URL__",
                dom_id: "#swagger-ui",
            });
        };
    </script>
</body>
</html>
"##;

/// Render the Swagger page for one app's schema endpoint.
pub fn render(schema_url: &str) -> String {
    SWAGGER_PAGE.replace("__SCHEMA_URL__", schema_url)
}
