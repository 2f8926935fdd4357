// OpenAPI documentation and embedded Swagger UI

use axum::response::{Html, IntoResponse, Json};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::models::{
    caffeine_entry::{
        CaffeineEntry, CreateEntryRequest, DailySummaryResponse, DayTotalResponse,
        UpdateEntryRequest,
    },
    daily_limit::{DailyLimit, LimitHistoryEntry, LimitHistoryResponse, SetLimitRequest},
    drink::{CreateDrinkRequest, Drink, UpdateDrinkRequest},
    favorite::{CreateFavoriteRequest, Favorite},
    magic_link::{MagicLinkRequest, MagicLinkResponse, SessionResponse, VerifyMagicLinkRequest},
    user::User,
};

/// Registers the bearer session token scheme referenced by the handlers
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Opaque session token"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Jolt Backend API",
        description = "Caffeine intake tracking: consumption logging, daily limits, trends, favorites, and magic-link sign-in",
        version = "1.0.0"
    ),
    paths(
        crate::handlers::auth::create_guest_session,
        crate::handlers::auth::request_magic_link,
        crate::handlers::auth::verify_magic_link,
        crate::handlers::auth::get_current_user,
        crate::handlers::auth::logout,
        crate::handlers::entries::create_entry,
        crate::handlers::entries::get_daily_summary,
        crate::handlers::entries::get_history,
        crate::handlers::entries::update_entry,
        crate::handlers::entries::delete_entry,
        crate::handlers::drinks::list_drinks,
        crate::handlers::drinks::create_drink,
        crate::handlers::drinks::update_drink,
        crate::handlers::drinks::delete_drink,
        crate::handlers::limits::get_limit_history,
        crate::handlers::limits::set_limit,
        crate::handlers::favorites::list_favorites,
        crate::handlers::favorites::create_favorite,
        crate::handlers::favorites::delete_favorite,
    ),
    components(schemas(
        User,
        SessionResponse,
        MagicLinkRequest,
        MagicLinkResponse,
        VerifyMagicLinkRequest,
        CaffeineEntry,
        CreateEntryRequest,
        UpdateEntryRequest,
        DailySummaryResponse,
        DayTotalResponse,
        Drink,
        CreateDrinkRequest,
        UpdateDrinkRequest,
        DailyLimit,
        SetLimitRequest,
        LimitHistoryEntry,
        LimitHistoryResponse,
        Favorite,
        CreateFavoriteRequest,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Guest sessions and magic-link sign-in"),
        (name = "Entries", description = "Consumption events and daily aggregation"),
        (name = "Drinks", description = "User-defined drink templates"),
        (name = "Limits", description = "Daily caffeine limit history"),
        (name = "Favorites", description = "Quick-add shortcuts"),
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document at /v1/docs/openapi.json
pub async fn serve_openapi() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Serve Swagger UI HTML at /v1/docs
pub async fn serve_swagger_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}

// Embedded Swagger UI HTML
const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Jolt API Documentation</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui.css" />
    <style>
        body {
            margin: 0;
            padding: 0;
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
        }
        #swagger-ui {
            max-width: 1460px;
            margin: 0 auto;
            padding: 20px;
        }
        .topbar {
            display: none;
        }
        .header {
            background: linear-gradient(135deg, #6b4226 0%, #3b2f2f 100%);
            color: white;
            padding: 2rem;
            text-align: center;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }
        .header h1 {
            margin: 0;
            font-size: 2.5rem;
            font-weight: 600;
        }
        .header p {
            margin: 0.5rem 0 0;
            opacity: 0.9;
            font-size: 1.1rem;
        }
    </style>
</head>
<body>
    <div class="header">
        <h1>&#9749; Jolt Backend API</h1>
        <p>REST API Documentation</p>
    </div>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = function() {
            const ui = SwaggerUIBundle({
                url: '/v1/docs/openapi.json',
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                docExpansion: "list",
                filter: true,
                tryItOutEnabled: true,
                supportedSubmitMethods: ['get', 'post', 'put', 'delete'],
                validatorUrl: null
            });
            window.ui = ui;
        }
    </script>
</body>
</html>"#;
