// Authentication handlers
// Guest session bootstrap, magic-link sign-in, and the guest data linking
// that runs when a guest verifies an email.

use axum::{
    extract::{Extension, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::{error, info, warn};
use validator::Validate;

use crate::{
    app::AppState,
    middleware::auth::AuthenticatedUser,
    models::magic_link::{
        MagicLinkRequest, MagicLinkResponse, SessionResponse, VerifyMagicLinkRequest,
    },
    models::user::{NewUser, User},
    services::AccountLinkService,
    utils::auth_errors::AuthError,
};

/// Bearer token from the Authorization header, if any.
/// Verification accepts anonymous callers, so this stays optional.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Create a guest account and session
/// POST /v1/auth/guest
#[utoipa::path(
    post,
    path = "/v1/auth/guest",
    tag = "Auth",
    operation_id = "createGuestSession",
    responses(
        (status = 201, description = "Guest account and session created", body = SessionResponse),
        (status = 500, description = "Account creation failed")
    )
)]
pub async fn create_guest_session(State(state): State<AppState>) -> impl IntoResponse {
    let mut conn = match state.diesel_pool.get().await {
        Ok(conn) => conn,
        Err(e) => {
            return AuthError::DatabaseError(format!("Database connection failed: {}", e))
                .into_response()
        },
    };

    let user = match User::create(&mut conn, NewUser::guest()).await {
        Ok(user) => user,
        Err(e) => {
            error!("Failed to create guest account: {}", e);
            return AuthError::DatabaseError(e.to_string()).into_response();
        },
    };

    let token = match state.session_service.create_session(&user).await {
        Ok(token) => token,
        Err(e) => {
            error!("Failed to create guest session: {}", e);
            return AuthError::SessionError(e.to_string()).into_response();
        },
    };

    info!("Created guest account {}", user.id);

    (StatusCode::CREATED, Json(SessionResponse { token, user })).into_response()
}

/// Request a magic-link sign-in email
/// POST /v1/auth/magic-link
#[utoipa::path(
    post,
    path = "/v1/auth/magic-link",
    tag = "Auth",
    operation_id = "requestMagicLink",
    request_body = MagicLinkRequest,
    responses(
        (status = 200, description = "Sign-in email queued", body = MagicLinkResponse),
        (status = 400, description = "Invalid email address"),
        (status = 429, description = "Too many sign-in requests for this address")
    )
)]
pub async fn request_magic_link(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<MagicLinkRequest>,
) -> impl IntoResponse {
    if let Err(e) = request.validate() {
        return AuthError::ValidationError(e.to_string()).into_response();
    }

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .map(String::from);

    let token_info = match state
        .magic_link_service
        .create_signin_request(&request.email, None, user_agent)
        .await
    {
        Ok(info) => info,
        Err(e) => return e.into_response(),
    };

    // The raw token leaves the process only inside the email
    if let Err(e) = state
        .email_service
        .send_magic_link_email(&request.email.to_lowercase(), &token_info.token)
        .await
    {
        error!("Failed to send magic-link email: {}", e);
        return AuthError::InternalError.into_response();
    }

    // Identical response whether or not the address has an account
    (
        StatusCode::OK,
        Json(MagicLinkResponse {
            success: true,
            message: "If the address is valid, a sign-in link is on its way".to_string(),
        }),
    )
        .into_response()
}

/// Verify a magic-link token and establish an authenticated session
/// POST /v1/auth/verify
///
/// When the caller presents a guest session, everything the guest logged is
/// transferred to the authenticated account before the session is rotated.
#[utoipa::path(
    post,
    path = "/v1/auth/verify",
    tag = "Auth",
    operation_id = "verifyMagicLink",
    request_body = VerifyMagicLinkRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionResponse),
        (status = 401, description = "Invalid or expired token")
    )
)]
pub async fn verify_magic_link(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<VerifyMagicLinkRequest>,
) -> impl IntoResponse {
    if let Err(e) = request.validate() {
        return AuthError::ValidationError(e.to_string()).into_response();
    }

    // Consume the token first; everything after acts on its email
    let email = match state
        .magic_link_service
        .validate_and_consume_token(&request.token)
        .await
    {
        Ok(email) => email,
        Err(e) => {
            crate::utils::log_auth_failure("<token>", &e, None);
            return e.into_response();
        },
    };

    let mut conn = match state.diesel_pool.get().await {
        Ok(conn) => conn,
        Err(e) => {
            return AuthError::DatabaseError(format!("Database connection failed: {}", e))
                .into_response()
        },
    };

    let is_new_account = User::find_by_email(&mut conn, &email).await.is_err();

    let user = match User::find_or_create_by_email(&mut conn, &email).await {
        Ok(user) => user,
        Err(e) => {
            error!("Failed to resolve account for {}: {}", email, e);
            return AuthError::DatabaseError(e.to_string()).into_response();
        },
    };

    drop(conn);

    // If the caller was browsing as a guest, adopt that data now
    if let Some(guest_token) = bearer_token(&headers) {
        if let Ok(session) = state.session_service.validate(guest_token).await {
            if session.is_guest && session.user_id != user.id {
                let linker = AccountLinkService::new(state.diesel_pool.clone());
                if let Err(e) = linker.link_anonymous_user(session.user_id, user.id).await {
                    error!(
                        "Failed to link guest {} into {}: {}",
                        session.user_id, user.id, e
                    );
                    return AuthError::InternalError.into_response();
                }
            }

            // The guest session is dead either way after sign-in
            if let Err(e) = state.session_service.revoke(guest_token).await {
                warn!("Failed to revoke guest session: {}", e);
            }
        }
    }

    let token = match state.session_service.create_session(&user).await {
        Ok(token) => token,
        Err(e) => {
            error!("Failed to create session: {}", e);
            return AuthError::SessionError(e.to_string()).into_response();
        },
    };

    if is_new_account {
        // Best effort; sign-in must not fail on a missing welcome mail
        if let Err(e) = state.email_service.send_welcome_email(&email).await {
            warn!("Failed to send welcome email to {}: {}", email, e);
        }
    }

    info!("User {} signed in via magic link", user.id);

    (StatusCode::OK, Json(SessionResponse { token, user })).into_response()
}

/// Get the current user
/// GET /v1/auth/me
#[utoipa::path(
    get,
    path = "/v1/auth/me",
    tag = "Auth",
    operation_id = "getCurrentUser",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Unauthorized - invalid or missing session")
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> impl IntoResponse {
    let mut conn = match state.diesel_pool.get().await {
        Ok(conn) => conn,
        Err(e) => {
            return AuthError::DatabaseError(format!("Database connection failed: {}", e))
                .into_response()
        },
    };

    match User::find_by_id(&mut conn, auth_user.user_id).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(_) => {
            // Session outlived the account (e.g. guest row linked away)
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "success": false,
                    "message": "Account no longer exists"
                })),
            )
                .into_response()
        },
    }
}

/// Log out: revoke the presented session
/// POST /v1/auth/logout
#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    tag = "Auth",
    operation_id = "logout",
    responses(
        (status = 200, description = "Session revoked"),
        (status = 401, description = "Unauthorized - invalid or missing session")
    ),
    security(("bearerAuth" = []))
)]
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> impl IntoResponse {
    if let Err(e) = state
        .session_service
        .revoke(&auth_user.session_token)
        .await
    {
        error!("Failed to revoke session: {}", e);
        return AuthError::SessionError(e.to_string()).into_response();
    }

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Logged out"
        })),
    )
        .into_response()
}
