//! Authentication middleware that resolves the session cookie and rejects
//! unauthenticated requests.

use axum::{
    Json,
    extract::{FromRef, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde_json::json;

use crate::{
    AppState, auth,
    auth::session_token_from_jar,
    stores::sqlite::{SQLiteSessionStore, SQLiteUserStore},
};

/// The state needed by the auth middleware.
#[derive(Clone)]
pub struct AuthState {
    /// Resolves session owners.
    pub user_store: SQLiteUserStore,
    /// Holds the active sessions.
    pub session_store: SQLiteSessionStore,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            user_store: state.user_store.clone(),
            session_store: state.session_store.clone(),
        }
    }
}

/// The JSON 401 response shared by everything that rejects a request for a
/// missing or invalid session.
pub(crate) fn unauthenticated_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "authenticated": false })),
    )
        .into_response()
}

/// Middleware function that checks for a valid session cookie.
///
/// The owning [User](crate::models::User) is placed into the request
/// extensions and the request executed normally if the session is valid,
/// otherwise a 401 JSON response is returned. Resolving an expired session
/// deletes it as a side effect.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(user): Extension<User>` to receive the user.
pub async fn auth_guard(
    State(state): State<AuthState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = session_token_from_jar(&jar) else {
        return unauthenticated_response();
    };

    let mut sessions = state.session_store.clone();

    match auth::resolve_session(&mut sessions, &state.user_store, &token) {
        Ok(Some(user)) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(None) => unauthenticated_response(),
        Err(error) => error.into_response(),
    }
}
