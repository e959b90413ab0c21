//! This file defines the routes for creating, inspecting and deleting the
//! login session. The auth module handles the lower level token and cookie
//! logic.

use std::str::FromStr;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    AppState, Error, auth,
    auth::{
        clear_session_cookie, session_token_from_jar, set_session_cookie,
        unauthenticated_response,
    },
    models::{PasswordHash, User, UserID},
    stores::UserStore,
    validation::ValidationErrors,
};

/// The request body for `POST /api/session`.
///
/// Every field is optional at the serde level so that missing fields produce
/// field-level validation errors instead of a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionRequest {
    /// Either `login` or `register`.
    pub mode: Option<String>,
    /// The display name, required when registering.
    pub name: Option<String>,
    /// The account email.
    pub email: Option<String>,
    /// The account password.
    pub password: Option<String>,
}

/// The user info included in successful session responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    /// The user's ID.
    pub id: UserID,
    /// The user's display name.
    pub name: String,
}

/// The response body for a valid session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Always true in this shape; unauthenticated responses use a body
    /// without user info.
    pub authenticated: bool,
    /// The session owner.
    pub user: SessionUser,
}

impl SessionResponse {
    fn for_user(user: &User) -> Self {
        Self {
            authenticated: true,
            user: SessionUser {
                id: user.id(),
                name: user.name().to_owned(),
            },
        }
    }
}

/// A validated registration request.
#[derive(Debug, Clone, PartialEq)]
struct Registration {
    name: String,
    email: EmailAddress,
    password: String,
}

/// A validated login request.
#[derive(Debug, Clone, PartialEq)]
struct Login {
    email: EmailAddress,
    password: String,
}

fn validate_email(
    email: Option<&str>,
    errors: &mut ValidationErrors,
) -> Option<EmailAddress> {
    match email.map(str::trim) {
        None | Some("") => {
            errors.push("email", "the email is required");
            None
        }
        Some(raw) => match EmailAddress::from_str(raw) {
            Ok(email) => Some(email),
            Err(_) => {
                errors.push("email", "the email is not a valid address");
                None
            }
        },
    }
}

fn validate_password(password: Option<String>, errors: &mut ValidationErrors) -> Option<String> {
    match password {
        None => {
            errors.push("password", "the password is required");
            None
        }
        Some(password) if password.is_empty() => {
            errors.push("password", "the password is required");
            None
        }
        Some(password) => Some(password),
    }
}

/// Validate the input shape for registering a new account.
fn validate_registration(data: SessionRequest) -> Result<Registration, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = match data.name.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push("name", "the name is required");
            None
        }
        Some(name) if name.chars().count() < 2 => {
            errors.push("name", "the name must be at least 2 characters");
            None
        }
        Some(name) if name.chars().count() > 60 => {
            errors.push("name", "the name must be at most 60 characters");
            None
        }
        Some(name) => Some(name.to_owned()),
    };

    let email = validate_email(data.email.as_deref(), &mut errors);
    let password = validate_password(data.password, &mut errors);

    match (name, email, password) {
        (Some(name), Some(email), Some(password)) => errors.into_result(Registration {
            name,
            email,
            password,
        }),
        _ => Err(errors),
    }
}

/// Validate the input shape for logging in.
fn validate_login(data: SessionRequest) -> Result<Login, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let email = validate_email(data.email.as_deref(), &mut errors);
    let password = validate_password(data.password, &mut errors);

    match (email, password) {
        (Some(email), Some(password)) => errors.into_result(Login { email, password }),
        _ => Err(errors),
    }
}

/// Handler for `POST /api/session`: registers a new account or logs an
/// existing one in, then issues a session.
///
/// On success the session cookie is set and the body carries the user info.
/// Responds 201 for a registration, 200 for a login, 400 on validation
/// failure, 401 on bad credentials and 409 when the email is already
/// registered.
pub async fn post_session(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(data): Json<SessionRequest>,
) -> Response {
    match data.mode.as_deref() {
        Some("register") => register(state, jar, data),
        Some("login") => log_in(state, jar, data),
        _ => {
            let mut errors = ValidationErrors::new();
            errors.push("mode", "the mode must be 'login' or 'register'");
            errors.into_response()
        }
    }
}

fn register(state: AppState, jar: CookieJar, data: SessionRequest) -> Response {
    let registration = match validate_registration(data) {
        Ok(registration) => registration,
        Err(errors) => return errors.into_response(),
    };

    let password_hash = match PasswordHash::new(&registration.password) {
        Ok(hash) => hash,
        Err(error) => return error.into_response(),
    };

    let mut users = state.user_store.clone();
    let user = match users.create(&registration.name, registration.email, password_hash) {
        Ok(user) => user,
        Err(error) => return error.into_response(),
    };

    open_session(state, jar, &user, StatusCode::CREATED)
}

fn log_in(state: AppState, jar: CookieJar, data: SessionRequest) -> Response {
    let login = match validate_login(data) {
        Ok(login) => login,
        Err(errors) => return errors.into_response(),
    };

    let user = match state.user_store.get_by_email(&login.email) {
        Ok(user) => user,
        Err(Error::NotFound) => return Error::InvalidCredentials.into_response(),
        Err(error) => return error.into_response(),
    };

    // Legacy name-only accounts have no hash and cannot log in.
    let verified = user
        .password_hash()
        .is_some_and(|hash| hash.verify(&login.password));

    if !verified {
        return Error::InvalidCredentials.into_response();
    }

    open_session(state, jar, &user, StatusCode::OK)
}

fn open_session(state: AppState, jar: CookieJar, user: &User, status_code: StatusCode) -> Response {
    let mut sessions = state.session_store.clone();

    match auth::create_session(&mut sessions, user.id()) {
        Ok(session) => {
            let jar = set_session_cookie(jar, &session, state.secure_cookies);
            (status_code, jar, Json(SessionResponse::for_user(user))).into_response()
        }
        Err(error) => error.into_response(),
    }
}

/// Handler for `GET /api/session`: resolves the session cookie.
///
/// Responds 200 with the user info for a valid session, 401 otherwise.
pub async fn get_session(State(state): State<AppState>, jar: CookieJar) -> Response {
    let Some(token) = session_token_from_jar(&jar) else {
        return unauthenticated_response();
    };

    let mut sessions = state.session_store.clone();

    match auth::resolve_session(&mut sessions, &state.user_store, &token) {
        Ok(Some(user)) => {
            (StatusCode::OK, Json(SessionResponse::for_user(&user))).into_response()
        }
        Ok(None) => unauthenticated_response(),
        Err(error) => error.into_response(),
    }
}

/// Handler for `DELETE /api/session`: logs the user out.
///
/// Deletes the session matching the cookie token if one is present and
/// always clears the cookie. Responds 200 even when there was no session to
/// delete.
pub async fn delete_session(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(token) = session_token_from_jar(&jar) {
        let mut sessions = state.session_store.clone();

        if let Err(error) = auth::destroy_session(&mut sessions, &token) {
            return error.into_response();
        }
    }

    let jar = clear_session_cookie(jar, state.secure_cookies);

    (
        StatusCode::OK,
        jar,
        Json(json!({ "authenticated": false })),
    )
        .into_response()
}
