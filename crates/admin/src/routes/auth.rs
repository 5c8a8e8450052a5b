//! Login, logout and the root redirect.

use aigenthix_core::{Email, LoginRequest};
use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::{StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use crate::api::ApiErrorKind;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::middleware::AuthCookie;
use crate::middleware::guard::{LANDING_PATH, safe_return_target};
use crate::panel::AuthSession;
use crate::state::AppState;
use crate::storage::{auth_cookie, expired_auth_cookie};

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/login", get(login_page).post(login))
        .route("/logout", axum::routing::post(logout))
}

/// Send signed-in visitors to the dashboard and everyone else to login.
///
/// GET /
async fn root(AuthCookie(token): AuthCookie) -> Redirect {
    if token.is_some() {
        Redirect::to(LANDING_PATH)
    } else {
        Redirect::to("/login")
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub redirect: Option<String>,
}

/// Login form view.
#[derive(Debug, Serialize)]
pub struct LoginView {
    pub fields: [&'static str; 2],
    pub redirect: Option<String>,
}

/// GET /login
async fn login_page(Query(query): Query<LoginQuery>) -> Json<LoginView> {
    Json(LoginView {
        fields: ["email", "password"],
        redirect: query.redirect,
    })
}

/// Login form submission.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub redirect: Option<String>,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("redirect", &self.redirect)
            .finish()
    }
}

fn login_rejected(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "ok": false, "error": message })),
    )
        .into_response()
}

/// Exchange credentials for a token and mirror it into the `auth_token` cookie.
///
/// POST /login
#[instrument(skip(state, form), fields(email = %form.email))]
async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let email = match Email::parse(&form.email) {
        Ok(email) => email,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "ok": false, "error": e.to_string() })),
            )
                .into_response();
        }
    };
    let request = LoginRequest::new(email, form.password);

    let mut session = AuthSession::load(state.auth());
    match session.login(&request).await {
        Ok(response) => {
            set_sentry_user(response.user.id.get(), Some(&response.user.email));
            let cookie = auth_cookie(&response.token, state.config().secure_cookies());
            let target = safe_return_target(form.redirect.as_deref());
            tracing::info!(user_id = %response.user.id, %target, "Operator logged in");
            ([(SET_COOKIE, cookie.to_string())], Redirect::to(&target)).into_response()
        }
        Err(AppError::Api(err)) if !err.is_timeout() && err.kind() != ApiErrorKind::Network => {
            login_rejected(err.message())
        }
        Err(err) => err.into_response(),
    }
}

/// Clear the cookie and return to login.
///
/// POST /logout
async fn logout() -> impl IntoResponse {
    clear_sentry_user();
    (
        [(SET_COOKIE, expired_auth_cookie().to_string())],
        Redirect::to("/login"),
    )
}
