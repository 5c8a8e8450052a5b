//! Login, logout and whoami.

use aigenthix_core::{Email, LoginRequest};
use serde_json::json;

use super::{CliError, Context, emit};

/// Sign in and store the token and user.
pub async fn login(ctx: &Context, email: &str, password: String) -> Result<(), CliError> {
    let request = LoginRequest::new(Email::parse(email)?, password);
    let auth = ctx.auth();
    let response = auth.login(&request).await?;
    auth.save_auth(&response.token, &response.user)?;
    tracing::info!(user_id = %response.user.id, "Logged in");
    emit(&response.user)
}

/// Remove the stored credential.
pub fn logout(ctx: &Context) -> Result<(), CliError> {
    ctx.auth().clear_auth()?;
    emit(&json!({ "ok": true }))
}

/// Print the stored user.
pub fn whoami(ctx: &Context) -> Result<(), CliError> {
    let auth = ctx.auth();
    if auth.token().is_none() {
        return Err(CliError::NotLoggedIn);
    }
    match auth.stored_user() {
        Some(user) => emit(&user),
        None => Err(CliError::NotLoggedIn),
    }
}
