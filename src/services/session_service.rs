//! Sign-in and sign-out against the backend. The token lives only in memory.

use tracing::{info, warn};

use crate::{
    dto::{admin::SessionStatus, competition::SignInRequest},
    error::ServiceError,
    state::SharedState,
};

/// Exchange credentials for a bearer token and install it.
pub async fn sign_in(
    state: &SharedState,
    credentials: SignInRequest,
) -> Result<SessionStatus, ServiceError> {
    let email = credentials.email.clone();
    let response = state.api().sign_in(credentials).await?;
    let Some(token) = response.jwt_token else {
        warn!(email, "sign-in response carried no token");
        return Err(ServiceError::Unauthorized("sign-in returned no token".into()));
    };

    state.session().install_token(token.access_token).await;
    info!(email, "signed in to the scoreboard backend");
    Ok(status(state).await)
}

/// Drop the token and the open manage board.
pub async fn sign_out(state: &SharedState) -> SessionStatus {
    state.session().sign_out().await;
    state.manage().write().await.take();
    status(state).await
}

/// Whether a token is installed.
pub async fn status(state: &SharedState) -> SessionStatus {
    SessionStatus {
        signed_in: state.session().is_signed_in().await,
    }
}
