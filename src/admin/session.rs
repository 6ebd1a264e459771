//! Admin sign-in

use thiserror::Error;

use crate::gateway::{GatewayError, Session, SessionAuthority};

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("not signed in")]
    NotSignedIn,

    /// A user-facing form message.
    #[error("{0}")]
    Invalid(String),

    #[error("completed and cancelled orders cannot change status")]
    TerminalOrder,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Proof of an authenticated admin. Every privileged operation is a method
/// on this type, so nothing console-side is reachable without the backend
/// having verified the credential first. There is no separate service
/// credential.
pub struct AdminContext {
    session: Session,
}

impl AdminContext {
    pub async fn sign_in(
        auth: &dyn SessionAuthority,
        email: &str,
        password: &str,
    ) -> Result<Self, AdminError> {
        let session = auth.sign_in_with_password(email, password).await?;
        tracing::info!(admin = %session.user_email, "admin signed in");
        Ok(Self { session })
    }

    /// Rebuilds the context from a still-valid backend session.
    pub async fn resume(auth: &dyn SessionAuthority) -> Result<Self, AdminError> {
        let session = auth.current_session().await.ok_or(AdminError::NotSignedIn)?;
        Ok(Self { session })
    }

    pub fn email(&self) -> &str {
        &self.session.user_email
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Ends the backend session and consumes the context, so no privileged
    /// handle outlives the sign-out.
    pub async fn sign_out(self, auth: &dyn SessionAuthority) -> Result<(), AdminError> {
        auth.sign_out().await?;
        tracing::info!(admin = %self.session.user_email, "admin signed out");
        Ok(())
    }
}
