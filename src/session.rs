//! Process-wide session status.
//!
//! Queried once at startup and again only after login, registration or
//! logout.  Every screen reads the same [`SessionStatus`] from the app state
//! instead of asking the backend on its own.

use crate::api::NewsApi;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStatus {
    pub logged_in: bool,
    pub admin: bool,
}

impl SessionStatus {
    /// Ask the backend who we are.
    ///
    /// Any failure yields a logged-out, non-admin status: the UI keeps working
    /// and simply hides what needs a session.
    pub async fn query(api: &dyn NewsApi) -> Self {
        let logged_in = api.has_session();
        let admin = match api.admin_status().await {
            Ok(admin) => admin,
            Err(e) => {
                tracing::warn!(error = %e, "could not determine session status");
                return Self::default();
            }
        };
        Self {
            logged_in,
            admin: logged_in && admin,
        }
    }
}
