use crate::api::AuthApi;
use crate::config::SessionStore;
use crate::error::{JoinError, JoinResult};
use crate::models::{Registration, User};
use crate::services::contacts::split_full_name;
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::watch;

/// Owns the authenticated user and the API token that goes with it.
pub struct UserService {
    auth: Arc<dyn AuthApi>,
    session: SessionStore,
    guest: Option<(String, String)>,
    user: watch::Sender<Option<User>>,
}

impl UserService {
    pub fn new(
        auth: Arc<dyn AuthApi>,
        session: SessionStore,
        guest: Option<(String, String)>,
    ) -> Self {
        let (user, _) = watch::channel(None);
        UserService {
            auth,
            session,
            guest,
            user,
        }
    }

    pub fn current(&self) -> Option<User> {
        self.user.borrow().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.borrow().is_some()
    }

    pub fn display_name(&self) -> String {
        self.user
            .borrow()
            .as_ref()
            .map(User::display_name)
            .unwrap_or_else(|| "Guest".to_string())
    }

    fn sign_in(&self, user: User) -> User {
        self.auth.set_token(Some(user.token.clone()));
        if let Err(err) = self.session.save(&user) {
            warn!("event=session_save status=error error={}", err);
        }
        info!("event=login status=ok user_id={}", user.id);
        self.user.send_replace(Some(user.clone()));
        user
    }

    pub async fn login(&self, email: &str, password: &str) -> JoinResult<User> {
        let user = self.auth.login(email.trim(), password).await.map_err(|err| {
            warn!("event=login status=error error={}", err);
            err
        })?;
        Ok(self.sign_in(user))
    }

    /// Creates the account and signs straight into it.
    pub async fn register(&self, full_name: &str, email: &str, password: &str) -> JoinResult<User> {
        let (first_name, last_name) = split_full_name(full_name);
        let registration = Registration {
            first_name: &first_name,
            last_name: &last_name,
            email: email.trim(),
            password,
        };
        let user = self.auth.register(&registration).await.map_err(|err| {
            warn!("event=registration status=error error={}", err);
            err
        })?;
        Ok(self.sign_in(user))
    }

    pub async fn login_guest(&self) -> JoinResult<User> {
        let (email, password) = self
            .guest
            .clone()
            .ok_or_else(|| JoinError::Config("no guest account configured".to_string()))?;
        self.login(&email, &password).await
    }

    /// Signs out locally even when the server call fails.
    pub async fn logout(&self) {
        if self.is_logged_in() {
            if let Err(err) = self.auth.logout().await {
                warn!("event=logout status=error error={}", err);
            }
        }
        self.auth.set_token(None);
        if let Err(err) = self.session.clear() {
            warn!("event=session_clear status=error error={}", err);
        }
        self.user.send_replace(None);
        info!("event=logout status=ok");
    }

    /// Picks up the session saved by a previous run, if there is one.
    pub fn restore(&self) -> Option<User> {
        match self.session.load() {
            Ok(Some(user)) => {
                self.auth.set_token(Some(user.token.clone()));
                info!("event=session_restore status=ok user_id={}", user.id);
                self.user.send_replace(Some(user.clone()));
                Some(user)
            }
            Ok(None) => None,
            Err(err) => {
                warn!("event=session_restore status=error error={}", err);
                None
            }
        }
    }
}
