//! Login, registration, refresh and logout against the user service

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};
use validator::Validate;

use ms_shared::config::endpoints::join;
use ms_shared::{AuthFlowConfig, MessageResponse};

use crate::domain::entities::account::{
    Captcha, CaptchaAnswer, LoginOtpRequest, LoginRequest, RegisterRequest,
    RegistrationOtpRequest, TokenGrant,
};
use crate::domain::entities::session::{Session, SessionState};
use crate::domain::value_objects::{ApiOutcome, LoginOutcome, RegisterOutcome};
use crate::errors::{DomainError, DomainResult};
use crate::gateway::{decode_body, ApiRequest, HttpTransport, RequestGateway};
use crate::session::SessionContext;

/// Authentication client for the user service
pub struct AuthClient<T>
where
    T: HttpTransport,
{
    /// Gateway shared with the resource clients
    gateway: Arc<RequestGateway<T>>,
    /// Which login/registration variant the service exposes
    config: AuthFlowConfig,
}

impl<T> AuthClient<T>
where
    T: HttpTransport + 'static,
{
    /// Create a new authentication client
    ///
    /// # Arguments
    ///
    /// * `gateway` - Request gateway holding the session
    /// * `config` - Login/registration flow variant
    pub fn new(gateway: Arc<RequestGateway<T>>, config: AuthFlowConfig) -> Self {
        Self { gateway, config }
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        self.gateway.session()
    }

    pub fn config(&self) -> &AuthFlowConfig {
        &self.config
    }

    /// Log in with username and password
    ///
    /// A 200 answer establishes the session. A 206 answer means the
    /// service sent an OTP; the session moves to `PendingMfa` and the
    /// returned step carries the `pre_auth_token` for `verify_login_otp`.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        captcha: Option<CaptchaAnswer>,
    ) -> DomainResult<LoginOutcome> {
        let request = LoginRequest::new(username, password).with_captcha(captcha);
        request.validate()?;

        let outcome = self
            .gateway
            .send(ApiRequest::post(self.url("/login")).json(&request)?)
            .await?;

        match outcome {
            ApiOutcome::Success(body) => {
                let grant: TokenGrant = decode_body(body)?;
                let session = self.establish(grant).await?;
                Ok(LoginOutcome::Authenticated(session))
            }
            ApiOutcome::NeedsStep(step) => {
                self.session().begin_pending_step().await?;
                info!(username = %username, "Login requires OTP verification");
                Ok(LoginOutcome::OtpRequired(step))
            }
            ApiOutcome::Suppressed { message, .. } => {
                Err(DomainError::UnexpectedResponse { message })
            }
        }
    }

    /// Complete a login that answered 206
    pub async fn verify_login_otp(
        &self,
        pre_auth_token: &str,
        otp_code: &str,
    ) -> DomainResult<Session> {
        let request = LoginOtpRequest {
            pre_auth_token: pre_auth_token.to_string(),
            otp_code: otp_code.trim().to_string(),
        };
        request.validate()?;

        let grant: TokenGrant = self
            .gateway
            .post(self.url("/login/verify-otp"), &request)
            .await?;
        self.establish(grant).await
    }

    /// Create an account
    ///
    /// Uses `/register/start` when the service runs the staged flow, in
    /// which case the answer is a 206 with a `pre_reg_token`.
    pub async fn register(&self, request: RegisterRequest) -> DomainResult<RegisterOutcome> {
        request.validate()?;

        let path = if self.config.staged_registration {
            "/register/start"
        } else {
            "/register"
        };
        let outcome = self
            .gateway
            .send(ApiRequest::post(self.url(path)).json(&request)?)
            .await?;

        match outcome {
            ApiOutcome::Success(body) => {
                let response: MessageResponse = decode_body(body)?;
                info!(username = %request.username, role = %request.role, "Account registered");
                Ok(RegisterOutcome::Completed {
                    message: response.message,
                })
            }
            ApiOutcome::NeedsStep(step) => {
                self.session().begin_pending_step().await?;
                Ok(RegisterOutcome::OtpRequired(step))
            }
            ApiOutcome::Suppressed { message, .. } => {
                Err(DomainError::UnexpectedResponse { message })
            }
        }
    }

    /// Complete a staged registration with the emailed OTP
    pub async fn verify_registration(
        &self,
        pre_reg_token: &str,
        otp_code: &str,
    ) -> DomainResult<String> {
        let request = RegistrationOtpRequest {
            pre_reg_token: pre_reg_token.to_string(),
            otp_code: otp_code.trim().to_string(),
        };
        request.validate()?;

        let response: MessageResponse = self
            .gateway
            .post(self.url("/register/verify"), &request)
            .await?;
        self.session().end_pending_step().await?;
        Ok(response.message)
    }

    /// Give up on a pending OTP step
    pub async fn abandon_pending_step(&self) -> DomainResult<SessionState> {
        Ok(self.session().end_pending_step().await?)
    }

    /// Fetch a CAPTCHA challenge
    pub async fn new_captcha(&self) -> DomainResult<Captcha> {
        Ok(self.gateway.get(self.url("/captcha/new")).await?)
    }

    /// Refresh the access token outside of a request
    pub async fn refresh(&self) -> DomainResult<String> {
        Ok(self.gateway.refresh().await?)
    }

    /// Resume the session stored by a previous run
    pub async fn restore(&self) -> DomainResult<Option<Session>> {
        Ok(self.session().restore().await?)
    }

    /// Log out and wait for the server notification
    ///
    /// Local credentials are gone before the notification is sent; the
    /// notification itself is best-effort and never fails the logout.
    pub async fn logout(&self) -> ApiOutcome {
        self.clear_local().await;
        self.gateway
            .post_best_effort(self.gateway.endpoints().logout_url())
            .await
    }

    /// Log out without waiting for the server notification
    pub async fn logout_detached(&self) -> JoinHandle<ApiOutcome> {
        self.clear_local().await;
        let gateway = self.gateway.clone();
        tokio::spawn(async move {
            let url = gateway.endpoints().logout_url();
            gateway.post_best_effort(url).await
        })
    }

    async fn clear_local(&self) {
        match self.session().clear().await {
            Ok(true) => info!("Logged out"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "Failed to clear session"),
        }
    }

    async fn establish(&self, grant: TokenGrant) -> DomainResult<Session> {
        Ok(self
            .session()
            .establish(&grant.username, &grant.access_token)
            .await?)
    }

    fn url(&self, path: &str) -> String {
        join(&self.gateway.endpoints().user, path)
    }
}
