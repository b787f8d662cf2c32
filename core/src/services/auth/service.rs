//! Main authentication session service implementation

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, error, info, warn};

use crate::clock::Clock;
use crate::domain::entities::session::{mask_session_id, ClientMetadata, RefreshSession};
use crate::domain::value_objects::LoginResponse;
use crate::errors::{AuthError, CredentialError, DomainError, DomainResult, SessionError};
use crate::repositories::{CredentialVerifier, RefreshSessionStore};
use crate::services::token::TokenSigner;

use super::config::AuthSessionConfig;
use super::session_id::{RandomSessionIdGenerator, SessionIdGenerator};

/// Coordinates credential checks, token issuance and refresh sessions
///
/// Owns no state of its own beyond handles to its collaborators, which are
/// built once at startup and shared.
pub struct AuthSessionService {
    /// Credential check for login
    credentials: Arc<dyn CredentialVerifier>,
    /// Refresh session persistence
    sessions: Arc<dyn RefreshSessionStore>,
    /// Access token signer
    signer: Arc<dyn TokenSigner>,
    clock: Arc<dyn Clock>,
    id_generator: Arc<dyn SessionIdGenerator>,
    /// Service configuration
    config: AuthSessionConfig,
}

impl AuthSessionService {
    /// Create a new authentication session service
    ///
    /// # Arguments
    ///
    /// * `credentials` - Verifier consulted on login
    /// * `sessions` - Store for refresh sessions
    /// * `signer` - Access token signer
    /// * `clock` - Time source for session timestamps
    /// * `config` - Service configuration
    pub fn new(
        credentials: Arc<dyn CredentialVerifier>,
        sessions: Arc<dyn RefreshSessionStore>,
        signer: Arc<dyn TokenSigner>,
        clock: Arc<dyn Clock>,
        config: AuthSessionConfig,
    ) -> Self {
        let id_generator: Arc<dyn SessionIdGenerator> =
            Arc::new(RandomSessionIdGenerator::new(config.refresh_id_bytes));
        Self {
            credentials,
            sessions,
            signer,
            clock,
            id_generator,
            config,
        }
    }

    /// Replace the identifier generator
    pub fn with_id_generator(mut self, id_generator: Arc<dyn SessionIdGenerator>) -> Self {
        self.id_generator = id_generator;
        self
    }

    pub fn config(&self) -> &AuthSessionConfig {
        &self.config
    }

    /// Authenticate and issue an access token plus a new refresh session
    ///
    /// # Arguments
    ///
    /// * `identifier` - Login identifier (email)
    /// * `secret` - Password
    /// * `client` - Client metadata recorded on the session
    ///
    /// # Returns
    ///
    /// * `Ok(LoginResponse)` - Access token and refresh identifier
    /// * `Err(AuthError::InvalidCredentials)` - Unknown identifier or wrong secret
    /// * `Err(TokenError::TokenIssuanceFailed)` - Signing failed
    /// * `Err(SessionError::CreationFailed)` - No free identifier after bounded retries
    pub async fn login(
        &self,
        identifier: &str,
        secret: &str,
        client: ClientMetadata,
    ) -> DomainResult<LoginResponse> {
        let subject = match self.credentials.verify_credentials(identifier, secret).await {
            Ok(subject) => subject,
            Err(CredentialError::Unavailable { message }) => {
                error!(error = %message, "credential store unavailable");
                return Err(DomainError::Internal { message });
            }
            Err(reason) => {
                info!(reason = %reason, "login rejected");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        let response = self.issue(&subject, client).await?;
        info!(
            subject = %subject,
            session = %mask_session_id(&response.refresh_token_id),
            "login succeeded"
        );
        Ok(response)
    }

    /// Revoke a refresh session
    ///
    /// Unknown identifiers are treated as already logged out.
    pub async fn logout(&self, refresh_token_id: &str) -> DomainResult<()> {
        let masked = mask_session_id(refresh_token_id);
        match self.sessions.revoke(refresh_token_id).await {
            Ok(()) => {
                info!(session = %masked, "session revoked");
                Ok(())
            }
            Err(DomainError::Session(SessionError::NotFound)) => {
                debug!(session = %masked, "logout for unknown session");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Rotate a refresh session: revoke it and issue a new pair
    ///
    /// The old session is consumed atomically, so concurrent refreshes with
    /// the same identifier produce at most one new pair.
    ///
    /// # Returns
    ///
    /// * `Ok(LoginResponse)` - New access token and refresh identifier
    /// * `Err(SessionError::Invalid)` - Session unknown, expired or revoked
    pub async fn refresh(
        &self,
        refresh_token_id: &str,
        client: ClientMetadata,
    ) -> DomainResult<LoginResponse> {
        let previous = match self.sessions.consume(refresh_token_id).await {
            Ok(session) => session,
            Err(DomainError::Session(SessionError::NotFound | SessionError::Invalid)) => {
                info!(session = %mask_session_id(refresh_token_id), "refresh rejected");
                return Err(SessionError::Invalid.into());
            }
            Err(e) => return Err(e),
        };

        let response = self.issue(&previous.subject, client).await?;
        info!(
            subject = %previous.subject,
            from = %previous.masked_id(),
            to = %mask_session_id(&response.refresh_token_id),
            "session rotated"
        );
        Ok(response)
    }

    /// Verify an access token and return its subject
    pub fn verify_access_token(&self, token: &str) -> DomainResult<String> {
        self.signer.parse_subject(token)
    }

    async fn issue(&self, subject: &str, client: ClientMetadata) -> DomainResult<LoginResponse> {
        let access_token = self.signer.create_access_token(subject)?;
        let refresh_token_id = self.create_session(subject, client).await?;

        Ok(LoginResponse {
            access_expires_in: access_token.expires_in(),
            access_token: access_token.into_string(),
            refresh_token_id,
            refresh_endpoint: self.config.refresh_endpoint.clone(),
            refresh_max_age_seconds: self.config.refresh_max_age_seconds,
        })
    }

    /// Store a new session under a fresh identifier, retrying on collisions
    async fn create_session(&self, subject: &str, client: ClientMetadata) -> DomainResult<String> {
        let attempts = self.config.max_create_attempts.max(1);
        let ttl = Duration::try_seconds(self.config.refresh_max_age_seconds)
            .filter(|ttl| self.clock.now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| {
                DomainError::internal(format!(
                    "refresh lifetime of {} seconds is out of range",
                    self.config.refresh_max_age_seconds
                ))
            })?;

        for attempt in 1..=attempts {
            let id = self.id_generator.generate();
            let session = RefreshSession::new(
                id.clone(),
                subject.to_string(),
                self.clock.now(),
                ttl,
                client.clone(),
            );

            match self.sessions.create_session(&id, session).await {
                Ok(()) => return Ok(id),
                Err(DomainError::Session(SessionError::AlreadyExists)) => {
                    warn!(attempt, "refresh session id collision");
                }
                Err(e) => return Err(e),
            }
        }

        error!(attempts, "could not allocate a refresh session id");
        Err(SessionError::CreationFailed { attempts }.into())
    }
}
