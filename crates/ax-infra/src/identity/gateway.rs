//! Identity provider HTTP gateway.
//!
//! Speaks the GoTrue-style REST contract: password grant, signup with
//! metadata, bearer identity fetch and logout. Any non-success response is
//! surfaced as one uniform failure wrapping the provider's message.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use ax_core::auth::UserProfile;
use ax_core::ports::{CreatedAccount, CredentialGatewayPort, GatewayError, ProviderSession};
use ax_core::SecretString;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct HttpCredentialGateway {
    http: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct UserDto {
    id: String,
    email: Option<String>,
    user_metadata: Option<UserMetadataDto>,
}

#[derive(Debug, Deserialize)]
struct UserMetadataDto {
    name: Option<String>,
}

/// Token-grant and signup responses share this shape. Signup with email
/// confirmation enabled returns the bare user object instead, covered by the
/// flattened optional fields.
#[derive(Debug, Deserialize)]
struct SessionDto {
    access_token: Option<String>,
    refresh_token: Option<String>,
    user: Option<UserDto>,
    // Bare-user signup shape.
    id: Option<String>,
    email: Option<String>,
    user_metadata: Option<UserMetadataDto>,
}

#[derive(Debug, Deserialize)]
struct ErrorDto {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
}

impl HttpCredentialGateway {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn password_grant(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<ProviderSession, GatewayError> {
        let response = self
            .http
            .post(self.endpoint("/auth/v1/token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email, "password": password.expose() }))
            .send()
            .await
            .map_err(transport)?;

        let body = Self::parse_session(response).await?;
        let user = body
            .user
            .map(user_from_dto)
            .ok_or_else(|| GatewayError::Transport("token response carried no user".into()))?;
        match (body.access_token, body.refresh_token) {
            (Some(access), Some(refresh)) if !access.is_empty() && !refresh.is_empty() => {
                Ok(ProviderSession {
                    user,
                    access_token: access,
                    refresh_token: refresh,
                })
            }
            _ => Err(GatewayError::Transport(
                "token response carried no session".into(),
            )),
        }
    }

    async fn parse_session(response: Response) -> Result<SessionDto, GatewayError> {
        if !response.status().is_success() {
            return Err(GatewayError::Rejected(Self::error_message(response).await));
        }
        response.json::<SessionDto>().await.map_err(transport)
    }

    async fn error_message(response: Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        serde_json::from_str::<ErrorDto>(&body)
            .ok()
            .and_then(|err| err.error_description.or(err.msg).or(err.message))
            .unwrap_or_else(|| format!("provider returned {status}"))
    }
}

#[async_trait]
impl CredentialGatewayPort for HttpCredentialGateway {
    async fn validate_credentials(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<(), GatewayError> {
        // The provider has no dedicated password-check endpoint, so this is
        // a login handshake whose probe session is revoked immediately.
        // Nothing is persisted here.
        let probe = self.password_grant(email, password).await?;

        if let Err(err) = self.revoke_server_session(&probe.access_token).await {
            warn!(error = %err, "probe session revoke failed after credential validation");
        }
        debug!(email, "credentials validated without keeping a session");
        Ok(())
    }

    async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<ProviderSession, GatewayError> {
        self.password_grant(email, password).await
    }

    async fn create_account(
        &self,
        email: &str,
        password: &SecretString,
        name: &str,
    ) -> Result<CreatedAccount, GatewayError> {
        let response = self
            .http
            .post(self.endpoint("/auth/v1/signup"))
            .header("apikey", &self.api_key)
            .json(&json!({
                "email": email,
                "password": password.expose(),
                "data": { "name": name },
            }))
            .send()
            .await
            .map_err(transport)?;

        let body = Self::parse_session(response).await?;

        let user = match body.user {
            Some(user) => Some(user_from_dto(user)),
            None => body.id.map(|id| {
                UserProfile::new(
                    id,
                    body.user_metadata.and_then(|m| m.name).unwrap_or_default(),
                    body.email.unwrap_or_default(),
                )
            }),
        };

        Ok(CreatedAccount {
            user,
            access_token: body.access_token.unwrap_or_default(),
            refresh_token: body.refresh_token.unwrap_or_default(),
        })
    }

    async fn fetch_current_identity(
        &self,
        access_token: &str,
    ) -> Result<UserProfile, GatewayError> {
        let response = self
            .http
            .get(self.endpoint("/auth/v1/user"))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport)?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(GatewayError::NoSession),
            status if !status.is_success() => {
                Err(GatewayError::Rejected(Self::error_message(response).await))
            }
            _ => {
                let user = response.json::<UserDto>().await.map_err(transport)?;
                Ok(user_from_dto(user))
            }
        }
    }

    async fn revoke_server_session(&self, access_token: &str) -> Result<(), GatewayError> {
        let response = self
            .http
            .post(self.endpoint("/auth/v1/logout"))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(GatewayError::Rejected(Self::error_message(response).await))
        }
    }
}

fn transport(err: reqwest::Error) -> GatewayError {
    GatewayError::Transport(err.to_string())
}

fn user_from_dto(dto: UserDto) -> UserProfile {
    UserProfile::new(
        dto.id,
        dto.user_metadata.and_then(|m| m.name).unwrap_or_default(),
        dto.email.unwrap_or_default(),
    )
}
