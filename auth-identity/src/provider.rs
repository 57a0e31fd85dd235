//! Identity provider collaborator
//!
//! The provider is the only producer of [`Session`] values. Sign-in is a
//! two-step phone/OTP exchange: the provider texts a one-time code, and a
//! matching code yields the user's session.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

use crate::config::IdentityConfig;
use crate::error::{AuthError, Result};
use crate::models::{OtpRequest, OtpVerifyRequest, Session};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Ask the provider to send a one-time code to `phone`
    async fn request_otp(&self, phone: &str) -> Result<()>;

    /// Exchange a one-time code for the user's session
    async fn verify_otp(&self, phone: &str, otp: &str) -> Result<Session>;
}

/// Identity provider reached over HTTP
pub struct HttpIdentityProvider {
    config: IdentityConfig,
    client: reqwest::Client,
}

impl HttpIdentityProvider {
    pub fn new(config: IdentityConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AuthError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn post<T: serde::Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AuthError::Rejected),
            status => Err(AuthError::Provider(format!("Unexpected status: {}", status))),
        }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn request_otp(&self, phone: &str) -> Result<()> {
        self.post("auth/otp/request", &OtpRequest { phone_number: phone }).await?;
        Ok(())
    }

    async fn verify_otp(&self, phone: &str, otp: &str) -> Result<Session> {
        let response = self
            .post("auth/otp/verify", &OtpVerifyRequest { phone_number: phone, otp })
            .await?;

        let body = response
            .bytes()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        Ok(serde_json::from_slice(&body)?)
    }
}
