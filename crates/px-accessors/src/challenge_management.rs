//! Challenge management accessor: PX-hosted challenge sessions (captcha
//! style) run before a card is added.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::AccessorConfig;
use crate::context::AccessorContext;
use crate::error::AccessorError;
use crate::http::ServiceClient;

pub const SERVICE: &str = "ChallengeManagementService";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeSession {
    pub session_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub challenge_type: Option<String>,
}

impl ChallengeSession {
    pub fn is_completed(&self) -> bool {
        self.status.eq_ignore_ascii_case("completed")
    }
}

#[async_trait]
pub trait ChallengeManagementAccessor: Send + Sync {
    async fn create_challenge_session(
        &self,
        ctx: &AccessorContext,
        request: &Value,
    ) -> Result<ChallengeSession, AccessorError>;

    async fn get_challenge_status(
        &self,
        ctx: &AccessorContext,
        session_id: &str,
    ) -> Result<ChallengeSession, AccessorError>;
}

#[derive(Debug, Clone)]
pub struct HttpChallengeManagementAccessor {
    client: ServiceClient,
}

impl HttpChallengeManagementAccessor {
    pub fn new(config: AccessorConfig) -> Result<Self, AccessorError> {
        Ok(Self {
            client: ServiceClient::new(SERVICE, config)?,
        })
    }
}

#[async_trait]
impl ChallengeManagementAccessor for HttpChallengeManagementAccessor {
    async fn create_challenge_session(
        &self,
        ctx: &AccessorContext,
        request: &Value,
    ) -> Result<ChallengeSession, AccessorError> {
        self.client
            .post_json(ctx, "challengesession", &[], request, "CreateChallengeSession")
            .await
    }

    async fn get_challenge_status(
        &self,
        ctx: &AccessorContext,
        session_id: &str,
    ) -> Result<ChallengeSession, AccessorError> {
        self.client
            .get_json(
                ctx,
                &format!("challengesession/{session_id}/status"),
                &[],
                "GetChallengeStatus",
            )
            .await
    }
}
