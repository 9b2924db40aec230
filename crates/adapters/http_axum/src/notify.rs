//! Default [`CodeSender`]: writes verification codes to the log.
//!
//! Deployments that deliver real SMS plug their own sender into
//! [`crate::state::AppState`].

use std::future::{Future, ready};

use community_app::ports::CodeSender;
use community_domain::error::CommunityError;
use community_domain::verification::VerificationCode;

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingCodeSender;

impl CodeSender for TracingCodeSender {
    fn send_code(
        &self,
        code: &VerificationCode,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send {
        tracing::info!(
            mobile = %code.mobile,
            event = code.event.as_str(),
            code = %code.code,
            expires_at = code.expires_at.timestamp(),
            "verification code issued"
        );
        ready(Ok(()))
    }
}
