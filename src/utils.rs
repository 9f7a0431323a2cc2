use actix_web::{HttpMessage, HttpRequest};
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue};
use crate::entity::QuotaEntity;
use crate::gate::Verdict;

/// Ceiling of the current window.
pub const RATE_LIMIT_LIMIT_HEADER: &str = "x-ratelimit-limit";
/// Requests left in the current window.
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";
/// Epoch seconds when the current window resets.
pub const RATE_LIMIT_RESET_HEADER: &str = "x-ratelimit-reset";

/// [RateLimitState] is attached to every request that went through
/// a [RateLimit](crate::middleware::RateLimit), so handlers can
/// read the caller's quota.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateLimitState {
    pub(crate) verdict: Option<Verdict>,
}

impl RateLimitState {
    pub(crate) fn checked(req: &HttpRequest) -> bool {
        req.extensions().get::<RateLimitState>().is_some()
    }

    pub(crate) fn check(req: &HttpRequest, verdict: Option<Verdict>) {
        req.extensions_mut().insert(RateLimitState { verdict });
    }

    /// The state of `req`, if it was checked.
    pub fn from_request(req: &HttpRequest) -> Option<Self> {
        req.extensions().get::<RateLimitState>().copied()
    }

    /// `None` if the check failed with an error.
    pub fn get_verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }
}

pub(crate) fn insert_quota_headers(headers: &mut HeaderMap, entity: &QuotaEntity) {
    headers.insert(
        HeaderName::from_static(RATE_LIMIT_LIMIT_HEADER),
        HeaderValue::from(entity.total_limit),
    );
    headers.insert(
        HeaderName::from_static(RATE_LIMIT_REMAINING_HEADER),
        HeaderValue::from(entity.times_remaining),
    );
    headers.insert(
        HeaderName::from_static(RATE_LIMIT_RESET_HEADER),
        HeaderValue::from(entity.reset_timestamp),
    );
}
