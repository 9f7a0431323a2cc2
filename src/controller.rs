use actix_web::{HttpRequest, HttpResponse};
use actix_web::http::StatusCode;
use crate::entity::QuotaEntity;
use crate::error::Error;
use crate::store::Store;

pub(crate) type FromRequestFunc<I> = Box<dyn Fn(&HttpRequest) -> I + 'static>;

pub(crate) type FromRequestOnEntity<R> = Box<dyn Fn(&HttpRequest, &QuotaEntity) -> R + 'static>;

pub(crate) type FromRequestOnError<E, R> = Box<dyn Fn(&HttpRequest, E) -> R + 'static>;

/// [Controller] is a set of functions deciding how requests are
/// identified and how each verdict is answered.
///
/// Any function left unset falls back to its default:
/// - `do_rate_limit`: every request is checked.
/// - `find_identifier`: the peer IP address.
/// - `on_reject`: `403 Forbidden` with [DEFAULT_REJECT_MESSAGE].
/// - `on_error`: `500 Internal Server Error`, the error itself is not exposed.
/// - `on_ok`: nothing, the request proceeds.
pub struct Controller<T: Store> {
    pub(crate) fn_do_rate_limit: Option<FromRequestFunc<bool>>,
    pub(crate) fn_find_identifier: Option<FromRequestFunc<String>>,
    pub(crate) fn_on_reject: Option<FromRequestOnEntity<HttpResponse>>,
    pub(crate) fn_on_error: Option<FromRequestOnError<Error<T::Error>, HttpResponse>>,
    pub(crate) fn_on_ok: Option<FromRequestOnEntity<()>>,
}

impl<T: Store> Controller<T> {
    /// Create a default Controller
    pub fn new() -> Self {
        Self {
            fn_do_rate_limit: None,
            fn_find_identifier: None,
            fn_on_reject: None,
            fn_on_error: None,
            fn_on_ok: None,
        }
    }

    /// Requests for which `f` returns `false` skip the check entirely,
    /// and get no quota headers.
    pub fn with_do_rate_limit(mut self, f: impl Fn(&HttpRequest) -> bool + 'static) -> Self {
        self.fn_do_rate_limit = Some(Box::new(f));
        self
    }

    /// `f` returns the caller key the quota is tracked by.
    pub fn with_find_identifier(mut self, f: impl Fn(&HttpRequest) -> String + 'static) -> Self {
        self.fn_find_identifier = Some(Box::new(f));
        self
    }

    /// Invoked when the quota is exhausted. The quota headers are added
    /// to the returned response.
    pub fn on_reject(mut self, f: impl Fn(&HttpRequest, &QuotaEntity) -> HttpResponse + 'static) -> Self {
        self.fn_on_reject = Some(Box::new(f));
        self
    }

    /// Invoked when the store or the stored record fails.
    pub fn on_error(mut self, f: impl Fn(&HttpRequest, Error<T::Error>) -> HttpResponse + 'static) -> Self {
        self.fn_on_error = Some(Box::new(f));
        self
    }

    /// Invoked before an admitted request is passed on.
    pub fn on_ok(mut self, f: impl Fn(&HttpRequest, &QuotaEntity) + 'static) -> Self {
        self.fn_on_ok = Some(Box::new(f));
        self
    }
}

impl<T: Store> Default for Controller<T> {
    /// alias of [Self::new]
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn default_do_rate_limit(_: &HttpRequest) -> bool {
    true
}

pub(crate) fn default_find_identifier(req: &HttpRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or("<Unknown Source IP>".to_string())
}

pub const DEFAULT_REJECT_MESSAGE: &str = "access limit exceeded, please check the headers and try again later";

pub(crate) fn default_on_reject(_: &HttpRequest, _: &QuotaEntity) -> HttpResponse {
    HttpResponse::build(StatusCode::FORBIDDEN).body(DEFAULT_REJECT_MESSAGE)
}

pub(crate) fn default_on_error<E>(_: &HttpRequest, _: Error<E>) -> HttpResponse {
    HttpResponse::new(StatusCode::INTERNAL_SERVER_ERROR)
}

pub(crate) fn default_on_ok(_: &HttpRequest, _: &QuotaEntity) {}
