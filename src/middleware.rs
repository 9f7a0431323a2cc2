use std::rc::Rc;
use actix_web::{HttpRequest, HttpResponse};
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use crate::codec::{Codec, JsonCodec};
use crate::controller::{self, Controller, FromRequestFunc, FromRequestOnEntity, FromRequestOnError};
use crate::entity::QuotaEntity;
use crate::error::Error;
use crate::gate::RateGate;
use crate::store::Store;
use crate::utils::{insert_quota_headers, RateLimitState};

/// [RateLimit] is the `actix-web` middleware running a [RateGate]
/// for every request.
///
/// Admitted and rejected responses carry the `X-RateLimit-Limit`,
/// `X-RateLimit-Remaining` and `X-RateLimit-Reset` headers.
/// Responses produced by `on_error` carry none of them, and neither
/// does an error returned by the wrapped service: `actix-web` renders
/// that error after this middleware has returned.
pub struct RateLimit<T: Store, C: Codec = JsonCodec> {
    inner: Rc<RateLimitInner<T, C>>,
}

struct RateLimitInner<T: Store, C: Codec> {
    pub gate: RateGate<T, C>,
    pub fn_do_rate_limit: FromRequestFunc<bool>,
    pub fn_find_identifier: FromRequestFunc<String>,
    pub fn_on_reject: FromRequestOnEntity<HttpResponse>,
    pub fn_on_error: FromRequestOnError<Error<T::Error>, HttpResponse>,
    pub fn_on_ok: FromRequestOnEntity<()>,
}

impl<T, C, S, B> Transform<S, ServiceRequest> for RateLimit<T, C>
    where
        T: Store + 'static,
        C: Codec + 'static,
        S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
        S::Future: 'static,
        B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = S::Error;
    type Transform = RateLimitService<T, C, S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitService {
            inner: self.inner.clone(),
            service: Rc::new(service),
        }))
    }
}

pub struct RateLimitService<T, C, S>
    where
        T: Store,
        C: Codec,
{
    inner: Rc<RateLimitInner<T, C>>,
    service: Rc<S>,
}

impl<T, C, S, B> Service<ServiceRequest> for RateLimitService<T, C, S>
    where
        T: Store + 'static,
        C: Codec + 'static,
        S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
        S::Future: 'static,
        B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = S::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, svc: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let inner = self.inner.clone();

        Box::pin(async move {
            let entity = {
                let req = svc.request();

                // already checked by an outer RateLimit, or not to be checked at all.
                if RateLimitState::checked(req) || !(inner.fn_do_rate_limit)(req) {
                    None
                } else {
                    let identifier = (inner.fn_find_identifier)(req);

                    let verdict = match inner.gate.validate(&identifier).await {
                        Err(e) => {
                            RateLimitState::check(req, None);
                            let body = (inner.fn_on_error)(req, e);
                            return Ok(svc.into_response(body.map_into_right_body()));
                        },
                        Ok(verdict) => verdict,
                    };

                    RateLimitState::check(req, Some(verdict));

                    if !verdict.admitted {
                        let mut body = (inner.fn_on_reject)(req, &verdict.entity);
                        insert_quota_headers(body.headers_mut(), &verdict.entity);
                        return Ok(svc.into_response(body.map_into_right_body()));
                    }

                    (inner.fn_on_ok)(req, &verdict.entity);
                    Some(verdict.entity)
                }
            };

            // the router needs the only handle to the request,
            // so nothing may hold a clone of it past this point.
            let mut res = service.call(svc).await?;
            if let Some(entity) = entity {
                insert_quota_headers(res.headers_mut(), &entity);
            }
            Ok(res.map_into_left_body())
        })
    }
}

impl<T: Store + 'static, C: Codec> RateLimit<T, C> {
    /// create a new [RateLimit] middleware from a [RateGate] and a [Controller].
    pub fn new(gate: RateGate<T, C>, controller: Controller<T>) -> Self {
        Self {
            inner: Rc::new(RateLimitInner {
                gate,
                fn_do_rate_limit: controller.fn_do_rate_limit
                    .unwrap_or(Box::new(controller::default_do_rate_limit)),
                fn_find_identifier: controller.fn_find_identifier
                    .unwrap_or(Box::new(controller::default_find_identifier)),
                fn_on_reject: controller.fn_on_reject
                    .unwrap_or(Box::new(controller::default_on_reject)),
                fn_on_error: controller.fn_on_error
                    .unwrap_or(Box::new(controller::default_on_error::<T::Error>)),
                fn_on_ok: controller.fn_on_ok
                    .unwrap_or(Box::new(controller::default_on_ok)),
            })
        }
    }

    /// create a new [RateLimit] middleware with default functions.
    pub fn new_default(gate: RateGate<T, C>) -> Self {
        Self::new(gate, Controller::default())
    }
}

/// Reads the quota of `req` from its [RateLimitState], if it was admitted or rejected.
pub fn quota_of(req: &HttpRequest) -> Option<QuotaEntity> {
    RateLimitState::from_request(req)
        .and_then(|state| state.get_verdict().map(|verdict| verdict.entity))
}
