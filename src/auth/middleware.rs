use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use chrono::Utc;
use futures::future::LocalBoxFuture;

use crate::{
    auth::{
        context::AuthenticationContext,
        jwt::{Rejection, TokenValidator},
        policy::{AuthorizationPolicy, HEALTH_PATH, INFO_PATH, LOGIN_PATH, RANDOM_QUESTIONS_PATH},
    },
    errors::AppError,
    middleware::get_request_id,
};

const BEARER_PREFIX: &str = "Bearer ";

/// Paths that skip token inspection entirely. Compared by exact equality.
pub const EXEMPT_PATHS: [&str; 4] = [LOGIN_PATH, RANDOM_QUESTIONS_PATH, HEALTH_PATH, INFO_PATH];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authentication {
    Bypassed,
    Anonymous,
    Authenticated(AuthenticationContext),
    Rejected(Rejection),
}

/// Returns the token only for the exact `Bearer <token>` shape. Anything
/// else counts as no token at all.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    header
        .and_then(|h| h.strip_prefix(BEARER_PREFIX))
        .filter(|token| !token.trim().is_empty())
}

pub struct RequestAuthenticator {
    validator: TokenValidator,
}

impl RequestAuthenticator {
    pub fn new(validator: TokenValidator) -> Self {
        Self { validator }
    }

    pub fn is_exempt(path: &str) -> bool {
        EXEMPT_PATHS.contains(&path)
    }

    /// `existing` is whatever an earlier stage of the same request already
    /// established; it is never replaced by a later token's identity.
    pub fn authenticate(
        &self,
        path: &str,
        authorization: Option<&str>,
        existing: Option<&AuthenticationContext>,
        now: i64,
    ) -> Authentication {
        if Self::is_exempt(path) {
            return Authentication::Bypassed;
        }

        let Some(token) = bearer_token(authorization) else {
            return match existing {
                Some(ctx) => Authentication::Authenticated(ctx.clone()),
                None => Authentication::Anonymous,
            };
        };

        match self.validator.validate(token, now) {
            Err(rejection) => Authentication::Rejected(rejection),
            Ok(claims) => match existing {
                Some(ctx) => {
                    if ctx.username != claims.sub {
                        log::warn!(
                            "Ignoring token for '{}', request already authenticated as '{}'",
                            claims.sub,
                            ctx.username
                        );
                    }
                    Authentication::Authenticated(ctx.clone())
                }
                None => Authentication::Authenticated(AuthenticationContext::from_claims(claims)),
            },
        }
    }
}

/// Authenticates the bearer token, then applies the authorization policy,
/// before any handler runs.
#[derive(Clone)]
pub struct AuthMiddleware {
    authenticator: Arc<RequestAuthenticator>,
    policy: Arc<AuthorizationPolicy>,
}

impl AuthMiddleware {
    pub fn new(authenticator: Arc<RequestAuthenticator>, policy: Arc<AuthorizationPolicy>) -> Self {
        Self {
            authenticator,
            policy,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            authenticator: Arc::clone(&self.authenticator),
            policy: Arc::clone(&self.policy),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    authenticator: Arc<RequestAuthenticator>,
    policy: Arc<AuthorizationPolicy>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let authenticator = Arc::clone(&self.authenticator);
        let policy = Arc::clone(&self.policy);

        Box::pin(async move {
            // Percent-decoded, the same path the router matches on.
            let path = req.match_info().as_str().to_string();
            let request_id = get_request_id(req.request()).unwrap_or_default();
            let existing = req.extensions().get::<AuthenticationContext>().cloned();
            let header = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|h| h.to_str().ok());

            let outcome = authenticator.authenticate(
                &path,
                header,
                existing.as_ref(),
                Utc::now().timestamp(),
            );

            let context = match outcome {
                Authentication::Rejected(reason) => {
                    log::warn!(
                        "Rejected bearer token on {} [{}]: {}",
                        path,
                        request_id,
                        reason
                    );
                    return Ok(req
                        .error_response(AppError::InvalidToken)
                        .map_into_right_body());
                }
                Authentication::Authenticated(ctx) => Some(ctx),
                Authentication::Bypassed | Authentication::Anonymous => None,
            };

            if let Err(err) = policy.authorize_request(req.method(), &path, context.as_ref()) {
                log::info!("Denied {} {} [{}]: {}", req.method(), path, request_id, err);
                return Ok(req.error_response(err).map_into_right_body());
            }

            if let Some(ctx) = context {
                if existing.is_none() {
                    req.extensions_mut().insert(ctx);
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Extractor for the caller's identity in protected handlers.
pub struct AuthenticatedUser(pub AuthenticationContext);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let context = req
            .extensions()
            .get::<AuthenticationContext>()
            .cloned()
            .ok_or(AppError::Unauthorized);

        ready(context.map(AuthenticatedUser))
    }
}
