/// JWT authentication middleware for Bearer token validation.
/// Validates the token and attaches the authenticated identity to request
/// extensions as an explicit `CurrentUser` context; handlers receive it via
/// the `FromRequest` extractor and pass it on to the services — there is no
/// ambient "current request user" anywhere else.
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use uuid::Uuid;

use crate::error::AppError;
use crate::security::jwt;

/// Authenticated identity extracted from JWT claims.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
}

fn auth_error(message: &str) -> Error {
    AppError::Authentication(message.to_string()).into()
}

/// JWT authentication middleware factory
pub struct JwtAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            // Read headers (immutable borrow) into an owned String before
            // touching extensions_mut; no RefCell borrows may overlap.
            let auth_header = match req.headers().get("Authorization") {
                Some(header) => match header.to_str() {
                    Ok(h) => h.to_string(),
                    Err(_) => {
                        return Err(auth_error("Invalid Authorization header"));
                    }
                },
                None => {
                    return Err(auth_error("Missing Authorization header"));
                }
            };

            let token = match auth_header.strip_prefix("Bearer ") {
                Some(t) => t,
                None => {
                    return Err(auth_error("Invalid Authorization scheme, expected Bearer"));
                }
            };

            let current_user = match jwt::validate_token(token) {
                Ok(token_data) => match Uuid::parse_str(&token_data.claims.sub) {
                    Ok(id) => CurrentUser {
                        id,
                        name: token_data.claims.name,
                    },
                    Err(_) => {
                        return Err(auth_error("Invalid user ID in token"));
                    }
                },
                Err(e) => {
                    tracing::debug!("Token validation failed: {}", e);
                    return Err(auth_error("Invalid or expired token"));
                }
            };

            req.extensions_mut().insert(current_user);

            let res = service.call(req).await?;
            Ok(res)
        })
    }
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<CurrentUser>().cloned() {
            Some(user) => ready(Ok(user)),
            None => ready(Err(auth_error(
                "Authenticated user missing in request extensions",
            ))),
        }
    }
}
