//! Basic-auth middleware for Actix Web.
//!
//! Every webhook the marketplace sends carries the basic-auth credentials the vendor registered with it: the
//! add-on slug as the username and the issued password. Wrap the whole marketplace scope with this middleware so
//! no webhook handler can be reached without them.
//!
//! Both the username and the password comparisons run in constant time, and a rejection carries no detail about
//! which part failed.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::header::AUTHORIZATION,
    Error,
};
use aog_common::Secret;
use futures::future::LocalBoxFuture;
use log::{trace, warn};
use subtle::ConstantTimeEq;

pub struct BasicAuthMiddlewareFactory {
    username: String,
    password: Secret<String>,
}

impl BasicAuthMiddlewareFactory {
    pub fn new(username: &str, password: Secret<String>) -> Self {
        Self { username: username.into(), password }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BasicAuthMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = BasicAuthMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BasicAuthMiddlewareService {
            username: self.username.clone(),
            password: self.password.clone(),
            service: Rc::new(service),
        }))
    }
}

pub struct BasicAuthMiddlewareService<S> {
    username: String,
    password: Secret<String>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for BasicAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let username = self.username.clone();
        let password = self.password.reveal().clone();
        Box::pin(async move {
            trace!("🔐️ Checking webhook credentials");
            let header = req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok());
            let Some((given_user, given_password)) = header.and_then(decode_basic_credentials) else {
                warn!("🔐️ Webhook call without usable basic-auth credentials. Denying access.");
                return Err(ErrorUnauthorized(""));
            };
            if credentials_match(&given_user, &username) & credentials_match(&given_password, &password) {
                trace!("🔐️ Webhook credential check ✅️");
                service.call(req).await
            } else {
                warn!("🔐️ Webhook call with invalid credentials. Denying access.");
                Err(ErrorUnauthorized(""))
            }
        })
    }
}

fn decode_basic_credentials(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = base64::decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

fn credentials_match(given: &str, expected: &str) -> bool {
    given.as_bytes().ct_eq(expected.as_bytes()).into()
}
