use std::{
    future::{ready, Ready},
    rc::Rc,
};
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use sqlx::PgPool;

use crate::auth::identity::{bearer_credential, resolve_credential, Caller};
use crate::db::users;
use crate::error::AppError;

/// Which roles a scope admits once the caller is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleGate {
    Any,
    Patient,
    Doctor,
}

impl RoleGate {
    fn admit(&self, caller: &Caller) -> Result<(), AppError> {
        match self {
            RoleGate::Any => Ok(()),
            RoleGate::Patient => caller.require_patient().map(|_| ()),
            RoleGate::Doctor => caller.require_doctor().map(|_| ()),
        }
    }
}

/// Resolves the bearer credential, applies the role gate, and stores the
/// `Caller` in request extensions.
pub struct AuthMiddleware {
    gate: RoleGate,
}

impl AuthMiddleware {
    pub fn any() -> Self {
        Self { gate: RoleGate::Any }
    }

    pub fn patient() -> Self {
        Self { gate: RoleGate::Patient }
    }

    pub fn doctor() -> Self {
        Self { gate: RoleGate::Doctor }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            gate: self.gate,
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    gate: RoleGate,
}

fn raw_credential(req: &ServiceRequest) -> Result<String, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("No authorization header".to_string()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;
    bearer_credential(auth_header).map(str::to_string)
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
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
        let gate = self.gate;

        let raw = match raw_credential(&req) {
            Ok(raw) => raw,
            Err(e) => return Box::pin(async move { Err(e.into()) }),
        };

        let pool = match req.app_data::<web::Data<PgPool>>() {
            Some(pool) => pool.clone(),
            None => {
                tracing::error!("Database pool missing from app data");
                return Box::pin(async move {
                    Err(AppError::StorageFailure(sqlx::Error::PoolClosed).into())
                });
            }
        };

        Box::pin(async move {
            let caller = resolve_credential(&raw, |subject_id| async move {
                users::find_role(pool.get_ref(), &subject_id)
                    .await
                    .map_err(AppError::from)
            })
            .await?;

            if let Err(e) = gate.admit(&caller) {
                tracing::warn!(
                    "Caller {} ({}) rejected by {:?} gate",
                    caller.subject_id,
                    caller.role,
                    gate
                );
                return Err(e.into());
            }

            req.extensions_mut().insert(caller);
            service.call(req).await
        })
    }
}
