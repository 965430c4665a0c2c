use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::Method,
    middleware::Next,
    web, Error, HttpMessage, HttpRequest,
};
use futures_util::{future::LocalBoxFuture, FutureExt};

use crate::{api::error, modules::audit::service::AuditService, utils::Claims, ENV};

pub mod policy;

use policy::Access;

pub async fn authentication<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<B>, Error>
where
    B: MessageBody + 'static,
{
    let auth = req.headers().get("Authorization").and_then(|h| h.to_str().ok());
    let token = match auth.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(t) => t,
        None => {
            return Err(error::Error::unauthorized("Token Invalid or Expired").into());
        }
    };

    let claims = Claims::decode(token, ENV.jwt_secret.as_ref())
        .map_err(|_| error::Error::forbidden("Token Invalid or Expired"))?;

    req.extensions_mut().insert(claims);

    next.call(req).await
}

pub fn get_claims(req: &HttpRequest) -> Result<Claims, error::Error> {
    let extensions = req.extensions();

    let claims = extensions
        .get::<Claims>()
        .ok_or_else(|| error::Error::unauthorized("Unauthorized"))?
        .clone();

    Ok(claims)
}

pub fn authorization<B>(
    access: Access,
) -> impl Fn(
    ServiceRequest,
    Next<B>,
) -> LocalBoxFuture<'static, Result<ServiceResponse<B>, actix_web::Error>>
where
    B: MessageBody + 'static,
{
    move |req: ServiceRequest, next: Next<B>| {
        async move {
            let claims = get_claims(req.request())?;
            policy::require(&claims, access)?;
            next.call(req).await
        }
        .boxed_local()
    }
}

/// Splits a mutating request path into the `(table, action)` pair recorded in
/// the audit log, e.g. `POST /api/relationship/addFriend`.
pub fn audited_action(method: &Method, path: &str) -> Option<(String, String)> {
    let mutating = [Method::POST, Method::PUT, Method::PATCH, Method::DELETE];
    if !mutating.contains(method) || path.ends_with("error") {
        return None;
    }

    let rest = path.strip_prefix("/api").unwrap_or(path);
    let mut parts = rest.split('/').filter(|p| !p.is_empty());
    let table_name = parts.next()?;
    let action = parts.next()?;

    Some((table_name.to_owned(), action.to_owned()))
}

pub async fn audit_trail<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<B>, Error>
where
    B: MessageBody + 'static,
{
    let method = req.method().clone();
    let target = audited_action(&method, req.path());
    let username = req.extensions().get::<Claims>().map(|c| c.username.clone());
    let audit = req.app_data::<web::Data<AuditService>>().cloned();

    let res = next.call(req).await?;

    if let (Some((table_name, action)), Some(username), Some(audit)) = (target, username, audit) {
        if res.status().is_success() {
            if let Err(e) = audit.record(method.as_str(), &username, &table_name, &action).await {
                log::warn!("Failed to record audit entry for {}: {:?}", username, e);
            }
        }
    }

    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutating_api_paths_are_audited() {
        assert_eq!(
            audited_action(&Method::POST, "/api/relationship/addFriend"),
            Some(("relationship".to_owned(), "addFriend".to_owned()))
        );
        assert_eq!(
            audited_action(&Method::DELETE, "/api/users/delete/0196f1a2-0000-7000-8000-000000000000"),
            Some(("users".to_owned(), "delete".to_owned()))
        );
    }

    #[test]
    fn reads_short_paths_and_error_paths_are_skipped() {
        assert_eq!(audited_action(&Method::GET, "/api/relationship/friends/1"), None);
        assert_eq!(audited_action(&Method::POST, "/api/logs"), None);
        assert_eq!(audited_action(&Method::POST, "/api/users/error"), None);
    }
}
