use actix_web::{delete, get, web, HttpRequest};

use crate::{
    api::{error, success},
    middlewares::{
        get_claims,
        policy::{self, Action},
    },
    modules::audit::{model::ClearedResponse, schema::LogEntity, service::AuditService},
};

#[get("/all")]
pub async fn all_logs(
    audit_service: web::Data<AuditService>,
    req: HttpRequest,
) -> Result<success::Success<Vec<LogEntity>>, error::Error> {
    policy::evaluate(&get_claims(&req)?, Action::ViewLogs)?;
    let logs = audit_service.all_logs().await?;
    Ok(success::Success::ok(Some(logs)).message("Logs retrieved successfully"))
}

#[get("/findByUserName/{username}")]
pub async fn logs_by_username(
    audit_service: web::Data<AuditService>,
    username: web::Path<String>,
    req: HttpRequest,
) -> Result<success::Success<Vec<LogEntity>>, error::Error> {
    policy::evaluate(&get_claims(&req)?, Action::ViewLogs)?;
    let logs = audit_service.logs_by_username(&username).await?;
    Ok(success::Success::ok(Some(logs)).message("Logs retrieved successfully"))
}

#[delete("/clear")]
pub async fn clear_logs(
    audit_service: web::Data<AuditService>,
    req: HttpRequest,
) -> Result<success::Success<ClearedResponse>, error::Error> {
    policy::evaluate(&get_claims(&req)?, Action::ClearLogs)?;
    let removed = audit_service.clear_all().await?;
    Ok(success::Success::ok(Some(ClearedResponse { removed })).message("Logs cleared successfully"))
}

#[delete("/clearByName/{username}")]
pub async fn clear_logs_by_username(
    audit_service: web::Data<AuditService>,
    username: web::Path<String>,
    req: HttpRequest,
) -> Result<success::Success<ClearedResponse>, error::Error> {
    policy::evaluate(&get_claims(&req)?, Action::ClearLogs)?;
    let removed = audit_service.clear_by_username(&username).await?;
    Ok(success::Success::ok(Some(ClearedResponse { removed }))
        .message("User logs cleared successfully"))
}
