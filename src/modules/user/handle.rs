use actix_web::{delete, get, post, put, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::{
        get_claims,
        policy::{self, Action},
    },
    modules::{
        audit::service::AuditService,
        user::{model, schema::UserRole, service::UserService},
    },
    utils::{ValidatedJson, ValidatedQuery},
};

#[post("/register")]
pub async fn register(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::RegisterModel>,
) -> Result<success::Success<model::RegisterResponse>, error::Error> {
    let registered = user_service.register(user_data.0).await?;
    Ok(success::Success::created(Some(registered)).message("Registration successful"))
}

#[post("/login")]
pub async fn login(
    user_service: web::Data<UserService>,
    audit_service: web::Data<AuditService>,
    user_data: ValidatedJson<model::LoginModel>,
) -> Result<success::Success<model::LoginResponse>, error::Error> {
    let response = user_service.login(user_data.0).await?;

    if let Err(e) = audit_service.record("POST", &response.username, "-", "login").await {
        log::warn!("Failed to record login of {}: {:?}", response.username, e);
    }

    Ok(success::Success::ok(Some(response)).message("Login successful"))
}

#[post("/logout")]
pub async fn logout(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let id = get_claims(&req)?.sub;
    user_service.logout(id).await?;
    Ok(success::Success::ok(None).message("Logout successful"))
}

#[get("/details/{id}")]
pub async fn get_details(
    user_service: web::Data<UserService>,
    user_id: web::Path<Uuid>,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let user = user_service.get_by_id(user_id.into_inner()).await?;
    Ok(success::Success::ok(Some(user)).message("User retrieved successfully"))
}

#[put("/update/{id}")]
pub async fn update_user(
    user_service: web::Data<UserService>,
    user_id: web::Path<Uuid>,
    user_data: ValidatedJson<model::UpdateUserModel>,
    req: HttpRequest,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let user_id = user_id.into_inner();
    policy::evaluate(&get_claims(&req)?, Action::EditProfile(&user_id))?;
    let user = user_service.update_user(user_id, user_data.0).await?;
    Ok(success::Success::ok(Some(user)).message("User updated successfully"))
}

#[get("/all/{id}")]
pub async fn get_all_users(
    user_service: web::Data<UserService>,
    user_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<Vec<model::UserResponse>>, error::Error> {
    policy::evaluate(&get_claims(&req)?, Action::ViewUsers)?;
    let users = user_service.get_all(user_id.into_inner()).await?;
    Ok(success::Success::ok(Some(users)).message("Users retrieved successfully"))
}

#[post("/promote")]
pub async fn promote_user(
    user_service: web::Data<UserService>,
    query: ValidatedQuery<model::UserIdQuery>,
    req: HttpRequest,
) -> Result<success::Success<UserRole>, error::Error> {
    policy::evaluate(&get_claims(&req)?, Action::ChangeRole)?;
    let role = user_service.promote(query.0.id).await?;
    Ok(success::Success::ok(Some(role)).message("User promoted"))
}

#[post("/demote")]
pub async fn demote_user(
    user_service: web::Data<UserService>,
    query: ValidatedQuery<model::UserIdQuery>,
    req: HttpRequest,
) -> Result<success::Success<UserRole>, error::Error> {
    policy::evaluate(&get_claims(&req)?, Action::ChangeRole)?;
    let role = user_service.demote(query.0.id).await?;
    Ok(success::Success::ok(Some(role)).message("User demoted"))
}

#[delete("/delete/{id}")]
pub async fn delete_user(
    user_service: web::Data<UserService>,
    user_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    policy::evaluate(&get_claims(&req)?, Action::DeleteUser)?;
    user_service.delete(user_id.into_inner()).await?;
    Ok(success::Success::ok(None).message("User deleted"))
}
