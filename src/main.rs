use actix_cors::Cors;
use actix_web::{
    self, http::header,
    middleware::{from_fn, Logger},
    web, App, HttpServer,
};
use std::sync::{Arc, LazyLock};

use crate::{
    configs::{connect_database, RedisCache},
    middlewares::{audit_trail, authentication, authorization, policy::Access},
    modules::{
        audit::{repository_pg::AuditRepositoryPg, service::AuditService},
        post::{repository_pg::PostRepositoryPg, service::PostService},
        relationship::{repository_pg::RelationshipRepositoryPg, service::RelationshipService},
        user::{repository_pg::UserRepositoryPg, service::UserService},
    },
    utils::TokenIssuer,
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
#[cfg(test)]
mod test;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    if tracing::subscriber::set_global_default(tracing_subscriber::fmt().finish()).is_err() {
        log::warn!("Tracing subscriber already installed");
    }
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check(db_pool: web::Data<sqlx::PgPool>) -> &'static str {
    match sqlx::query("SELECT 1").execute(db_pool.get_ref()).await {
        Ok(_) => "Server is running",
        Err(e) => {
            log::error!("Health check failed: {:?}", e);
            "Database unavailable"
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let db_pool =
        connect_database().await.map_err(|_| std::io::Error::other("Database connection error"))?;

    let redis_cache = RedisCache::connect(&ENV.redis_url)
        .map_err(|_| std::io::Error::other("Redis connection error"))?;

    let user_repo = Arc::new(UserRepositoryPg::new(db_pool.clone()));
    let relationship_repo = Arc::new(RelationshipRepositoryPg::new(db_pool.clone()));
    let post_repo = Arc::new(PostRepositoryPg::new(db_pool.clone()));
    let audit_repo = Arc::new(AuditRepositoryPg::new(db_pool.clone()));

    let user_service = UserService::with_dependencies(
        user_repo.clone(),
        Arc::new(redis_cache),
        TokenIssuer::new(ENV.jwt_secret.as_bytes(), ENV.access_token_expiration),
    );
    let relationship_service =
        RelationshipService::with_dependencies(relationship_repo, user_repo.clone());
    let post_service = PostService::with_dependencies(post_repo, user_repo);
    let audit_service = AuditService::with_dependencies(audit_repo);

    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&ENV.frontend_url)
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(relationship_service.clone()))
            .app_data(web::Data::new(post_service.clone()))
            .app_data(web::Data::new(audit_service.clone()))
            .app_data(web::Data::new(db_pool.clone()))
            .service(health_check)
            .service(
                web::scope("/api").configure(modules::user::route::public_api_configure).service(
                    web::scope("")
                        .wrap(from_fn(audit_trail))
                        .wrap(from_fn(authorization(Access::Member)))
                        .wrap(from_fn(authentication))
                        .configure(modules::user::route::configure)
                        .configure(modules::relationship::route::configure)
                        .configure(modules::post::route::configure)
                        .configure(modules::audit::route::configure),
                ),
            )
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
