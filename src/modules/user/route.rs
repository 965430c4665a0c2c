use crate::modules::user::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn public_api_configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/auth").service(register).service(login));
}

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/users")
            .service(get_details)
            .service(update_user)
            .service(logout)
            .service(get_all_users)
            .service(promote_user)
            .service(demote_user)
            .service(delete_user),
    );
}
