use crate::modules::audit::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/logs")
            .service(all_logs)
            .service(logs_by_username)
            .service(clear_logs)
            .service(clear_logs_by_username),
    );
}
