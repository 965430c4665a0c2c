use crate::modules::post::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/post")
            .service(create_post)
            .service(get_timeline)
            .service(remove_post)
            .service(like_post),
    );
}
