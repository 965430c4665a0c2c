use crate::modules::relationship::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/relationship")
            .service(get_friends)
            .service(find_friend_candidates)
            .service(get_incoming_requests)
            .service(get_outgoing_requests)
            .service(add_friend)
            .service(accept_friend)
            .service(cancel_request)
            .service(reject_request)
            .service(remove_friend)
            .service(search_users),
    );
}
