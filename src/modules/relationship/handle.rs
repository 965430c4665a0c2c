use actix_web::{get, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::{
        get_claims,
        policy::{self, Action},
    },
    modules::relationship::{
        model::{
            AcceptFriendBody, AddFriendBody, ConnectionResponse, PendingRequestBody,
            RelationshipResponse, RemoveFriendBody, SearchBody,
        },
        service::RelationshipSvc,
    },
    utils::ValidatedJson,
};

fn act_as(req: &HttpRequest, user_id: &Uuid) -> Result<(), error::Error> {
    policy::evaluate(&get_claims(req)?, Action::ActAs(user_id))
}

#[get("/friends/{id}")]
pub async fn get_friends(
    relationship_service: web::Data<RelationshipSvc>,
    user_id: web::Path<Uuid>,
) -> Result<success::Success<Vec<ConnectionResponse>>, error::Error> {
    let friends = relationship_service.find_friends(user_id.into_inner()).await?;
    Ok(success::Success::ok(Some(friends)).message("Friends retrieved successfully"))
}

#[get("/findFriends/{id}")]
pub async fn find_friend_candidates(
    relationship_service: web::Data<RelationshipSvc>,
    user_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<Vec<ConnectionResponse>>, error::Error> {
    let user_id = user_id.into_inner();
    act_as(&req, &user_id)?;
    let candidates = relationship_service.find_all_friend_candidates(user_id).await?;
    Ok(success::Success::ok(Some(candidates)).message("Friend candidates retrieved successfully"))
}

#[get("/requests/incoming/{id}")]
pub async fn get_incoming_requests(
    relationship_service: web::Data<RelationshipSvc>,
    user_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<Vec<ConnectionResponse>>, error::Error> {
    let user_id = user_id.into_inner();
    act_as(&req, &user_id)?;
    let requests = relationship_service.find_incoming_requests(user_id).await?;
    Ok(success::Success::ok(Some(requests)).message("Incoming requests retrieved successfully"))
}

#[get("/requests/outgoing/{id}")]
pub async fn get_outgoing_requests(
    relationship_service: web::Data<RelationshipSvc>,
    user_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<Vec<ConnectionResponse>>, error::Error> {
    let user_id = user_id.into_inner();
    act_as(&req, &user_id)?;
    let requests = relationship_service.find_outgoing_requests(user_id).await?;
    Ok(success::Success::ok(Some(requests)).message("Outgoing requests retrieved successfully"))
}

#[post("/addFriend")]
pub async fn add_friend(
    relationship_service: web::Data<RelationshipSvc>,
    body: ValidatedJson<AddFriendBody>,
    req: HttpRequest,
) -> Result<success::Success<RelationshipResponse>, error::Error> {
    let body = body.0;
    act_as(&req, &body.logged_in_user_id)?;
    let relationship = relationship_service
        .create_request(body.logged_in_user_id, body.friend_candidate_id)
        .await?;
    Ok(success::Success::created(Some(relationship)).message("Friend request sent"))
}

#[post("/acceptFriend")]
pub async fn accept_friend(
    relationship_service: web::Data<RelationshipSvc>,
    body: ValidatedJson<AcceptFriendBody>,
    req: HttpRequest,
) -> Result<success::Success<RelationshipResponse>, error::Error> {
    let body = body.0;
    act_as(&req, &body.logged_in_user_id)?;
    let relationship = relationship_service
        .accept_friend(body.logged_in_user_id, body.friend_to_accept_id)
        .await?;
    Ok(success::Success::ok(Some(relationship)).message("Friend request accepted"))
}

#[post("/cancelRequest")]
pub async fn cancel_request(
    relationship_service: web::Data<RelationshipSvc>,
    body: ValidatedJson<PendingRequestBody>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let body = body.0;
    act_as(&req, &body.logged_in_user_id)?;
    relationship_service
        .cancel_request(body.logged_in_user_id, body.friend_to_reject_id)
        .await?;
    Ok(success::Success::ok(None).message("Friend request cancelled"))
}

#[post("/rejectRequest")]
pub async fn reject_request(
    relationship_service: web::Data<RelationshipSvc>,
    body: ValidatedJson<PendingRequestBody>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let body = body.0;
    act_as(&req, &body.logged_in_user_id)?;
    relationship_service
        .reject_request(body.logged_in_user_id, body.friend_to_reject_id)
        .await?;
    Ok(success::Success::ok(None).message("Friend request rejected"))
}

#[post("/removeFriend")]
pub async fn remove_friend(
    relationship_service: web::Data<RelationshipSvc>,
    body: ValidatedJson<RemoveFriendBody>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let body = body.0;
    act_as(&req, &body.logged_in_user_id)?;
    relationship_service
        .remove_friend(body.logged_in_user_id, body.friend_to_remove_id)
        .await?;
    Ok(success::Success::ok(None).message("Friend removed"))
}

#[post("/search")]
pub async fn search_users(
    relationship_service: web::Data<RelationshipSvc>,
    body: ValidatedJson<SearchBody>,
    req: HttpRequest,
) -> Result<success::Success<Vec<ConnectionResponse>>, error::Error> {
    let body = body.0;
    act_as(&req, &body.logged_in_user_id)?;
    let users = relationship_service.search_users(body.logged_in_user_id, &body.search).await?;
    Ok(success::Success::ok(Some(users)).message("Search completed"))
}
