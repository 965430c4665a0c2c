use actix_web::{get, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::{
        get_claims,
        policy::{self, Action},
    },
    modules::post::{
        model::{CreatePostBody, LikePostBody, LikeResponse, PostResponse, RemovePostBody},
        service::PostSvc,
    },
    utils::ValidatedJson,
};

#[post("/create")]
pub async fn create_post(
    post_service: web::Data<PostSvc>,
    body: ValidatedJson<CreatePostBody>,
    req: HttpRequest,
) -> Result<success::Success<PostResponse>, error::Error> {
    let body = body.0;
    policy::evaluate(&get_claims(&req)?, Action::ActAs(&body.logged_in_user_id))?;
    let post = post_service.create_post(body).await?;
    Ok(success::Success::created(Some(post)).message("Post created"))
}

#[get("/all/{id}")]
pub async fn get_timeline(
    post_service: web::Data<PostSvc>,
    timeline_user_id: web::Path<Uuid>,
) -> Result<success::Success<Vec<PostResponse>>, error::Error> {
    let posts = post_service.timeline(timeline_user_id.into_inner()).await?;
    Ok(success::Success::ok(Some(posts)).message("Posts retrieved successfully"))
}

#[post("/remove")]
pub async fn remove_post(
    post_service: web::Data<PostSvc>,
    body: ValidatedJson<RemovePostBody>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let body = body.0;
    let claims = get_claims(&req)?;
    policy::evaluate(&claims, Action::ActAs(&body.logged_in_user_id))?;

    let post = post_service.find_post(body.post_to_remove_id).await?;
    policy::evaluate(
        &claims,
        Action::RemovePost { author_id: &post.author_id, timeline_user_id: &post.timeline_user_id },
    )?;
    post_service.remove_post(post.id).await?;
    Ok(success::Success::ok(None).message("Post removed"))
}

#[post("/like")]
pub async fn like_post(
    post_service: web::Data<PostSvc>,
    body: ValidatedJson<LikePostBody>,
    req: HttpRequest,
) -> Result<success::Success<LikeResponse>, error::Error> {
    let body = body.0;
    policy::evaluate(&get_claims(&req)?, Action::ActAs(&body.logged_in_user_id))?;
    let like = post_service.like_post(body.logged_in_user_id, body.post_id).await?;
    Ok(success::Success::created(Some(like)).message("Post liked"))
}
