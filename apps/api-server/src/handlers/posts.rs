//! Post list, detail, single-post creation and image attachments.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::DomainError;
use quill_core::domain::{Post, PostImage};
use quill_core::import::MAX_TITLE_LENGTH;
use quill_core::ports::{BaseRepository, MediaFolder};
use quill_shared::dto::{
    AuthorResponse, CreatePostRequest, ImageResponse, PostDetailResponse, PostSummaryResponse,
};

use super::{discard_upload, uploaded_image};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn summary(post: Post) -> PostSummaryResponse {
    PostSummaryResponse {
        short_content: post.short_content(),
        id: post.id,
        author_id: post.author_id,
        title: post.title,
        published_at: post.published_at,
    }
}

fn image_response(state: &AppState, image: &PostImage) -> ImageResponse {
    ImageResponse {
        id: image.id,
        url: state.media.public_url(&image.file_path),
    }
}

async fn find_post(state: &AppState, id: Uuid) -> AppResult<Post> {
    state.posts.find_by_id(id).await?.ok_or_else(|| {
        DomainError::NotFound {
            entity_type: "Post",
            id,
        }
        .into()
    })
}

async fn detail(state: &AppState, post: Post) -> AppResult<PostDetailResponse> {
    let author = state
        .users
        .find_by_id(post.author_id)
        .await?
        .map(|user| AuthorResponse {
            id: user.id,
            avatar_url: user.avatar_path.as_deref().map(|p| state.media.public_url(p)),
            username: user.username,
        });

    let images = state
        .images
        .find_by_post_id(post.id)
        .await?
        .iter()
        .map(|image| image_response(state, image))
        .collect();

    Ok(PostDetailResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        published_at: post.published_at,
        author,
        images,
    })
}

fn validate_new_post(req: &CreatePostRequest, max_content_length: usize) -> Result<(), DomainError> {
    let title_len = req.title.trim().chars().count();
    if title_len == 0 || title_len > MAX_TITLE_LENGTH {
        return Err(DomainError::Validation(format!(
            "Title must be 1 to {MAX_TITLE_LENGTH} characters"
        )));
    }
    let content_len = req.content.trim().chars().count();
    if content_len == 0 || content_len > max_content_length {
        return Err(DomainError::Validation(format!(
            "Content must be 1 to {max_content_length} characters"
        )));
    }
    Ok(())
}

/// GET /api/posts
///
/// Newest publication first.
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts: Vec<_> = state
        .posts
        .list_recent()
        .await?
        .into_iter()
        .map(summary)
        .collect();

    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail(&state, post).await?))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    validate_new_post(&req, state.importer.config().max_content_length)?;

    let post = Post::new(
        identity.user_id,
        req.title.trim().to_string(),
        req.content.trim().to_string(),
    );
    let post = state.posts.create(post).await?;

    tracing::info!(post_id = %post.id, author = %identity.user_id, "Post created");
    Ok(HttpResponse::Created().json(detail(&state, post).await?))
}

/// POST /api/posts/{id}/images
///
/// Body is the raw image file. Only the post's author may attach images.
pub async fn upload_image(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, path.into_inner()).await?;
    if post.author_id != identity.user_id {
        return Err(DomainError::NotAuthor.into());
    }
    let kind = uploaded_image(&body)?;

    let file_path = state.media.store(MediaFolder::PostImages, kind, &body).await?;
    let image = match state.images.create(PostImage::new(post.id, file_path.clone())).await {
        Ok(image) => image,
        Err(e) => {
            discard_upload(&state, &file_path).await;
            return Err(e.into());
        }
    };

    tracing::info!(post_id = %post.id, image_id = %image.id, "Image attached");
    Ok(HttpResponse::Created().json(image_response(&state, &image)))
}
