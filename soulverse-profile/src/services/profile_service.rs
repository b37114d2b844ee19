use std::sync::Arc;

use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, DateTime as BsonDateTime, Document};
use validator::Validate;

use soulverse_shared::clients::{decode, encode, DocumentStore, StoreError};
use soulverse_shared::errors::{AppError, AppResult, ErrorCode};

use crate::ids;
use crate::models::{
    Comment, NewCommentRequest, NewProfileRequest, NewUserRequest, Profile, ProfileWithComments, User,
    COMMENTS, PROFILES, USERS,
};
use crate::services::comment_filter::CommentQuery;

pub const PROFILE_ID_MISSING: &str = "Bad Request, id must be requested";
const LIKE_PARAMS_MISSING: &str = "Parameters missing";

/// Profiles, users, comments and likes over an injected document store.
#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn DocumentStore>,
    default_image: String,
}

impl ProfileService {
    pub fn new(store: Arc<dyn DocumentStore>, default_image: impl Into<String>) -> Self {
        Self {
            store,
            default_image: default_image.into(),
        }
    }

    pub async fn ping_store(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    /// Fetches a profile with its comments, filtered by `query` and sorted by
    /// creation time.
    pub async fn get_profile_with_comments(&self, id: &str, query: &CommentQuery) -> AppResult<ProfileWithComments> {
        let profile_id = ids::require_object_id(Some(id), PROFILE_ID_MISSING)?;

        let profile: Profile = match self.store.find_one(PROFILES, doc! { "_id": profile_id }).await? {
            Some(document) => decode(document)?,
            None => return Err(AppError::new(ErrorCode::ProfileNotFound, "Not Found")),
        };

        let comments = self.find_comments(doc! { "id_profile": profile_id }).await?;
        let total = comments.len();
        let comments = query.apply(comments);
        tracing::debug!(profile_id = %profile_id, total, returned = comments.len(), "profile comments loaded");

        Ok(ProfileWithComments { profile, comments })
    }

    pub async fn create_profile(&self, req: NewProfileRequest) -> AppResult<ObjectId> {
        let profile = Profile {
            id: None,
            name: req.name,
            description: req.description,
            mbti: req.mbti,
            enneagram: req.enneagram,
            variant: req.variant,
            tritype: req.tritype,
            socionics: req.socionics,
            sloan: req.sloan,
            psyche: req.psyche,
            image: self.default_image.clone(),
            created_at: BsonDateTime::now(),
        };

        let id = self.store.insert_one(PROFILES, encode(&profile)?).await?;
        tracing::info!(profile_id = %id, "profile created");
        Ok(id)
    }

    pub async fn create_user(&self, req: NewUserRequest) -> AppResult<ObjectId> {
        req.validate()
            .map_err(|_| AppError::new(ErrorCode::ValidationError, "Bad Request, name must be requested"))?;
        let Some(name) = req.name else {
            return Err(AppError::new(ErrorCode::ValidationError, "Bad Request, name must be requested"));
        };

        let user = User {
            id: None,
            name,
            created_at: BsonDateTime::now(),
            liked_comments: None,
        };

        let id = self.store.insert_one(USERS, encode(&user)?).await?;
        tracing::info!(user_id = %id, "user created");
        Ok(id)
    }

    pub async fn add_comment(&self, id_profile: &str, req: NewCommentRequest) -> AppResult<ObjectId> {
        let id_profile = ids::require(Some(id_profile), "Bad Request, URL is incorrect")?;

        let lost = || AppError::new(ErrorCode::MissingFields, "Bad Request, lost crucial information");
        req.validate().map_err(|_| lost())?;
        let (Some(text), Some(id_user)) = (req.comment, req.id_user) else {
            return Err(lost());
        };
        let id_user = id_user.trim();
        if id_user.is_empty() {
            return Err(lost());
        }

        let profile_id = ids::parse(id_profile)?;
        let user_id = ids::parse(id_user)?;

        let comment = Comment {
            id: None,
            comment: text,
            id_user: user_id,
            id_profile: profile_id,
            created_at: BsonDateTime::now(),
            mbti: req.mbti,
            enneagram: req.enneagram,
            zodiac: req.zodiac,
            likes: 0,
        };

        let id = self.store.insert_one(COMMENTS, encode(&comment)?).await?;
        tracing::info!(comment_id = %id, profile_id = %profile_id, user_id = %user_id, "comment created");
        Ok(id)
    }

    /// All comments written by a user, in store order.
    pub async fn list_user_comments(&self, id_user: &str) -> AppResult<Vec<Comment>> {
        let user_id = ids::require_object_id(Some(id_user), "Bad Request, URL is incorrect")?;
        self.find_comments(doc! { "id_user": user_id }).await
    }

    /// Records a like and returns the comment's new like count.
    ///
    /// The duplicate-like guard and the push onto `likedComments` are one
    /// conditional update, so concurrent likes for the same pair succeed once.
    pub async fn like_comment(&self, id_comment: &str, id_user: &str) -> AppResult<i64> {
        let (comment_id, user_id) = like_params(id_comment, id_user)?;
        let comment = self.require_comment(comment_id).await?;
        let token = comment_id.to_hex();

        let guarded = self
            .store
            .update_one(
                USERS,
                doc! { "_id": user_id, "likedComments": { "$ne": token.as_str() } },
                doc! { "$push": { "likedComments": token.as_str() } },
            )
            .await?;
        if !guarded.is_matched() {
            return Err(self
                .guard_rejection(user_id, ErrorCode::CommentAlreadyLiked, "You already liked this comment")
                .await);
        }

        self.adjust_likes(comment_id, 1).await?;

        let likes = comment.likes + 1;
        tracing::info!(comment_id = %comment_id, user_id = %user_id, likes, "comment liked");
        Ok(likes)
    }

    /// Removes a like and returns the comment's new like count. The count is
    /// not floored at zero.
    pub async fn unlike_comment(&self, id_comment: &str, id_user: &str) -> AppResult<i64> {
        let (comment_id, user_id) = like_params(id_comment, id_user)?;
        let comment = self.require_comment(comment_id).await?;
        let token = comment_id.to_hex();

        let guarded = self
            .store
            .update_one(
                USERS,
                doc! { "_id": user_id, "likedComments": token.as_str() },
                doc! { "$pull": { "likedComments": token.as_str() } },
            )
            .await?;
        if !guarded.is_matched() {
            return Err(self
                .guard_rejection(user_id, ErrorCode::CommentNotLiked, "You have not liked this comment before.")
                .await);
        }

        self.adjust_likes(comment_id, -1).await?;

        let likes = comment.likes - 1;
        tracing::info!(comment_id = %comment_id, user_id = %user_id, likes, "comment unliked");
        Ok(likes)
    }

    async fn find_comments(&self, filter: Document) -> AppResult<Vec<Comment>> {
        let documents = self.store.find(COMMENTS, filter).await?;
        let mut comments = Vec::with_capacity(documents.len());
        for document in documents {
            comments.push(decode(document)?);
        }
        Ok(comments)
    }

    async fn require_comment(&self, comment_id: ObjectId) -> AppResult<Comment> {
        match self.store.find_one(COMMENTS, doc! { "_id": comment_id }).await? {
            Some(document) => Ok(decode(document)?),
            None => Err(AppError::new(ErrorCode::CommentNotFound, "Comment not found.")),
        }
    }

    async fn adjust_likes(&self, comment_id: ObjectId, delta: i64) -> AppResult<()> {
        self.store
            .update_one(COMMENTS, doc! { "_id": comment_id }, doc! { "$inc": { "likes": delta } })
            .await?;
        Ok(())
    }

    /// Builds the error for a guarded update that matched nothing: either the
    /// user is missing or the guard condition failed.
    async fn guard_rejection(&self, user_id: ObjectId, code: ErrorCode, message: &str) -> AppError {
        match self.store.find_one(USERS, doc! { "_id": user_id }).await {
            Ok(Some(_)) => AppError::new(code, message),
            Ok(None) => AppError::new(ErrorCode::UserNotFound, "User not found."),
            Err(e) => e.into(),
        }
    }
}

fn like_params(id_comment: &str, id_user: &str) -> AppResult<(ObjectId, ObjectId)> {
    let id_comment = ids::require(Some(id_comment), LIKE_PARAMS_MISSING)?;
    let id_user = ids::require(Some(id_user), LIKE_PARAMS_MISSING)?;
    Ok((ids::parse(id_comment)?, ids::parse(id_user)?))
}
