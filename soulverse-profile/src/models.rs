use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime as BsonDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

pub const PROFILES: &str = "profiles";
pub const USERS: &str = "users";
pub const COMMENTS: &str = "comments";

// --- Profile ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mbti: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enneagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tritype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socionics: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sloan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psyche: Option<String>,
    pub image: String,
    pub created_at: BsonDateTime,
}

/// Body of `POST /profile`. No field is required.
#[derive(Debug, Default, Deserialize)]
pub struct NewProfileRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub mbti: Option<String>,
    pub enneagram: Option<String>,
    pub variant: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub tritype: Option<String>,
    pub socionics: Option<String>,
    pub sloan: Option<String>,
    pub psyche: Option<String>,
}

// --- User ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub created_at: BsonDateTime,
    /// Absent until the user likes a comment for the first time.
    #[serde(rename = "likedComments", default, skip_serializing_if = "Option::is_none")]
    pub liked_comments: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct NewUserRequest {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
}

// --- Comment ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub comment: String,
    pub id_user: ObjectId,
    pub id_profile: ObjectId,
    pub created_at: BsonDateTime,
    #[serde(rename = "MTBI", default, skip_serializing_if = "Option::is_none")]
    pub mbti: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enneagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zodiac: Option<String>,
    #[serde(default)]
    pub likes: i64,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct NewCommentRequest {
    #[validate(required, length(min = 1))]
    pub comment: Option<String>,
    #[validate(required, length(min = 1))]
    pub id_user: Option<String>,
    #[serde(rename = "MTBI", alias = "mbti")]
    pub mbti: Option<String>,
    pub enneagram: Option<String>,
    pub zodiac: Option<String>,
}

/// A profile together with its filtered, sorted comments.
#[derive(Debug, Clone)]
pub struct ProfileWithComments {
    pub profile: Profile,
    pub comments: Vec<Comment>,
}

// --- JSON views ---
//
// Stored documents carry BSON ObjectIds and datetimes; responses render them
// as hex strings and RFC 3339 timestamps.

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: String,
}

impl From<ObjectId> for Created {
    fn from(id: ObjectId) -> Self {
        Self { id: id.to_hex() }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentView {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub comment: String,
    pub id_user: String,
    pub id_profile: String,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "MTBI", skip_serializing_if = "Option::is_none")]
    pub mbti: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enneagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zodiac: Option<String>,
    pub likes: i64,
}

impl From<Comment> for CommentView {
    fn from(c: Comment) -> Self {
        Self {
            id: c.id.map(|id| id.to_hex()),
            comment: c.comment,
            id_user: c.id_user.to_hex(),
            id_profile: c.id_profile.to_hex(),
            created_at: c.created_at.to_chrono(),
            mbti: c.mbti,
            enneagram: c.enneagram,
            zodiac: c.zodiac,
            likes: c.likes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileView {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub mbti: Option<String>,
    pub enneagram: Option<String>,
    pub variant: Option<String>,
    pub tritype: Option<String>,
    pub socionics: Option<String>,
    pub sloan: Option<String>,
    pub psyche: Option<String>,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub comments: Vec<CommentView>,
}

impl From<ProfileWithComments> for ProfileView {
    fn from(found: ProfileWithComments) -> Self {
        let p = found.profile;
        Self {
            id: p.id.map(|id| id.to_hex()),
            name: p.name,
            description: p.description,
            mbti: p.mbti,
            enneagram: p.enneagram,
            variant: p.variant,
            tritype: p.tritype,
            socionics: p.socionics,
            sloan: p.sloan,
            psyche: p.psyche,
            image: p.image,
            created_at: p.created_at.to_chrono(),
            comments: found.comments.into_iter().map(CommentView::from).collect(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}
