use serde::Deserialize;

use crate::models::Comment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    /// `"asc"` sorts oldest first; anything else, including no value, newest first.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("asc") => Self::Ascending,
            _ => Self::Descending,
        }
    }
}

/// Query string of `GET /:id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentQuery {
    pub zodiac: Option<String>,
    pub enneagram: Option<String>,
    pub mbti: Option<String>,
    pub sort: Option<String>,
}

impl CommentQuery {
    pub fn sort_order(&self) -> SortOrder {
        SortOrder::from_param(self.sort.as_deref())
    }

    pub fn has_filters(&self) -> bool {
        supplied(&self.zodiac).is_some()
            || supplied(&self.enneagram).is_some()
            || supplied(&self.mbti).is_some()
    }

    /// True when the comment matches every supplied filter. A comment lacking a
    /// filtered field never matches.
    pub fn matches(&self, comment: &Comment) -> bool {
        field_matches(&self.zodiac, &comment.zodiac)
            && field_matches(&self.enneagram, &comment.enneagram)
            && field_matches(&self.mbti, &comment.mbti)
    }

    pub fn apply(&self, mut comments: Vec<Comment>) -> Vec<Comment> {
        if self.has_filters() {
            comments.retain(|c| self.matches(c));
        }
        match self.sort_order() {
            SortOrder::Ascending => comments.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            SortOrder::Descending => comments.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
        comments
    }
}

// empty strings count as absent
fn supplied(filter: &Option<String>) -> Option<&str> {
    filter.as_deref().filter(|v| !v.is_empty())
}

fn field_matches(filter: &Option<String>, value: &Option<String>) -> bool {
    match supplied(filter) {
        None => true,
        Some(wanted) => value.as_deref() == Some(wanted),
    }
}
