pub mod comment_filter;
pub mod profile_service;

pub use comment_filter::{CommentQuery, SortOrder};
pub use profile_service::ProfileService;
