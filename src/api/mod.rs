mod client;
mod error;
mod types;

pub use client::{ClientConfig, DEFAULT_API_BASE, DEFAULT_PER_PAGE, GroveClient};
pub use error::ApiError;
pub use types::{
    Category, Comment, CommentTarget, EmailForward, NewComment, NewStory, Notification,
    NotificationFeed, ReactionCounts, ReactionKind, ReactionTarget, ShareLinkRequest, Story,
};
