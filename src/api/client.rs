use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::Value;
use tracing::debug;

use super::error::ApiError;
use super::types::{
    CategoriesPayload, Category, Comment, CommentTarget, CommentsPayload, EmailForward,
    EmailForwardPayload, NewComment, NewStory, NotificationFeed, NotificationsPayload,
    ReactionCounts, ReactionKind, ReactionPayload, ReactionRequest, ReactionTarget,
    ShareLinkPayload, ShareLinkRequest, StoriesPayload, Story,
};
use crate::identity::AnonymousId;

pub const DEFAULT_API_BASE: &str = "http://localhost:5002/api";
pub const ANONYMOUS_ID_HEADER: &str = "X-Anonymous-ID";
pub const DEFAULT_PER_PAGE: u32 = 50;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub anonymous_id: AnonymousId,
    pub per_page: u32,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, anonymous_id: AnonymousId) -> Self {
        Self {
            base_url: base_url.into(),
            anonymous_id,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Stateless gateway to the community REST API.
///
/// Every request carries the anonymous identity header. Responses are JSON
/// envelopes with a `success` flag; anything other than `success: true` is
/// surfaced as an [`ApiError`].
#[derive(Clone)]
pub struct GroveClient {
    http: reqwest::Client,
    base_url: String,
    anonymous_id: AnonymousId,
    per_page: u32,
}

impl GroveClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            anonymous_id: config.anonymous_id,
            per_page: config.per_page,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn anonymous_id(&self) -> &AnonymousId {
        &self.anonymous_id
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError> {
        let payload: CategoriesPayload = self.execute(self.http.get(self.url("/categories"))).await?;
        Ok(payload.categories)
    }

    pub async fn fetch_stories(&self) -> Result<Vec<Story>, ApiError> {
        let request = self
            .http
            .get(self.url("/stories"))
            .query(&[("per_page", self.per_page)]);
        let payload: StoriesPayload = self.execute(request).await?;
        Ok(payload.stories)
    }

    pub async fn fetch_comments(&self, story_id: u64) -> Result<Vec<Comment>, ApiError> {
        let url = self.url(&format!("/stories/{story_id}/comments"));
        let payload: CommentsPayload = self.execute(self.http.get(url)).await?;
        Ok(payload.comments)
    }

    pub async fn submit_comment(
        &self,
        target: CommentTarget,
        comment: &NewComment,
    ) -> Result<(), ApiError> {
        let _: IgnoredAny = self.send_json(Method::POST, &target.path(), comment).await?;
        Ok(())
    }

    /// Toggles a reaction. Whether it was added or removed is the server's
    /// call; the returned counts are the only truth the caller gets.
    pub async fn toggle_reaction(
        &self,
        target: ReactionTarget,
        kind: ReactionKind,
    ) -> Result<ReactionCounts, ApiError> {
        let body = ReactionRequest {
            reaction_type: kind,
        };
        let payload: ReactionPayload = self.send_json(Method::POST, &target.path(), &body).await?;
        Ok(payload.reaction_counts)
    }

    pub async fn fetch_notifications(&self) -> Result<NotificationFeed, ApiError> {
        let payload: NotificationsPayload =
            self.execute(self.http.get(self.url("/notifications"))).await?;
        Ok(payload.into())
    }

    pub async fn mark_notification_read(&self, notification_id: u64) -> Result<(), ApiError> {
        let url = self.url(&format!("/notifications/{notification_id}/read"));
        let _: IgnoredAny = self.execute(self.http.put(url)).await?;
        Ok(())
    }

    pub async fn mark_all_notifications_read(&self) -> Result<(), ApiError> {
        let url = self.url("/notifications/read-all");
        let _: IgnoredAny = self.execute(self.http.put(url)).await?;
        Ok(())
    }

    pub async fn create_story(&self, story: &NewStory) -> Result<(), ApiError> {
        let _: IgnoredAny = self.send_json(Method::POST, "/stories", story).await?;
        Ok(())
    }

    pub async fn create_share_link(
        &self,
        story_id: u64,
        request: &ShareLinkRequest,
    ) -> Result<String, ApiError> {
        let path = format!("/stories/{story_id}/share-link");
        let payload: ShareLinkPayload = self.send_json(Method::POST, &path, request).await?;
        Ok(payload.share_url)
    }

    /// Returns the server's confirmation message, if it sent one.
    pub async fn forward_email(
        &self,
        story_id: u64,
        forward: &EmailForward,
    ) -> Result<Option<String>, ApiError> {
        let path = format!("/stories/{story_id}/forward/email");
        let payload: EmailForwardPayload = self.send_json(Method::POST, &path, forward).await?;
        Ok(payload.message)
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.request(method, self.url(path)).json(body);
        self.execute(request).await
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .header(ANONYMOUS_ID_HEADER, self.anonymous_id.as_str())
            .send()
            .await?;
        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "api response");
        let bytes = response.bytes().await?;

        let body: Value = match serde_json::from_slice(&bytes) {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(ApiError::HttpStatus(
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("").into(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        if !status.is_success() && server_error(&body).is_none() {
            return Err(ApiError::HttpStatus(
                status.as_u16(),
                status.canonical_reason().unwrap_or("").into(),
            ));
        }
        unwrap_envelope(body)
    }
}

fn server_error(body: &Value) -> Option<&str> {
    body.get("error").and_then(Value::as_str)
}

/// Checks the `success` flag and decodes the payload. A missing flag counts
/// as failure.
fn unwrap_envelope<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    let success = body
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !success {
        let reason = server_error(&body).unwrap_or("Request was not successful");
        return Err(ApiError::Rejected(reason.to_string()));
    }
    Ok(serde_json::from_value(body)?)
}
