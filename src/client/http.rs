//! `reqwest` client for the backend REST API.

use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{
    client::{
        ScoreboardApi,
        config::ApiConfig,
        error::{ApiError, ApiResult, ClientBuildError},
        session::AuthSession,
    },
    dto::competition::{
        CompetitionListPage, CompetitionSettings, CreateCompetitionRequest, ListCursor,
        ManageDetail, ManagedBoard, PatchCompetitionRequest, ScorePatch, SignInRequest,
        SignInResponse, StateAction,
    },
    state::board::{ScoreBoard, ScoreChangeLog},
};

const SIGN_IN: &[&str] = &["auth", "sign-in"];
const COMPETITIONS: &[&str] = &["api", "v1", "competitions"];
const PUBLIC_BOARDS: &[&str] = &["api", "v1", "public", "scoreboard"];
const MANAGE_BOARDS: &[&str] = &["api", "v1", "manages", "boards"];

/// [`ScoreboardApi`] implementation talking JSON over HTTP with `reqwest`.
#[derive(Clone)]
pub struct HttpScoreboardApi {
    client: Client,
    base_url: Arc<Url>,
    session: Arc<AuthSession>,
}

impl HttpScoreboardApi {
    /// Build the HTTP client. Credentials are read from `session` on every request.
    pub fn new(config: ApiConfig, session: Arc<AuthSession>) -> Result<Self, ClientBuildError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|source| ClientBuildError::InvalidBaseUrl {
                url: config.base_url.clone(),
                source: Box::new(source),
            })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientBuildError::InvalidBaseUrl {
                url: config.base_url,
                source: "URL cannot carry a path".into(),
            });
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: Arc::new(base_url),
            session,
        })
    }

    /// Backend URL below the base. Each segment is percent-encoded, so identifiers
    /// cannot add path levels or query parameters.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = Url::clone(&self.base_url);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn request(&self, method: Method, url: &Url) -> RequestBuilder {
        let builder = self.client.request(method, url.clone());
        match self.session.token().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send the request. A 401 signs the session out before the status is inspected.
    async fn send(&self, builder: RequestBuilder, path: &str) -> ApiResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|source| ApiError::Network {
                path: path.to_string(),
                source,
            })?;

        debug!(path, status = %response.status(), "backend responded");
        if response.status() == StatusCode::UNAUTHORIZED {
            warn!(path, "backend rejected the credential; signing out");
            self.session.sign_out().await;
        }
        Ok(response)
    }

    async fn get_optional<T>(&self, url: &Url, query: &[(&str, String)]) -> ApiResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let path = url.path();
        let builder = self.request(Method::GET, url).await.query(query);
        let response = self.send(builder, path).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Server {
                path: path.to_string(),
                status,
            });
        }
        decode_optional(response, path).await
    }

    /// Writes only count as successful on `200 OK`.
    async fn expect_ok(&self, builder: RequestBuilder, path: &str) -> ApiResult<Response> {
        let response = self.send(builder, path).await?;
        match response.status() {
            StatusCode::OK => Ok(response),
            status => Err(ApiError::Server {
                path: path.to_string(),
                status,
            }),
        }
    }
}

async fn decode_optional<T>(response: Response, path: &str) -> ApiResult<Option<T>>
where
    T: DeserializeOwned,
{
    let body = response.bytes().await.map_err(|source| ApiError::Network {
        path: path.to_string(),
        source,
    })?;

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    serde_json::from_slice::<Option<T>>(&body).map_err(|source| ApiError::Parse {
        path: path.to_string(),
        source,
    })
}

fn with<'a>(prefix: &[&'a str], rest: &[&'a str]) -> Vec<&'a str> {
    prefix.iter().chain(rest).copied().collect()
}

impl ScoreboardApi for HttpScoreboardApi {
    fn fetch_public_snapshot(
        &self,
        viewer_id: &str,
    ) -> BoxFuture<'static, ApiResult<Option<ScoreBoard>>> {
        let api = self.clone();
        let url = self.endpoint(with(PUBLIC_BOARDS, &[viewer_id]));
        Box::pin(async move { api.get_optional(&url, &[]).await })
    }

    fn fetch_history(&self, viewer_id: &str) -> BoxFuture<'static, ApiResult<Vec<ScoreChangeLog>>> {
        let api = self.clone();
        let url = self.endpoint(with(PUBLIC_BOARDS, &[viewer_id, "history"]));
        Box::pin(async move {
            api.get_optional(&url, &[])
                .await
                .map(Option::unwrap_or_default)
        })
    }

    fn fetch_competition_list(
        &self,
        size: u32,
        cursor: Option<ListCursor>,
    ) -> BoxFuture<'static, ApiResult<CompetitionListPage>> {
        let api = self.clone();
        let url = self.endpoint(with(PUBLIC_BOARDS, &["list"]));
        Box::pin(async move {
            let mut query = vec![("size", size.to_string())];
            if let Some(cursor) = cursor {
                query.push(("cursorCreatedAt", cursor.created_at));
                query.push(("cursorId", cursor.id));
            }
            api.get_optional(&url, &query)
                .await
                .map(Option::unwrap_or_default)
        })
    }

    fn fetch_settings(
        &self,
        competition_id: &str,
    ) -> BoxFuture<'static, ApiResult<Option<CompetitionSettings>>> {
        let api = self.clone();
        let url = self.endpoint(with(COMPETITIONS, &[competition_id]));
        Box::pin(async move { api.get_optional(&url, &[]).await })
    }

    fn create_competition(
        &self,
        request: CreateCompetitionRequest,
    ) -> BoxFuture<'static, ApiResult<Option<serde_json::Value>>> {
        let api = self.clone();
        let url = self.endpoint(COMPETITIONS.iter().copied());
        Box::pin(async move {
            let builder = api.request(Method::POST, &url).await.json(&request);
            let response = api.expect_ok(builder, url.path()).await?;
            decode_optional(response, url.path()).await
        })
    }

    fn patch_competition(
        &self,
        competition_id: &str,
        request: PatchCompetitionRequest,
    ) -> BoxFuture<'static, ApiResult<()>> {
        let api = self.clone();
        let url = self.endpoint(with(COMPETITIONS, &[competition_id]));
        Box::pin(async move {
            let builder = api.request(Method::PATCH, &url).await.json(&request);
            api.expect_ok(builder, url.path()).await.map(|_| ())
        })
    }

    fn change_state(
        &self,
        competition_id: &str,
        action: StateAction,
    ) -> BoxFuture<'static, ApiResult<()>> {
        let api = self.clone();
        let url = self.endpoint(with(COMPETITIONS, &[competition_id, "actions"]));
        Box::pin(async move {
            let builder = api
                .request(Method::POST, &url)
                .await
                .query(&[("mode", action.as_str())]);
            api.expect_ok(builder, url.path()).await.map(|_| ())
        })
    }

    fn list_managed_boards(&self) -> BoxFuture<'static, ApiResult<Vec<ManagedBoard>>> {
        let api = self.clone();
        let url = self.endpoint(with(MANAGE_BOARDS, &["list"]));
        Box::pin(async move {
            api.get_optional(&url, &[])
                .await
                .map(Option::unwrap_or_default)
        })
    }

    fn fetch_manage_detail(
        &self,
        manage_id: &str,
    ) -> BoxFuture<'static, ApiResult<Option<ManageDetail>>> {
        let api = self.clone();
        let url = self.endpoint(with(MANAGE_BOARDS, &[manage_id]));
        Box::pin(async move { api.get_optional(&url, &[]).await })
    }

    fn patch_score(
        &self,
        competition_id: &str,
        team_id: &str,
        patch: ScorePatch,
    ) -> BoxFuture<'static, ApiResult<()>> {
        let api = self.clone();
        let url = self.endpoint(with(
            MANAGE_BOARDS,
            &["competitions", competition_id, "teams", team_id, "scores"],
        ));
        Box::pin(async move {
            let builder = api.request(Method::PATCH, &url).await.json(&patch);
            api.expect_ok(builder, url.path()).await.map(|_| ())
        })
    }

    fn sign_in(&self, credentials: SignInRequest) -> BoxFuture<'static, ApiResult<SignInResponse>> {
        let api = self.clone();
        let url = self.endpoint(SIGN_IN.iter().copied());
        Box::pin(async move {
            let builder = api.request(Method::POST, &url).await.json(&credentials);
            let response = api.expect_ok(builder, url.path()).await?;
            decode_optional(response, url.path())
                .await
                .map(Option::unwrap_or_default)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base_url: &str) -> HttpScoreboardApi {
        HttpScoreboardApi::new(ApiConfig::new(base_url), Arc::new(AuthSession::new(None))).unwrap()
    }

    #[test]
    fn identifiers_stay_inside_one_path_segment() {
        let api = api("http://localhost:8080/");

        let url = api.endpoint(with(COMPETITIONS, &["x/../../../auth/sign-in", "actions"]));
        assert_eq!(
            url.path(),
            "/api/v1/competitions/x%2F..%2F..%2F..%2Fauth%2Fsign-in/actions"
        );

        let url = api.endpoint(with(COMPETITIONS, &["x?mode=close"]));
        assert_eq!(url.path(), "/api/v1/competitions/x%3Fmode=close");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let api = api("https://scores.example/backend/");
        let url = api.endpoint(with(PUBLIC_BOARDS, &["v1", "history"]));
        assert_eq!(
            url.as_str(),
            "https://scores.example/backend/api/v1/public/scoreboard/v1/history"
        );
    }

    #[test]
    fn unusable_base_url_is_rejected() {
        let session = Arc::new(AuthSession::new(None));
        assert!(matches!(
            HttpScoreboardApi::new(ApiConfig::new("not a url"), session.clone()),
            Err(ClientBuildError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            HttpScoreboardApi::new(ApiConfig::new("mailto:ops@example.com"), session),
            Err(ClientBuildError::InvalidBaseUrl { .. })
        ));
    }
}
