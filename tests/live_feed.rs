use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use reqwest::StatusCode as ClientStatus;
use scoreboard_relay::{
    client::{ApiConfig, ApiError, AuthSession, HttpScoreboardApi, ScoreboardApi},
    config::AppConfig,
    dto::{admin::ListQuery, competition::StateAction},
    error::ServiceError,
    routes,
    services::{admin_service, public_service, view_service},
    state::{AppState, SharedState},
};
use serde_json::{Value, json};
use tokio::{net::TcpListener, sync::watch, time::sleep};

#[derive(Default)]
struct Recorded {
    viewer_ids: Vec<String>,
    list_queries: Vec<HashMap<String, String>>,
    authorization: Vec<Option<String>>,
    raw_uris: Vec<String>,
}

#[derive(Clone)]
struct Backend {
    recorded: Arc<Mutex<Recorded>>,
    feed_closed: watch::Sender<bool>,
}

fn snapshot() -> Value {
    json!({
        "competitionName": "Spring Cup",
        "announcement": "Welcome",
        "description": "",
        "startTime": "2026-01-01T00:00:00",
        "totalTime": 3600,
        "state": "RUNNING",
        "teams": [
            { "teamId": "red", "name": "Red", "score": 1 },
            { "teamId": "blue", "name": "Blue", "score": 2 }
        ]
    })
}

async fn public_board() -> Json<Value> {
    Json(snapshot())
}

async fn public_history() -> Json<Value> {
    Json(json!([
        { "teamName": "Blue", "againstTeamName": null, "delta": 2, "reason": "opening", "changedAt": "2026-01-01T00:01:00" }
    ]))
}

async fn public_list(
    State(backend): State<Backend>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    backend.recorded.lock().unwrap().list_queries.push(query);
    Json(json!({
        "scoreBoardRows": [
            { "publicId": "viewer-1", "name": "Spring Cup", "startTime": "2026-01-01T00:00:00", "totalTime": 3600, "state": "RUNNING" }
        ],
        "nextCursorCreatedAt": "2026-01-01T00:00:00",
        "nextCursorId": "17"
    }))
}

async fn competition_action(State(backend): State<Backend>, uri: Uri) -> StatusCode {
    backend.recorded.lock().unwrap().raw_uris.push(uri.to_string());
    StatusCode::CREATED
}

async fn unmatched(State(backend): State<Backend>, uri: Uri) -> StatusCode {
    backend.recorded.lock().unwrap().raw_uris.push(uri.to_string());
    StatusCode::NOT_FOUND
}

async fn managed_boards(State(backend): State<Backend>, headers: axum::http::HeaderMap) -> Response {
    let authorization = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    backend.recorded.lock().unwrap().authorization.push(authorization);
    StatusCode::UNAUTHORIZED.into_response()
}

async fn feed(
    State(backend): State<Backend>,
    Query(query): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Response {
    if let Some(viewer_id) = query.get("viewerId") {
        backend
            .recorded
            .lock()
            .unwrap()
            .viewer_ids
            .push(viewer_id.clone());
    }
    ws.on_upgrade(move |socket| stream_scores(socket, backend))
}

async fn stream_scores(mut socket: WebSocket, backend: Backend) {
    let frames = [
        json!({ "type": "KEEPALIVE" }).to_string(),
        "definitely not json".to_string(),
        json!({
            "type": "SCORE_UPDATE",
            "payload": {
                "teams": [
                    { "teamId": "red", "name": "Red", "score": 6 },
                    { "teamId": "blue", "name": "Blue", "score": 2 }
                ],
                "scoreHistories": [
                    { "teamName": "Red", "againstTeamName": "Blue", "delta": 5, "reason": "comeback", "changedAt": "2026-01-01T00:02:00" }
                ]
            }
        })
        .to_string(),
    ];
    for frame in frames {
        if socket.send(Message::Text(frame.into())).await.is_err() {
            return;
        }
    }

    while let Some(Ok(message)) = socket.recv().await {
        if matches!(message, Message::Close(_)) {
            break;
        }
    }
    backend.feed_closed.send_replace(true);
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn start_backend() -> (SocketAddr, Backend) {
    let (feed_closed, _rx) = watch::channel(false);
    let backend = Backend {
        recorded: Arc::new(Mutex::new(Recorded::default())),
        feed_closed,
    };
    let router = Router::new()
        .route("/api/v1/public/scoreboard/list", get(public_list))
        .route("/api/v1/public/scoreboard/{id}", get(public_board))
        .route("/api/v1/public/scoreboard/{id}/history", get(public_history))
        .route("/api/v1/competitions/{id}/actions", post(competition_action))
        .route("/api/v1/manages/boards/list", get(managed_boards))
        .route("/ws/scoreboard", get(feed))
        .fallback(unmatched)
        .with_state(backend.clone());
    (serve(router).await, backend)
}

fn relay_state(addr: SocketAddr, token: Option<&str>) -> SharedState {
    let config = AppConfig {
        api_base_url: format!("http://{addr}/"),
        feed_url: format!("ws://{addr}/ws/scoreboard"),
        ..AppConfig::default()
    };
    let session = Arc::new(AuthSession::new(token.map(str::to_owned)));
    let api = HttpScoreboardApi::new(config.api_config(), session.clone()).unwrap();
    AppState::new(config, Arc::new(api), session)
}

async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..200 {
        if check().await {
            return true;
        }
        sleep(Duration::from_millis(10)).await;
    }
    false
}

#[tokio::test]
async fn mounted_view_merges_bootstrap_and_feed() {
    let (addr, backend) = start_backend().await;
    let state = relay_state(addr, None);

    let mounted = view_service::mount(&state, "viewer-1".into()).await;
    assert!(mounted.feed_connected);

    let merged = eventually(|| {
        let state = state.clone();
        async move {
            let view = state.read_view().await.view;
            view.board.is_some() && view.history.len() == 2
        }
    })
    .await;
    assert!(merged, "bootstrap and score update were not both applied");

    let view = state.read_view().await.view;
    assert_eq!(view.board.as_ref().map(|b| b.name.as_str()), Some("Spring Cup"));
    let scores: Vec<_> = view.teams.iter().map(|t| (t.team_id.as_str(), t.score)).collect();
    assert_eq!(scores, [("red", 6), ("blue", 2)]);
    let reasons: Vec<_> = view.history.iter().map(|h| h.reason.as_str()).collect();
    assert_eq!(reasons, ["opening", "comeback"]);
    assert_eq!(
        backend.recorded.lock().unwrap().viewer_ids,
        vec!["viewer-1".to_string()]
    );

    let projected = public_service::get_view(&state).await.unwrap();
    let scoreboard = projected.scoreboard.unwrap();
    assert_eq!(scoreboard.teams[0].team_id, "red");
    assert_eq!(scoreboard.teams[0].rank, 1);
    assert_eq!(scoreboard.timer.remaining, "00:00:00");

    assert!(view_service::unmount(&state).await);
    let mut closed = backend.feed_closed.subscribe();
    let observed = tokio::time::timeout(Duration::from_secs(2), closed.wait_for(|closed| *closed))
        .await
        .is_ok();
    assert!(observed, "backend never saw the feed close");
    assert!(state.read_view().await.view.is_loading());
}

#[tokio::test]
async fn local_http_surface_serves_the_view() {
    let (addr, _backend) = start_backend().await;
    let state = relay_state(addr, None);
    let relay = serve(routes::router(state.clone())).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{relay}/public/view"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), ClientStatus::NOT_FOUND);

    let response = client
        .put(format!("http://{relay}/view"))
        .json(&json!({ "viewer_id": "bad/id" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), ClientStatus::BAD_REQUEST);

    let response = client
        .put(format!("http://{relay}/view"))
        .json(&json!({ "viewer_id": "viewer-1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), ClientStatus::OK);

    let loaded = eventually(|| {
        let client = client.clone();
        async move {
            let body: Value = client
                .get(format!("http://{relay}/public/view"))
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            body["loading"] == json!(false)
        }
    })
    .await;
    assert!(loaded);

    let response = client
        .get(format!("http://{relay}/admin/competitions"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), ClientStatus::UNAUTHORIZED);

    let response = client
        .delete(format!("http://{relay}/view"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), ClientStatus::NO_CONTENT);
}

#[tokio::test]
async fn unauthorized_response_signs_out() {
    let (addr, backend) = start_backend().await;
    let state = relay_state(addr, Some("jwt-123"));
    let mut signed_in = state.session().watcher();
    assert!(*signed_in.borrow_and_update());

    let err = admin_service::list_managed_boards(&state).await.unwrap_err();
    match err {
        ServiceError::Backend(ApiError::Server { status, .. }) => {
            assert_eq!(status, ClientStatus::UNAUTHORIZED)
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert!(!state.session().is_signed_in().await);
    assert!(signed_in.has_changed().unwrap());
    assert_eq!(
        backend.recorded.lock().unwrap().authorization,
        vec![Some("Bearer jwt-123".to_string())]
    );
}

#[tokio::test]
async fn non_ok_action_is_a_failure() {
    let (addr, _backend) = start_backend().await;
    let state = relay_state(addr, Some("jwt-123"));

    let err = admin_service::change_state(&state, "c1", StateAction::Close)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Backend(ApiError::Server { status, .. }) if status == ClientStatus::CREATED
    ));
}

#[tokio::test]
async fn list_sends_cursor_only_when_complete() {
    let (addr, backend) = start_backend().await;
    let state = relay_state(addr, None);

    let first = public_service::list_competitions(&state, ListQuery::default())
        .await
        .unwrap();
    assert_eq!(first.rows.len(), 1);
    let cursor = first.next_cursor().unwrap();

    public_service::list_competitions(
        &state,
        ListQuery {
            size: Some(10),
            cursor_created_at: Some(cursor.created_at.clone()),
            cursor_id: Some(cursor.id.clone()),
        },
    )
    .await
    .unwrap();

    let queries = backend.recorded.lock().unwrap().list_queries.clone();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0].get("size").map(String::as_str), Some("30"));
    assert!(!queries[0].contains_key("cursorId"));
    assert_eq!(queries[1].get("size").map(String::as_str), Some("10"));
    assert_eq!(queries[1].get("cursorId").map(String::as_str), Some("17"));
    assert_eq!(
        queries[1].get("cursorCreatedAt").map(String::as_str),
        Some("2026-01-01T00:00:00")
    );
}

#[tokio::test]
async fn identifiers_cannot_escape_their_path_segment() {
    let (addr, backend) = start_backend().await;
    let session = Arc::new(AuthSession::new(Some("jwt-123".into())));
    let api = HttpScoreboardApi::new(ApiConfig::new(format!("http://{addr}/")), session).unwrap();

    let _ = api
        .change_state("x/../../../auth/sign-in", StateAction::Close)
        .await;
    let _ = api.fetch_settings("x?mode=close").await;

    assert_eq!(
        backend.recorded.lock().unwrap().raw_uris,
        vec![
            "/api/v1/competitions/x%2F..%2F..%2F..%2Fauth%2Fsign-in/actions?mode=close".to_string(),
            "/api/v1/competitions/x%3Fmode=close".to_string(),
        ]
    );
}
