//! Service helpers that expose read-only public projections of the mounted view.

use time::OffsetDateTime;

use crate::{
    dto::{
        admin::ListQuery,
        competition::CompetitionListPage,
        view::{HistoryResponse, ScoreboardView, ViewResponse},
    },
    error::ServiceError,
    state::SharedState,
};

fn nothing_mounted() -> ServiceError {
    ServiceError::NotFound("no scoreboard is mounted".into())
}

/// Ranked teams, timers and history of the mounted view, recomputed now.
pub async fn get_view(state: &SharedState) -> Result<ViewResponse, ServiceError> {
    let slot = state.read_view().await;
    let viewer_id = slot.viewer_id.ok_or_else(nothing_mounted)?;
    let scoreboard = ScoreboardView::project(
        &viewer_id,
        &slot.view,
        OffsetDateTime::now_utc(),
        state.config().urgent_threshold_secs,
    );

    Ok(ViewResponse {
        viewer_id,
        loading: scoreboard.is_none(),
        scoreboard,
    })
}

/// History of the mounted view in arrival order.
pub async fn get_history(state: &SharedState) -> Result<HistoryResponse, ServiceError> {
    let slot = state.read_view().await;
    let viewer_id = slot.viewer_id.ok_or_else(nothing_mounted)?;
    Ok(HistoryResponse {
        viewer_id,
        history: slot.view.history,
    })
}

/// One page of the public competition list. Without both cursor halves the first page is read.
pub async fn list_competitions(
    state: &SharedState,
    query: ListQuery,
) -> Result<CompetitionListPage, ServiceError> {
    let size = query.size.unwrap_or(state.config().list_page_size);
    Ok(state
        .api()
        .fetch_competition_list(size, query.cursor())
        .await?)
}
