use super::{ApiClient, ApiError};
use crate::models::{Boxscore, StatDelta, StatField, StatUpdateRequest, StatUpdateResponse};

impl ApiClient {
    /// Whole-match boxscore: every player line plus team totals.
    pub async fn fetch_boxscore(&self, match_id: i64) -> Result<Boxscore, ApiError> {
        self.get(&format!("/matches/{match_id}/boxscore"), &[]).await
    }

    /// post_delta
    ///
    /// Records a +1 / -1 on one player counter and returns the updated line and totals.
    pub async fn post_delta(
        &self,
        match_id: i64,
        player_id: i64,
        field: StatField,
        delta: StatDelta,
    ) -> Result<StatUpdateResponse, ApiError> {
        let body = StatUpdateRequest {
            player_id,
            field,
            delta,
        };
        tracing::info!(match_id, player_id, field = field.as_str(), ?delta, "posting stat delta");
        self.post(&format!("/matches/{match_id}/stat"), &body).await
    }
}
