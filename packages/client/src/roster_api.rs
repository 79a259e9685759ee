//! Roster source: `GET /api/users`.

use hanashi_server::infrastructure::dto::http::UserSummaryDto;

use crate::error::ClientError;

/// Fetch every known user from the server's HTTP API.
pub async fn fetch_roster(api_url: &str) -> Result<Vec<UserSummaryDto>, ClientError> {
    let url = format!("{}/api/users", api_url.trim_end_matches('/'));
    let users = reqwest::get(&url)
        .await?
        .error_for_status()?
        .json::<Vec<UserSummaryDto>>()
        .await?;
    tracing::debug!("Fetched {} users from {}", users.len(), url);
    Ok(users)
}
