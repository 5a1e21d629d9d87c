//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod expenses;
pub mod health;
pub mod reports;
pub mod transactions;

// Re-export all handlers for use in router
pub use expenses::*;
pub use health::*;
pub use reports::*;
pub use transactions::*;

use axum::http::HeaderMap;
use serde::Deserialize;

use crate::USER_ID_HEADER;
use financas_core::DEFAULT_USER_ID;

/// `userId` query parameter shared by several endpoints
#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Resolve the caller's user id: explicit value, then `X-User-Id` header, then query
///
/// Blank values are skipped. Falls back to [`DEFAULT_USER_ID`].
pub(crate) fn resolve_user_id(
    explicit: Option<&str>,
    headers: &HeaderMap,
    query: &UserQuery,
) -> String {
    let header = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok());

    [explicit, header, query.user_id.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_USER_ID)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_resolve_user_id_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("from-header"));
        let query = UserQuery {
            user_id: Some("from-query".to_string()),
        };

        assert_eq!(resolve_user_id(Some("from-body"), &headers, &query), "from-body");
        assert_eq!(resolve_user_id(Some("  "), &headers, &query), "from-header");
        assert_eq!(resolve_user_id(None, &HeaderMap::new(), &query), "from-query");
        assert_eq!(
            resolve_user_id(None, &HeaderMap::new(), &UserQuery::default()),
            DEFAULT_USER_ID
        );
    }
}
