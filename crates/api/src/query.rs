//! Query string types shared by list endpoints.

use commons_core::pagination::PageRequest;
use serde::Deserialize;

/// Pagination parameters for `GET /` (`?page=&limit=`).
///
/// Bounds are checked by [`PageRequest::resolve`]; out-of-range values are
/// rejected rather than clamped.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl From<PaginationParams> for PageRequest {
    fn from(params: PaginationParams) -> Self {
        PageRequest {
            page: params.page,
            limit: params.limit,
        }
    }
}
