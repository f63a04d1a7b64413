use axum::extract::State;

use crate::app::AppState;
use crate::database::models::Category;
use crate::database::{Collection, Repository};
use crate::filter::DocumentFilter;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/categories - every category in store order
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let categories = Repository::<Category>::new(Collection::Categories, &state.db)
        .select_any(DocumentFilter::new())
        .await?;

    Ok(ApiResponse::success(categories))
}
