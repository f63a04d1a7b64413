use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use tracing::{debug, info};

use super::{body_rejection, query_rejection, validate_id};
use crate::app::AppState;
use crate::database::models::{Product, ProductInput, ProductsResponse};
use crate::database::{Collection, QueryBuilder, Repository};
use crate::error::ApiError;
use crate::filter::{DocumentFilter, ListQuery, PaginationParams};
use crate::middleware::{ApiResponse, ApiResult};

const NOT_FOUND: &str = "Product not found";

fn repository(state: &AppState) -> Repository<Product> {
    Repository::new(Collection::Products, &state.db)
}

/// Required fields must be present. Attribute type/value mismatches are
/// accepted as-is and only noted in the debug log.
fn validate_input(input: &ProductInput) -> Result<(), ApiError> {
    let missing = input.missing_fields();
    if !missing.is_empty() {
        return Err(ApiError::missing_fields(&missing));
    }

    for attribute in input.attributes.iter().filter(|a| !a.is_consistent()) {
        debug!(
            "Attribute '{}' declared as {} holds a differently shaped value",
            attribute.code,
            attribute.attr_type.as_str()
        );
    }
    Ok(())
}

/// GET /api/products - filtered, sorted, paginated listing with total count
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<ProductsResponse> {
    let Query(pairs) = query.map_err(query_rejection)?;
    let params = PaginationParams::from_query(&ListQuery::from_pairs(pairs));

    let page = QueryBuilder::<Product>::from_params(Collection::Products, &params)?
        .select_page(&state.db)
        .await?;

    Ok(ApiResponse::success(ProductsResponse {
        products: page.items,
        total: page.total,
    }))
}

/// POST /api/products - the store assigns the identifier
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<Product> {
    let Json(input) = body.map_err(body_rejection)?;
    validate_input(&input)?;

    let id = repository(&state).insert(&input).await?;
    info!("Created product {}", id);

    Ok(ApiResponse::created(input.into_product(id)))
}

/// GET /api/products/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Product> {
    let id = validate_id(&id)?;
    let product = repository(&state)
        .select_404(DocumentFilter::by_id(id), NOT_FOUND)
        .await?;

    Ok(ApiResponse::success(product))
}

/// PUT /api/products/:id - full replace of the mutable fields.
/// The path identifier is authoritative; any body `id` is ignored.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<Product> {
    let id = validate_id(&id)?.to_string();
    let Json(input) = body.map_err(body_rejection)?;
    validate_input(&input)?;

    if !repository(&state).update_by_id(&id, &input).await? {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    info!("Updated product {}", id);

    Ok(ApiResponse::success(input.into_product(id)))
}
