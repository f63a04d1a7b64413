use axum::extract::{rejection::QueryRejection, Path, Query, State};
use serde::Serialize;
use tracing::{info, warn};

use super::{query_rejection, validate_id};
use crate::app::AppState;
use crate::auth::{self, Credentials};
use crate::database::models::{User, UserResponse};
use crate::database::{Collection, Repository};
use crate::filter::params::first_wins;
use crate::filter::DocumentFilter;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Default)]
pub struct UsersQuery {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UsersQuery {
    /// First occurrence of a repeated key wins
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "email" => first_wins(&mut query.email, value),
                "password" => first_wins(&mut query.password, value),
                _ => {}
            }
        }
        query
    }
}

/// A single authenticated user, or the (password-stripped) listing
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum UsersBody {
    One(UserResponse),
    Many(Vec<UserResponse>),
}

fn repository(state: &AppState) -> Repository<User> {
    Repository::new(Collection::Users, &state.db)
}

/// GET /api/users - list filtered by email, or authenticate when a
/// password is supplied
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<UsersBody> {
    let Query(pairs) = query.map_err(query_rejection)?;
    let query = UsersQuery::from_pairs(pairs);
    let credentials = Credentials::new(query.email.as_deref(), query.password.as_deref());

    let candidates = repository(&state)
        .select_any(DocumentFilter::new().eq_opt("email", credentials.email))
        .await?;

    let Some(password) = credentials.password else {
        let users = candidates.into_iter().map(UserResponse::from).collect();
        return Ok(ApiResponse::success(UsersBody::Many(users)));
    };

    match auth::authenticate(candidates, password) {
        Ok(user) => {
            info!("Authenticated user {}", user.id);
            Ok(ApiResponse::success(UsersBody::One(user.into())))
        }
        Err(e) => {
            warn!("Rejected credentials for {:?}", credentials.email);
            Err(e.into())
        }
    }
}

/// GET /api/users/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<UserResponse> {
    let id = validate_id(&id)?;
    let user = repository(&state)
        .select_404(DocumentFilter::by_id(id), "User not found")
        .await?;

    Ok(ApiResponse::success(user.into()))
}
