use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use sipadesa_core::{
    core_version, PasswordHasher, RegistrationRequest, Resident, ResidentScope, ResidentService,
    ResidentStats, SessionService, SqliteResidentRepository, SqliteSessionRepository,
    SqliteUserRepository, User, UserDraft, UserRole, UserService,
};

use super::{
    error::ApiError,
    models::{
        HealthResponse, LoginRequest, LoginResponse, PasswordRequest, RegisterRequest,
        ResidentPayload, ResidentQuery, UserPayload, VerifyRequest,
    },
    AppState,
};

const USER_ADMINS: &[UserRole] = &[UserRole::Admin];
const RESIDENT_EDITORS: &[UserRole] = &[UserRole::Admin, UserRole::RtRw];

pub async fn health<H: PasswordHasher + Send + Sync + 'static>(
    State(state): State<AppState<H>>,
) -> impl IntoResponse {
    let uptime_secs = state.started_at.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            version: core_version(),
            uptime_secs,
        }),
    )
}

pub async fn login<H: PasswordHasher + Send + Sync + 'static>(
    State(state): State<AppState<H>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload?;
    let response = state
        .run(move |conn, hasher| {
            let user = UserService::new(SqliteUserRepository::new(conn), hasher)
                .login(&request.username, &request.password)?;
            let session = SessionService::new(SqliteSessionRepository::new(conn)).open(&user)?;
            Ok(LoginResponse {
                token: session.token,
                user,
            })
        })
        .await?;
    Ok(Json(response))
}

pub async fn register<H: PasswordHasher + Send + Sync + 'static>(
    State(state): State<AppState<H>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let user = state
        .run(move |conn, hasher| {
            UserService::new(SqliteUserRepository::new(conn), hasher).register(
                RegistrationRequest {
                    full_name: request.full_name,
                    username: request.username,
                    password: request.password,
                    role: request.role,
                },
            )
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn logout<H: PasswordHasher + Send + Sync + 'static>(
    State(state): State<AppState<H>>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let token = bearer_token(&headers)?;
    state
        .run(move |conn, _| SessionService::new(SqliteSessionRepository::new(conn)).close(&token))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_users<H: PasswordHasher + Send + Sync + 'static>(
    State(state): State<AppState<H>>,
    headers: HeaderMap,
) -> Result<Json<Vec<User>>, ApiError> {
    authorize(&state, &headers, USER_ADMINS).await?;
    let users = state
        .run(|conn, hasher| UserService::new(SqliteUserRepository::new(conn), hasher).fetch_all())
        .await?;
    Ok(Json(users))
}

pub async fn put_user<H: PasswordHasher + Send + Sync + 'static>(
    State(state): State<AppState<H>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    authorize(&state, &headers, USER_ADMINS).await?;
    let Json(payload) = payload?;
    let user = state
        .run(move |conn, hasher| {
            UserService::new(SqliteUserRepository::new(conn), hasher).put_user(
                &id,
                UserDraft {
                    username: payload.username,
                    password: payload.password,
                    full_name: payload.full_name,
                    role: payload.role,
                    area: payload.area,
                },
            )
        })
        .await?;
    Ok(Json(user))
}

pub async fn delete_user<H: PasswordHasher + Send + Sync + 'static>(
    State(state): State<AppState<H>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let actor = authorize(&state, &headers, USER_ADMINS).await?;
    state
        .run(move |conn, hasher| {
            UserService::new(SqliteUserRepository::new(conn), hasher).remove_user(&actor.id, &id)
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn verify_user<H: PasswordHasher + Send + Sync + 'static>(
    State(state): State<AppState<H>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    authorize(&state, &headers, USER_ADMINS).await?;
    let Json(request) = payload?;
    let user = state
        .run(move |conn, hasher| {
            UserService::new(SqliteUserRepository::new(conn), hasher)
                .verify_user(&id, request.area.as_deref())
        })
        .await?;
    Ok(Json(user))
}

pub async fn reset_password<H: PasswordHasher + Send + Sync + 'static>(
    State(state): State<AppState<H>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<PasswordRequest>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    authorize(&state, &headers, USER_ADMINS).await?;
    let Json(request) = payload?;
    let user = state
        .run(move |conn, hasher| {
            UserService::new(SqliteUserRepository::new(conn), hasher)
                .reset_password(&id, &request.password)
        })
        .await?;
    Ok(Json(user))
}

pub async fn list_residents<H: PasswordHasher + Send + Sync + 'static>(
    State(state): State<AppState<H>>,
    headers: HeaderMap,
    Query(query): Query<ResidentQuery>,
) -> Result<Json<Vec<Resident>>, ApiError> {
    let viewer = authenticate(&state, &headers).await?;
    let scope = ResidentScope::for_user(&viewer);
    let residents = state
        .run(move |conn, _| {
            ResidentService::new(SqliteResidentRepository::new(conn)).search(&query.q, &scope)
        })
        .await?;
    Ok(Json(residents))
}

pub async fn resident_stats<H: PasswordHasher + Send + Sync + 'static>(
    State(state): State<AppState<H>>,
    headers: HeaderMap,
) -> Result<Json<ResidentStats>, ApiError> {
    let viewer = authenticate(&state, &headers).await?;
    let scope = ResidentScope::for_user(&viewer);
    let rule = state.config.age_rule;
    let today = chrono::Local::now().date_naive();
    let stats = state
        .run(move |conn, _| {
            ResidentService::new(SqliteResidentRepository::new(conn))
                .statistics(&scope, today, rule)
        })
        .await?;
    Ok(Json(stats))
}

pub async fn put_resident<H: PasswordHasher + Send + Sync + 'static>(
    State(state): State<AppState<H>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<ResidentPayload>, JsonRejection>,
) -> Result<Json<Resident>, ApiError> {
    let editor = authorize(&state, &headers, RESIDENT_EDITORS).await?;
    let Json(payload) = payload?;
    let resident = payload.into_resident(id, &editor);
    let saved = state
        .run(move |conn, _| ResidentService::new(SqliteResidentRepository::new(conn)).save(resident))
        .await?;
    Ok(Json(saved))
}

pub async fn delete_resident<H: PasswordHasher + Send + Sync + 'static>(
    State(state): State<AppState<H>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    authorize(&state, &headers, RESIDENT_EDITORS).await?;
    state
        .run(move |conn, _| ResidentService::new(SqliteResidentRepository::new(conn)).delete(&id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn not_found() -> ApiError {
    ApiError::not_found("route not found")
}

async fn authenticate<H: PasswordHasher + Send + Sync + 'static>(
    state: &AppState<H>,
    headers: &HeaderMap,
) -> Result<User, ApiError> {
    let token = bearer_token(headers)?;
    let user = state
        .run(move |conn, _| SessionService::new(SqliteSessionRepository::new(conn)).resolve(&token))
        .await?;
    match user {
        Some(user) if user.is_active() => Ok(user),
        _ => Err(ApiError::unauthorized()),
    }
}

async fn authorize<H: PasswordHasher + Send + Sync + 'static>(
    state: &AppState<H>,
    headers: &HeaderMap,
    allowed: &[UserRole],
) -> Result<User, ApiError> {
    let user = authenticate(state, headers).await?;
    if !allowed.contains(&user.role) {
        log::warn!(
            "event=http_authorize module=http status=rejected user_id={} role={}",
            user.id,
            user.role.as_str()
        );
        return Err(ApiError::forbidden());
    }
    Ok(user)
}

fn bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or_else(ApiError::unauthorized)
}
