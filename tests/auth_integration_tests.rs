use axum::{
    extract::FromRequestParts,
    http::{Method, Request, StatusCode, Uri, header, request::Parts},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use market_shell::{
    AppState,
    auth::{AuthUser, Claims, Viewer},
    config::{AppConfig, Env},
    models::{Role, User},
    repository::InMemoryRepository,
};
use std::{sync::Arc, time::SystemTime};
use uuid::Uuid;

// --- Helper Functions ---

const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";
const FARMER_ID: Uuid = Uuid::from_u128(1);
const ODD_ROLE_ID: Uuid = Uuid::from_u128(2);

fn now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn create_token(user_id: Uuid, iat: u64, exp: u64, secret: &str) -> String {
    let claims = Claims {
        sub: user_id,
        iat: iat as usize,
        exp: exp as usize,
    };
    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

fn valid_token(user_id: Uuid) -> String {
    create_token(user_id, now(), now() + 3600, TEST_JWT_SECRET)
}

fn create_app_state(env: Env) -> AppState {
    let repo = InMemoryRepository::with_users([
        User {
            id: FARMER_ID,
            email: "grower@farm.test".to_string(),
            role: "FARMER".to_string(),
            theme: None,
        },
        User {
            id: ODD_ROLE_ID,
            email: "courier@farm.test".to_string(),
            role: "COURIER".to_string(),
            theme: None,
        },
    ]);

    let mut config = AppConfig::default();
    config.env = env;
    config.jwt_secret = TEST_JWT_SECRET.to_string();

    AppState::new(Arc::new(repo), config)
}

fn get_request_parts(uri: Uri) -> Parts {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

fn with_bearer(mut parts: Parts, token: &str) -> Parts {
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
    parts
}

fn with_user_header(mut parts: Parts, user_id: Uuid) -> Parts {
    parts.headers.insert(
        header::HeaderName::from_static("x-user-id"),
        header::HeaderValue::from_str(&user_id.to_string()).unwrap(),
    );
    parts
}

async fn resolve_viewer(parts: &mut Parts, state: &AppState) -> Viewer {
    match Viewer::from_request_parts(parts, state).await {
        Ok(viewer) => viewer,
        Err(never) => match never {},
    }
}

// --- Tests ---

#[tokio::test]
async fn test_viewer_from_valid_jwt() {
    let state = create_app_state(Env::Production);
    let mut parts = with_bearer(get_request_parts("/".parse().unwrap()), &valid_token(FARMER_ID));

    let viewer = resolve_viewer(&mut parts, &state).await;

    assert_eq!(viewer.user_id, Some(FARMER_ID));
    assert!(viewer.identity.is_authenticated);
    assert_eq!(viewer.identity.role, Some(Role::Farmer));
}

#[tokio::test]
async fn test_viewer_without_credentials_is_anonymous() {
    let state = create_app_state(Env::Production);
    let mut parts = get_request_parts("/".parse().unwrap());

    let viewer = resolve_viewer(&mut parts, &state).await;

    assert_eq!(viewer.user_id, None);
    assert!(!viewer.identity.is_authenticated);
    assert_eq!(viewer.identity.role, None);
}

#[tokio::test]
async fn test_viewer_with_expired_jwt_is_anonymous() {
    let state = create_app_state(Env::Production);
    // Expired well beyond the default 60s leeway.
    let token = create_token(FARMER_ID, now() - 7200, now() - 3600, TEST_JWT_SECRET);
    let mut parts = with_bearer(get_request_parts("/".parse().unwrap()), &token);

    let viewer = resolve_viewer(&mut parts, &state).await;

    assert!(!viewer.identity.is_authenticated);
}

#[tokio::test]
async fn test_viewer_with_foreign_signature_is_anonymous() {
    let state = create_app_state(Env::Production);
    let token = create_token(FARMER_ID, now(), now() + 3600, "some-other-secret-entirely");
    let mut parts = with_bearer(get_request_parts("/".parse().unwrap()), &token);

    let viewer = resolve_viewer(&mut parts, &state).await;

    assert!(!viewer.identity.is_authenticated);
}

#[tokio::test]
async fn test_viewer_for_deleted_profile_is_anonymous() {
    let state = create_app_state(Env::Production);
    let mut parts = with_bearer(
        get_request_parts("/".parse().unwrap()),
        &valid_token(Uuid::new_v4()),
    );

    let viewer = resolve_viewer(&mut parts, &state).await;

    assert!(!viewer.identity.is_authenticated);
}

#[tokio::test]
async fn test_viewer_keeps_unrecognized_role() {
    let state = create_app_state(Env::Production);
    let mut parts = with_bearer(get_request_parts("/".parse().unwrap()), &valid_token(ODD_ROLE_ID));

    let viewer = resolve_viewer(&mut parts, &state).await;

    assert!(viewer.identity.is_authenticated);
    assert_eq!(
        viewer.identity.role,
        Some(Role::Unrecognized("COURIER".to_string()))
    );
}

#[tokio::test]
async fn test_local_bypass_success() {
    let state = create_app_state(Env::Local);
    let mut parts = with_user_header(get_request_parts("/".parse().unwrap()), FARMER_ID);

    let viewer = resolve_viewer(&mut parts, &state).await;

    assert_eq!(viewer.user_id, Some(FARMER_ID));
    assert_eq!(viewer.identity.role, Some(Role::Farmer));
}

#[tokio::test]
async fn test_local_bypass_disabled_in_prod() {
    let state = create_app_state(Env::Production);
    let mut parts = with_user_header(get_request_parts("/".parse().unwrap()), FARMER_ID);

    let viewer = resolve_viewer(&mut parts, &state).await;

    assert!(!viewer.identity.is_authenticated);
}

#[tokio::test]
async fn test_auth_user_accepts_session() {
    let state = create_app_state(Env::Production);
    let mut parts = with_bearer(get_request_parts("/".parse().unwrap()), &valid_token(FARMER_ID));

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await;

    let user = auth_user.unwrap();
    assert_eq!(user.id, FARMER_ID);
    assert_eq!(user.identity.role, Some(Role::Farmer));
}

#[tokio::test]
async fn test_auth_user_rejects_anonymous() {
    let state = create_app_state(Env::Production);
    let mut parts = get_request_parts("/".parse().unwrap());

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await;

    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}
