use actix_web::web;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{
    generate_token, hash_password, verify_password, AuthResponse, AuthSettings, LoginRequest,
    RegisterRequest,
};
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, User, UserProfile};
use crate::repository::Store;

/// Creates an account. The username must not be taken.
pub async fn register(
    store: &dyn Store,
    settings: &AuthSettings,
    request: RegisterRequest,
) -> AppResult<UserProfile> {
    request.validate()?;

    if store.find_user_by_username(&request.username).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "Username '{}' is already taken",
            request.username
        )));
    }

    // bcrypt is CPU bound, keep it off the async workers.
    let cost = settings.bcrypt_cost;
    let password = request.password;
    let password_hash = web::block(move || hash_password(&password, cost))
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))??;

    let user = store
        .create_user(NewUser {
            username: request.username,
            password_hash,
        })
        .await?;

    log::info!("Registered user {} ({})", user.username, user.id);
    Ok(user.into())
}

/// Checks credentials and issues an access token.
///
/// Unknown usernames and wrong passwords produce the same error.
pub async fn login(
    store: &dyn Store,
    settings: &AuthSettings,
    request: LoginRequest,
) -> AppResult<AuthResponse> {
    request.validate()?;

    let user = match store.find_user_by_username(&request.username).await? {
        Some(user) => user,
        None => {
            log::warn!("Login attempt for unknown user {}", request.username);
            return Err(invalid_credentials());
        }
    };

    let password = request.password;
    let password_hash = user.password_hash.clone();
    let matches = web::block(move || verify_password(&password, &password_hash))
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))??;

    if !matches {
        log::warn!("Failed login for user {}", user.username);
        return Err(invalid_credentials());
    }

    let token = generate_token(settings, user.id, &user.username)?;
    Ok(AuthResponse::bearer(token, settings, user.id))
}

/// Profile of the token holder.
pub async fn current_user(store: &dyn Store, user_id: Uuid) -> AppResult<UserProfile> {
    require_user(store, user_id).await.map(UserProfile::from)
}

/// Loads the token holder. A valid token whose user no longer exists is
/// rejected with `Unauthorized`.
pub async fn require_user(store: &dyn Store, user_id: Uuid) -> AppResult<User> {
    store.find_user_by_id(user_id).await?.ok_or_else(|| {
        log::warn!("Token presented for missing user {}", user_id);
        AppError::Unauthorized("User no longer exists".into())
    })
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_token;
    use crate::repository::InMemoryStore;
    use jsonwebtoken::Algorithm;

    fn settings() -> AuthSettings {
        AuthSettings {
            jwt_secret: "service-test-secret".into(),
            jwt_algorithm: Algorithm::HS256,
            jwt_expiration_minutes: 15,
            bcrypt_cost: 4,
        }
    }

    fn register_request(username: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            password: "Password123!".into(),
        }
    }

    #[actix_rt::test]
    async fn test_register_then_login() {
        let store = InMemoryStore::new();
        let settings = settings();

        let profile = register(&store, &settings, register_request("clerk"))
            .await
            .unwrap();
        assert_eq!(profile.username, "clerk");

        let response = login(
            &store,
            &settings,
            LoginRequest {
                username: "clerk".into(),
                password: "Password123!".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(response.user_id, profile.id);
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 15 * 60);
        assert_eq!(verify_token(&settings, &response.token).unwrap().sub, profile.id);
    }

    #[actix_rt::test]
    async fn test_register_twice_conflicts() {
        let store = InMemoryStore::new();
        let settings = settings();

        register(&store, &settings, register_request("clerk"))
            .await
            .unwrap();
        let second = register(&store, &settings, register_request("clerk")).await;
        assert!(matches!(second, Err(AppError::Conflict(_))));
    }

    #[actix_rt::test]
    async fn test_login_failures_are_unauthorized() {
        let store = InMemoryStore::new();
        let settings = settings();
        register(&store, &settings, register_request("clerk"))
            .await
            .unwrap();

        for (username, password) in [("clerk", "WrongPassword!"), ("nobody", "Password123!")] {
            let result = login(
                &store,
                &settings,
                LoginRequest {
                    username: username.into(),
                    password: password.into(),
                },
            )
            .await;
            assert!(
                matches!(result, Err(AppError::Unauthorized(ref msg)) if msg == "Invalid credentials"),
                "{}/{} should be rejected",
                username,
                password
            );
        }
    }

    #[actix_rt::test]
    async fn test_current_user_for_unknown_id() {
        let store = InMemoryStore::new();
        let result = current_user(&store, Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
