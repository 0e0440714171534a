//! Sign-in and sign-up store.
//!
//! A successful login persists the bearer token and leaves for the landing
//! page with a full-page navigation, so nothing here outlives the flow. Only
//! the two failures the user can act on surface as messages; anything else is
//! logged.

use std::marker::PhantomData;
use std::sync::Arc;

use storefront_api::{ApiError, Credentials, Registration, StorefrontApi, TokenStore};
use storefront_core::{async_effect, effect::Effect, reducer::Reducer, smallvec, SmallVec};
use storefront_macros::Action;

use crate::environment::StorefrontEnvironment;
use crate::navigation::{Navigator, Route};

/// Shown when the backend rejects a login with 400
pub const INVALID_CREDENTIALS: &str = "Invalid UserName or Password";

/// Shown when the backend rejects a registration with 500
pub const USER_NAME_TAKEN: &str = "UserName already exists";

/// Auth state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    /// Login or registration in flight
    pub loading: bool,
    /// Message for the form
    pub error: Option<String>,
    /// Whether a token is stored
    pub signed_in: bool,
}

impl AuthState {
    /// State for a session that already holds a token, or not
    #[must_use]
    pub const fn new(signed_in: bool) -> Self {
        Self {
            loading: false,
            error: None,
            signed_in,
        }
    }
}

/// Auth actions
#[derive(Action, Clone, Debug, PartialEq)]
pub enum AuthAction {
    // ========== Commands ==========
    /// Sign in
    #[command]
    Login {
        /// User name and password
        credentials: Credentials,
    },

    /// Create an account, then sign in with it
    #[command]
    Register {
        /// Registration form
        registration: Registration,
    },

    /// Forget the token and go to the login page
    #[command]
    Logout,

    /// Dismiss the form message
    #[command]
    ClearError,

    // ========== Events ==========
    /// Token stored and navigation requested
    #[event]
    LoginSucceeded,

    /// Login rejected or unreachable
    #[event]
    LoginFailed {
        /// HTTP status, when the backend answered
        status: Option<u16>,
        /// Error description
        error: String,
    },

    /// Registration rejected or unreachable
    #[event]
    RegisterFailed {
        /// HTTP status, when the backend answered
        status: Option<u16>,
        /// Error description
        error: String,
    },

    /// Token cleared
    #[event]
    LoggedOut,
}

/// Auth reducer
#[derive(Debug, Clone)]
pub struct AuthReducer<B> {
    _phantom: PhantomData<B>,
}

impl<B> AuthReducer<B> {
    /// Create a new auth reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<B> Default for AuthReducer<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// Log in, store the token and leave for the landing page
async fn sign_in<B: StorefrontApi>(
    api: &B,
    tokens: &dyn TokenStore,
    navigator: &dyn Navigator,
    credentials: &Credentials,
) -> Result<(), ApiError> {
    let token = api.login(credentials).await?;
    tokens.save(&token)?;
    tracing::info!(user = %credentials.user_name, "Signed in");
    navigator.navigate(Route::Home);
    Ok(())
}

fn login_failed(error: &ApiError) -> AuthAction {
    AuthAction::LoginFailed {
        status: error.status(),
        error: error.to_string(),
    }
}

impl<B> Reducer for AuthReducer<B>
where
    B: StorefrontApi + Clone + 'static,
{
    type State = AuthState;
    type Action = AuthAction;
    type Environment = StorefrontEnvironment<B>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AuthAction::Login { credentials } => {
                state.loading = true;
                state.error = None;

                let api = env.api.clone();
                let tokens = Arc::clone(&env.tokens);
                let navigator = Arc::clone(&env.navigator);

                smallvec![async_effect! {
                    match sign_in(&api, tokens.as_ref(), navigator.as_ref(), &credentials).await {
                        Ok(()) => Some(AuthAction::LoginSucceeded),
                        Err(error) => Some(login_failed(&error)),
                    }
                }]
            },

            AuthAction::Register { registration } => {
                state.loading = true;
                state.error = None;

                let api = env.api.clone();
                let tokens = Arc::clone(&env.tokens);
                let navigator = Arc::clone(&env.navigator);

                smallvec![async_effect! {
                    if let Err(error) = api.register(&registration).await {
                        return Some(AuthAction::RegisterFailed {
                            status: error.status(),
                            error: error.to_string(),
                        });
                    }

                    tracing::info!(user = %registration.user_name, "Registered");
                    let credentials = registration.credentials();
                    match sign_in(&api, tokens.as_ref(), navigator.as_ref(), &credentials).await {
                        Ok(()) => Some(AuthAction::LoginSucceeded),
                        Err(error) => Some(login_failed(&error)),
                    }
                }]
            },

            AuthAction::Logout => {
                let tokens = Arc::clone(&env.tokens);
                let navigator = Arc::clone(&env.navigator);

                smallvec![async_effect! {
                    tokens.clear();
                    navigator.navigate(Route::Login);
                    Some(AuthAction::LoggedOut)
                }]
            },

            AuthAction::ClearError => {
                state.error = None;
                SmallVec::new()
            },

            AuthAction::LoginSucceeded => {
                state.loading = false;
                state.signed_in = true;
                SmallVec::new()
            },

            AuthAction::LoginFailed { status, error } => {
                state.loading = false;
                if status == Some(400) {
                    state.error = Some(INVALID_CREDENTIALS.to_string());
                } else {
                    tracing::warn!(?status, %error, "Login failed");
                }
                SmallVec::new()
            },

            AuthAction::RegisterFailed { status, error } => {
                state.loading = false;
                if status == Some(500) {
                    state.error = Some(USER_NAME_TAKEN.to_string());
                } else {
                    tracing::warn!(?status, %error, "Registration failed");
                }
                SmallVec::new()
            },

            AuthAction::LoggedOut => {
                state.signed_in = false;
                state.loading = false;
                SmallVec::new()
            },
        }
    }
}
