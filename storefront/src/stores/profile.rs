//! Profile editor store.
//!
//! Updates follow the cart's model: one multipart `PUT`, then a re-fetch in
//! the same effect. A failed update keeps the profile already on screen.

use std::marker::PhantomData;

use storefront_api::{ProfileUpdate, StorefrontApi, UserProfile};
use storefront_core::{async_effect, effect::Effect, reducer::Reducer, smallvec, SmallVec};
use storefront_macros::Action;

use crate::environment::StorefrontEnvironment;

/// Shown when a profile update is rejected
pub const PROFILE_UPDATE_FAILED: &str = "Failed to update profile";

/// Profile state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileState {
    /// Signed-in user's profile, once loaded
    pub profile: Option<UserProfile>,
    /// Fetch in flight
    pub loading: bool,
    /// Update in flight
    pub saving: bool,
    /// Message for the form
    pub error: Option<String>,
}

/// Profile actions
#[derive(Action, Clone, Debug, PartialEq)]
pub enum ProfileAction {
    // ========== Commands ==========
    /// Fetch the profile
    #[command]
    LoadProfile,

    /// Send an edit, then re-fetch
    #[command]
    UpdateProfile {
        /// Changed fields and optional avatar
        update: ProfileUpdate,
    },

    // ========== Events ==========
    /// Fetch finished; `None` when it failed
    #[event]
    ProfileLoaded {
        /// Fetched profile
        profile: Option<UserProfile>,
    },

    /// Update accepted; `None` when the re-fetch failed
    #[event]
    ProfileUpdated {
        /// Profile after the update
        profile: Option<UserProfile>,
    },

    /// Update rejected
    #[event]
    ProfileUpdateFailed {
        /// Error description
        error: String,
    },
}

/// Profile reducer
#[derive(Debug, Clone)]
pub struct ProfileReducer<B> {
    _phantom: PhantomData<B>,
}

impl<B> ProfileReducer<B> {
    /// Create a new profile reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<B> Default for ProfileReducer<B> {
    fn default() -> Self {
        Self::new()
    }
}

async fn fetch_profile<B: StorefrontApi>(api: &B) -> Option<UserProfile> {
    match api.profile().await {
        Ok(profile) => Some(profile),
        Err(error) => {
            tracing::warn!(%error, "Failed to load profile");
            None
        },
    }
}

impl<B> Reducer for ProfileReducer<B>
where
    B: StorefrontApi + Clone + 'static,
{
    type State = ProfileState;
    type Action = ProfileAction;
    type Environment = StorefrontEnvironment<B>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ProfileAction::LoadProfile => {
                state.loading = true;

                let api = env.api.clone();
                smallvec![async_effect! {
                    Some(ProfileAction::ProfileLoaded { profile: fetch_profile(&api).await })
                }]
            },

            ProfileAction::UpdateProfile { update } => {
                state.saving = true;
                state.error = None;

                let api = env.api.clone();
                smallvec![async_effect! {
                    if let Err(error) = api.update_profile(&update).await {
                        tracing::warn!(%error, "Profile update failed");
                        return Some(ProfileAction::ProfileUpdateFailed { error: error.to_string() });
                    }
                    Some(ProfileAction::ProfileUpdated { profile: fetch_profile(&api).await })
                }]
            },

            ProfileAction::ProfileLoaded { profile } => {
                state.loading = false;
                if profile.is_some() {
                    state.profile = profile;
                }
                SmallVec::new()
            },

            ProfileAction::ProfileUpdated { profile } => {
                state.saving = false;
                if profile.is_some() {
                    state.profile = profile;
                }
                SmallVec::new()
            },

            ProfileAction::ProfileUpdateFailed { .. } => {
                state.saving = false;
                state.error = Some(PROFILE_UPDATE_FAILED.to_string());
                SmallVec::new()
            },
        }
    }
}
