//! Page navigation seam.
//!
//! Stores never render anything; when a flow ends on another page (login
//! success, logout, expired session) they ask the [`Navigator`] for a
//! full-page navigation, which in a browser host discards in-memory state.

use std::fmt;
use std::sync::Arc;

use storefront_api::UnauthorizedHandler;

/// Pages a store can send the user to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    /// Landing page
    Home,
    /// Sign-in page
    Login,
    /// Sign-up page
    Register,
    /// Product catalog
    Catalog,
    /// Shopping cart
    Cart,
    /// Profile editor
    Profile,
}

impl Route {
    /// URL path of the page
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Catalog => "/catalog",
            Self::Cart => "/cart",
            Self::Profile => "/profile",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Host-provided full-page navigation
pub trait Navigator: Send + Sync {
    /// Leave the current page for `route`
    fn navigate(&self, route: Route);
}

/// Navigator for headless hosts: records the request in the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, route: Route) {
        tracing::info!(%route, "Navigate");
    }
}

/// Sends the user to the login page whenever the backend rejects the session
#[derive(Clone)]
pub struct RedirectToLogin {
    navigator: Arc<dyn Navigator>,
}

impl RedirectToLogin {
    /// Redirect through `navigator`
    #[must_use]
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self { navigator }
    }
}

impl UnauthorizedHandler for RedirectToLogin {
    fn on_unauthorized(&self) {
        self.navigator.navigate(Route::Login);
    }
}

impl fmt::Debug for RedirectToLogin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedirectToLogin").finish_non_exhaustive()
    }
}
