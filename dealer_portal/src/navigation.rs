//! Protected routing between the login view and the dashboard.

use std::fmt;

/// Addressable locations in the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Root,
    Login,
    Dashboard,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// What is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Dashboard,
}

/// Apply the access rules: the dashboard needs a session, the login view
/// is only for signed-out users, and the root sends to whichever applies.
pub fn resolve(route: Route, authenticated: bool) -> Route {
    match route {
        Route::Dashboard if authenticated => Route::Dashboard,
        Route::Login if !authenticated => Route::Login,
        // Redirects
        Route::Root | Route::Login | Route::Dashboard => {
            if authenticated {
                Route::Dashboard
            } else {
                Route::Login
            }
        }
    }
}

fn view_of(route: Route) -> View {
    match route {
        Route::Dashboard => View::Dashboard,
        Route::Login | Route::Root => View::Login,
    }
}

/// Current location, kept consistent with the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    route: Route,
}

impl Default for Navigator {
    fn default() -> Self {
        Self { route: Route::Root }
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn view(&self) -> View {
        view_of(self.route)
    }

    /// Go to `route`, redirecting if the session does not allow it.
    pub fn navigate(&mut self, route: Route, authenticated: bool) -> View {
        self.route = resolve(route, authenticated);
        if self.route != route {
            log::debug!("Redirected {route} -> {}", self.route);
        }
        self.view()
    }

    /// Re-apply the rules after the session changed.
    pub fn sync(&mut self, authenticated: bool) -> View {
        self.navigate(self.route, authenticated)
    }

    /// Unconditionally show the login view.
    pub fn force_login(&mut self) -> View {
        self.route = Route::Login;
        self.view()
    }
}
