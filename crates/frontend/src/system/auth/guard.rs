//! Route guard of the admin console.
//!
//! The guard is a pure transition: `resolve(session, requested)` returns the
//! route that is actually entered. Admin routes need a session; without one
//! the console goes to `Login` and remembers where the operator wanted to go.

use serde::{Deserialize, Serialize};

pub const LOGIN_PATH: &str = "/login";
pub const PRODUCTS_PATH: &str = "/admin/products";
pub const SALES_PATH: &str = "/admin/sales";

/// Where the console goes after login when no redirect was requested
pub const DEFAULT_REDIRECT: &str = PRODUCTS_PATH;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRoute {
    Login { redirect: String },
    Products,
    Sales,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    Anonymous,
    Authenticated,
    /// `ADMIN_AUTH_MOCK`: admin routes are open, the login screen still works
    Bypass,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LoginQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    redirect: Option<String>,
}

impl AppRoute {
    pub fn login_default() -> Self {
        AppRoute::Login {
            redirect: DEFAULT_REDIRECT.to_string(),
        }
    }

    /// Route for a browser location (`pathname`, `search`)
    pub fn from_location(path: &str, search: &str) -> Self {
        let path = path.trim_end_matches('/');
        if path == LOGIN_PATH || path == "/public/login" {
            let query: LoginQuery =
                serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default();
            return AppRoute::Login {
                redirect: sanitize_redirect(query.redirect.as_deref()),
            };
        }
        if path.starts_with(SALES_PATH) {
            return AppRoute::Sales;
        }
        AppRoute::Products
    }

    /// Path with query, as pushed to the history
    pub fn href(&self) -> String {
        match self {
            AppRoute::Login { redirect } if redirect == DEFAULT_REDIRECT => LOGIN_PATH.to_string(),
            AppRoute::Login { redirect } => {
                let query = LoginQuery {
                    redirect: Some(redirect.clone()),
                };
                match serde_qs::to_string(&query) {
                    Ok(qs) => format!("{}?{}", LOGIN_PATH, qs),
                    Err(_) => LOGIN_PATH.to_string(),
                }
            }
            AppRoute::Products => PRODUCTS_PATH.to_string(),
            AppRoute::Sales => SALES_PATH.to_string(),
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, AppRoute::Login { .. })
    }
}

/// Only admin paths are accepted as a login redirect target
pub fn sanitize_redirect(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(target) if target.starts_with("/admin") && !target.starts_with("//") => {
            target.to_string()
        }
        _ => DEFAULT_REDIRECT.to_string(),
    }
}

/// The route that is entered when `requested` is asked for in `session`
pub fn resolve(session: Session, requested: AppRoute) -> AppRoute {
    match (session, requested) {
        (Session::Authenticated, AppRoute::Login { redirect }) => after_login(&redirect),
        (Session::Anonymous, route) if route.is_protected() => AppRoute::Login {
            redirect: route.href(),
        },
        (_, route) => route,
    }
}

/// Target once the operator has signed in
pub fn after_login(redirect: &str) -> AppRoute {
    match AppRoute::from_location(&sanitize_redirect(Some(redirect)), "") {
        AppRoute::Login { .. } => AppRoute::Products,
        route => route,
    }
}

pub fn after_logout() -> AppRoute {
    AppRoute::login_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_location() {
        assert_eq!(AppRoute::from_location("/admin/sales", ""), AppRoute::Sales);
        assert_eq!(AppRoute::from_location("/admin/products/", ""), AppRoute::Products);
        assert_eq!(AppRoute::from_location("/", ""), AppRoute::Products);
        assert_eq!(
            AppRoute::from_location("/login", "?redirect=%2Fadmin%2Fsales"),
            AppRoute::Login {
                redirect: "/admin/sales".into()
            }
        );
        assert_eq!(AppRoute::from_location("/login", ""), AppRoute::login_default());
    }

    #[test]
    fn test_foreign_redirect_is_replaced() {
        assert_eq!(sanitize_redirect(Some("https://evil.example")), DEFAULT_REDIRECT);
        assert_eq!(sanitize_redirect(Some("//evil.example/admin")), DEFAULT_REDIRECT);
        assert_eq!(sanitize_redirect(None), DEFAULT_REDIRECT);
        assert_eq!(sanitize_redirect(Some("/admin/sales")), "/admin/sales");
    }

    #[test]
    fn test_anonymous_is_sent_to_login_with_redirect() {
        let route = resolve(Session::Anonymous, AppRoute::Sales);
        assert_eq!(
            route,
            AppRoute::Login {
                redirect: SALES_PATH.into()
            }
        );
        assert_eq!(route.href(), "/login?redirect=%2Fadmin%2Fsales");
        // and back again
        let AppRoute::Login { redirect } = route else {
            unreachable!()
        };
        assert_eq!(after_login(&redirect), AppRoute::Sales);
    }

    #[test]
    fn test_anonymous_may_stay_on_login() {
        let login = AppRoute::login_default();
        assert_eq!(resolve(Session::Anonymous, login.clone()), login);
        assert_eq!(login.href(), "/login");
    }

    #[test]
    fn test_authenticated_passes_through() {
        assert_eq!(resolve(Session::Authenticated, AppRoute::Products), AppRoute::Products);
        assert_eq!(resolve(Session::Authenticated, AppRoute::Sales), AppRoute::Sales);
        assert_eq!(
            resolve(
                Session::Authenticated,
                AppRoute::Login {
                    redirect: SALES_PATH.into()
                }
            ),
            AppRoute::Sales
        );
    }

    #[test]
    fn test_bypass_opens_admin_routes() {
        assert_eq!(resolve(Session::Bypass, AppRoute::Sales), AppRoute::Sales);
        assert_eq!(
            resolve(Session::Bypass, AppRoute::login_default()),
            AppRoute::login_default()
        );
    }

    #[test]
    fn test_logout_goes_to_login() {
        let route = after_logout();
        assert!(!route.is_protected());
        assert_eq!(resolve(Session::Anonymous, route.clone()), route);
        assert_eq!(after_login(DEFAULT_REDIRECT), AppRoute::Products);
    }
}
