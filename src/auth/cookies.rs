/// Auth cookie construction.
///
/// Both cookies are httpOnly and SameSite=Strict; `secure` follows the
/// deployment environment. The refresh cookie is scoped to the refresh
/// endpoint so it never rides along on ordinary API calls. Clearing re-sets
/// the same cookie with an empty value and zero max-age.

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};

use crate::configuration::{ApplicationSettings, AuthSettings};
use crate::error::AppError;

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";
pub const REFRESH_COOKIE_PATH: &str = "/api/auth/refresh";

pub fn access_cookie(
    app: &ApplicationSettings,
    auth: &AuthSettings,
    token: &str,
) -> Result<Cookie<'static>, AppError> {
    let max_age = CookieDuration::milliseconds(auth.access_ttl()?.num_milliseconds());

    Ok(Cookie::build(ACCESS_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .secure(app.environment.is_production())
        .same_site(SameSite::Strict)
        .max_age(max_age)
        .finish())
}

pub fn refresh_cookie(
    app: &ApplicationSettings,
    auth: &AuthSettings,
    token: &str,
) -> Result<Cookie<'static>, AppError> {
    let max_age = CookieDuration::milliseconds(auth.refresh_ttl()?.num_milliseconds());

    Ok(Cookie::build(REFRESH_COOKIE, token.to_string())
        .path(REFRESH_COOKIE_PATH)
        .http_only(true)
        .secure(app.environment.is_production())
        .same_site(SameSite::Strict)
        .max_age(max_age)
        .finish())
}

pub fn clear_access_cookie(app: &ApplicationSettings) -> Cookie<'static> {
    Cookie::build(ACCESS_COOKIE, "")
        .path("/")
        .http_only(true)
        .secure(app.environment.is_production())
        .same_site(SameSite::Strict)
        .max_age(CookieDuration::seconds(0))
        .finish()
}

pub fn clear_refresh_cookie(app: &ApplicationSettings) -> Cookie<'static> {
    Cookie::build(REFRESH_COOKIE, "")
        .path(REFRESH_COOKIE_PATH)
        .http_only(true)
        .secure(app.environment.is_production())
        .same_site(SameSite::Strict)
        .max_age(CookieDuration::seconds(0))
        .finish()
}
