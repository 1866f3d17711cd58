//! One-shot notices carried across a redirect in a short-lived cookie.

use axum_extra::extract::CookieJar;
use cookie::{Cookie, SameSite};

const FLASH_COOKIE: &str = "flash";

pub fn set(jar: CookieJar, message: impl AsRef<str>) -> CookieJar {
    let cookie = Cookie::build((FLASH_COOKIE, urlencoding::encode(message.as_ref()).into_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(1));
    jar.add(cookie)
}

/// Reads the pending notice, if any, and clears it.
pub fn take(jar: CookieJar) -> (CookieJar, Option<String>) {
    let Some(message) = jar.get(FLASH_COOKIE).map(|c| c.value().to_string()) else {
        return (jar, None);
    };
    let message = urlencoding::decode(&message).map(|m| m.into_owned()).ok();
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, message.filter(|m| !m.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_take_round_trips_and_clears() {
        let jar = set(CookieJar::new(), "Removed \"Heat\"; sorry!");

        let (jar, message) = take(jar);

        assert_eq!(message.as_deref(), Some("Removed \"Heat\"; sorry!"));
        assert!(jar.get(FLASH_COOKIE).is_none());
    }

    #[test]
    fn take_without_cookie_is_none() {
        let (_, message) = take(CookieJar::new());
        assert!(message.is_none());
    }
}
