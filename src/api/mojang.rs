use reqwest::StatusCode;
use tracing::{debug, instrument};

use crate::api;
use crate::error::{ApiError, Result, Service};
use crate::model::Profile;

const MAX_USERNAME_LEN: usize = 16;

/// Whether `username` could be a Minecraft account name at all.
pub(crate) fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.len() <= MAX_USERNAME_LEN
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Look up the UUID for `username`. `Ok(None)` means no such player.
#[instrument(skip(client, base_url))]
pub(crate) async fn resolve_identifier(
    client: &reqwest::Client,
    base_url: &str,
    username: &str,
) -> Result<Option<String>> {
    if !is_valid_username(username) {
        debug!("username cannot exist, skipping lookup");
        return Ok(None);
    }

    let url = format!("{base_url}/users/profiles/minecraft/{username}");
    let (status, body) = api::get_text(client, Service::Mojang, &url).await?;

    match status {
        StatusCode::OK => {
            let profile: Profile = api::decode(Service::Mojang, &body, "profile")?;
            debug!(uuid = %profile.id, "resolved identifier");
            Ok(Some(profile.id))
        }
        StatusCode::NOT_FOUND => Ok(None),
        other => Err(ApiError::upstream(
            Service::Mojang,
            format!("HTTP {}", other.as_u16()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub::{self, serve, Route};

    #[test]
    fn test_is_valid_username() {
        assert!(is_valid_username("Notch"));
        assert!(is_valid_username("some_player_123"));
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username("../../etc"));
        assert!(!is_valid_username("a_name_that_is_too_long"));
    }

    #[tokio::test]
    async fn test_resolve_found() {
        let base = serve(vec![Route::new(
            "/users/profiles/minecraft/Notch",
            200,
            r#"{"id":"069a79f444e94726a5befca90e38aaf5","name":"Notch"}"#,
        )])
        .await;

        let client = stub::client();
        let id = resolve_identifier(&client, &base, "Notch").await.unwrap();
        assert_eq!(id.as_deref(), Some("069a79f444e94726a5befca90e38aaf5"));
    }

    #[tokio::test]
    async fn test_resolve_not_found_is_none() {
        let base = serve(vec![Route::new("/users/profiles/minecraft/", 404, "")]).await;

        let client = stub::client();
        let id = resolve_identifier(&client, &base, "nobody").await.unwrap();
        assert!(id.is_none());
    }

    #[tokio::test]
    async fn test_resolve_other_status_is_upstream_error() {
        let base = serve(vec![Route::new("/users/profiles/minecraft/", 429, "{}")]).await;

        let client = stub::client();
        let err = resolve_identifier(&client, &base, "Notch").await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Upstream {
                service: Service::Mojang,
                ..
            }
        ));
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn test_resolve_malformed_body_is_parse_error() {
        let base = serve(vec![Route::new("/users/profiles/minecraft/", 200, "not json")]).await;

        let client = stub::client();
        let err = resolve_identifier(&client, &base, "Notch").await.unwrap_err();
        assert!(matches!(err, ApiError::Parse { .. }));
    }
}
