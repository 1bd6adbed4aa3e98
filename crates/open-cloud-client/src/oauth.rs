//! Token endpoint calls: refresh and authorization code exchange
//!
//! Both POST a form body to `{oauth_base}/v1/token` through the dispatcher,
//! without credential headers, and share one outcome mapping:
//! - undecodable body → `WebRequest`
//! - `error == "invalid_grant"` → `InvalidOAuthGrant`
//! - any other `error` → `RefreshTokens` (refresh) / `GenericRequest` (exchange)
//!
//! Single attempt each. Callers that hit a transient failure retry the outer
//! operation themselves.

use open_cloud_auth::{
    CodeExchange, OAuthTokenData, TokenErrorKind, TokenResponse, exchange_form, now_millis,
    refresh_form,
};
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{info, instrument, warn};

use crate::credential::OAuthToken;
use crate::dispatch::{Body, Dispatcher, ResponseBody};
use crate::error::{Error, Result};
use crate::response::{ApiError, ClientRequestResponse, normalize};

/// Exchange the refresh token in `data` for a new token record.
///
/// The returned record keeps `client_id`/`client_secret`, keeps the previous
/// scope when the response omits it, and is stamped with `issued_at = now()`.
/// `data` itself is never modified.
#[instrument(skip_all, fields(client_id = %data.client_id))]
pub async fn refresh_tokens(
    dispatcher: &Dispatcher,
    data: &OAuthTokenData,
    now: impl FnOnce() -> u64,
) -> Result<OAuthTokenData> {
    match post_token_form(dispatcher, refresh_form(data)).await {
        Ok(ClientRequestResponse::Success(tokens)) => {
            let refreshed = data.refreshed(tokens, now());
            info!(expires_in = refreshed.expires_in, "oauth tokens refreshed");
            Ok(refreshed)
        }
        Ok(ClientRequestResponse::Failure(err)) => {
            warn!(error = %err.error, "token endpoint rejected refresh");
            Err(match TokenErrorKind::classify(&err.error) {
                TokenErrorKind::InvalidGrant => Error::InvalidOAuthGrant {
                    error_description: err.error_description,
                },
                TokenErrorKind::Other => Error::RefreshTokens {
                    error: err.error,
                    error_description: err.error_description,
                },
            })
        }
        Err(e) => {
            warn!(error = %e, "token refresh request failed");
            Err(e)
        }
    }
}

/// Exchange an authorization code for tokens.
#[instrument(skip_all, fields(client_id = %exchange.client_id))]
pub async fn exchange_code_for_tokens(
    dispatcher: &Dispatcher,
    exchange: &CodeExchange,
) -> Result<TokenResponse> {
    match post_token_form(dispatcher, exchange_form(exchange)).await? {
        ClientRequestResponse::Success(tokens) => {
            let scope = tokens.scope.as_deref().unwrap_or_default();
            info!(scope, "authorization code exchanged");
            Ok(tokens)
        }
        ClientRequestResponse::Failure(err) => {
            warn!(error = %err.error, "token endpoint rejected authorization code");
            Err(exchange_error(err))
        }
    }
}

/// Exchange an authorization code and wrap the result as a credential.
pub async fn exchange_code(dispatcher: &Dispatcher, exchange: &CodeExchange) -> Result<OAuthToken> {
    let tokens = exchange_code_for_tokens(dispatcher, exchange).await?;
    let data = OAuthTokenData::from_response(
        tokens,
        exchange.client_id.clone(),
        exchange.client_secret.clone(),
        now_millis(),
    );
    Ok(OAuthToken::new(data))
}

fn exchange_error(err: ApiError) -> Error {
    match TokenErrorKind::classify(&err.error) {
        TokenErrorKind::InvalidGrant => Error::InvalidOAuthGrant {
            error_description: err.error_description,
        },
        TokenErrorKind::Other => Error::GenericRequest {
            error: err.error,
            error_description: err.error_description,
        },
    }
}

async fn post_token_form(
    dispatcher: &Dispatcher,
    form: String,
) -> Result<ClientRequestResponse<TokenResponse>> {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/x-www-form-urlencoded"),
    );

    let body = dispatcher
        .send(
            &dispatcher.token_url(),
            Method::POST,
            Some(Body::Raw(form)),
            Some(&headers),
            None,
        )
        .await?;

    match body {
        ResponseBody::Json(value) => normalize(value).decode(),
        ResponseBody::Text(text) => Err(Error::web_request(
            "token endpoint returned a non-JSON body",
            format!("{} bytes of text", text.len()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ApiConfig;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn dispatcher(server: &MockServer) -> Dispatcher {
        Dispatcher::new(&ApiConfig {
            base_url: format!("{}/cloud", server.uri()),
            oauth_base_url: format!("{}/oauth", server.uri()),
            ..ApiConfig::default()
        })
        .unwrap()
    }

    fn token_data() -> OAuthTokenData {
        OAuthTokenData {
            access_token: "at_old".into(),
            refresh_token: "rt_old".into(),
            token_type: "Bearer".into(),
            scope: "openid".into(),
            expires_in: 900,
            client_id: "3387".into(),
            client_secret: "RBX-secret".into(),
            issued_at: 0,
        }
    }

    fn exchange(verifier: Option<&str>) -> CodeExchange {
        CodeExchange {
            client_id: "3387".into(),
            client_secret: "RBX-secret".into(),
            code: "auth-code".into(),
            code_verifier: verifier.map(str::to_string),
        }
    }

    async fn mount_token(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/oauth/v1/token"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .respond_with(template)
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn refresh_success_stamps_issued_at() {
        let server = MockServer::start().await;
        mount_token(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "at_new",
                "refresh_token": "rt_new",
                "token_type": "Bearer",
                "scope": "openid profile",
                "expires_in": 900
            })),
        )
        .await;

        let data = refresh_tokens(&dispatcher(&server), &token_data(), || 42)
            .await
            .unwrap();
        assert_eq!(data.access_token.expose(), "at_new");
        assert_eq!(data.scope, "openid profile");
        assert_eq!(data.issued_at, 42);
        assert_eq!(data.client_id, "3387");
    }

    #[tokio::test]
    async fn refresh_without_scope_keeps_granted_scope() {
        let server = MockServer::start().await;
        mount_token(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "at_new",
                "refresh_token": "rt_new",
                "token_type": "Bearer",
                "expires_in": 900
            })),
        )
        .await;

        let mut previous = token_data();
        previous.scope = "openid user.inventory-item:read".into();

        let data = refresh_tokens(&dispatcher(&server), &previous, || 7)
            .await
            .unwrap();
        assert_eq!(data.access_token.expose(), "at_new");
        assert_eq!(data.scope, "openid user.inventory-item:read");
        assert!(data.has_scope("user.inventory-item:read"));
    }

    #[tokio::test]
    async fn refresh_other_error_is_refresh_tokens_error() {
        let server = MockServer::start().await;
        mount_token(
            &server,
            ResponseTemplate::new(401).set_body_json(json!({
                "error": "invalid_client",
                "error_description": "bad secret"
            })),
        )
        .await;

        let err = refresh_tokens(&dispatcher(&server), &token_data(), || 0)
            .await
            .unwrap_err();
        match err {
            Error::RefreshTokens {
                error,
                error_description,
            } => {
                assert_eq!(error, "invalid_client");
                assert_eq!(error_description, "bad secret");
            }
            other => panic!("expected RefreshTokens, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn refresh_unexpected_shape_is_web_request_error() {
        let server = MockServer::start().await;
        mount_token(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"access_token": "only"})),
        )
        .await;

        let err = refresh_tokens(&dispatcher(&server), &token_data(), || 0)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::WebRequest { .. }), "got: {err:?}");
    }

    #[tokio::test]
    async fn refresh_text_body_is_web_request_error() {
        let server = MockServer::start().await;
        mount_token(
            &server,
            ResponseTemplate::new(502).set_body_string("Bad Gateway"),
        )
        .await;

        let err = refresh_tokens(&dispatcher(&server), &token_data(), || 0)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::WebRequest { .. }), "got: {err:?}");
    }

    #[tokio::test]
    async fn exchange_sends_code_and_verifier() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/v1/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=auth-code"))
            .and(body_string_contains("code_verifier=verifier-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "at_1",
                "refresh_token": "rt_1",
                "token_type": "Bearer",
                "scope": "openid user.inventory-item:read",
                "expires_in": 900
            })))
            .expect(1)
            .mount(&server)
            .await;

        let before = now_millis();
        let token = exchange_code(&dispatcher(&server), &exchange(Some("verifier-1")))
            .await
            .unwrap();
        let data = token.snapshot().await;

        assert_eq!(data.access_token.expose(), "at_1");
        assert_eq!(data.client_secret.expose(), "RBX-secret");
        assert!(data.issued_at >= before && data.issued_at <= now_millis());
        assert!(token.has_scope("user.inventory-item:read").await);
    }

    #[tokio::test]
    async fn exchange_invalid_grant() {
        let server = MockServer::start().await;
        mount_token(
            &server,
            ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "code already used"
            })),
        )
        .await;

        let err = exchange_code_for_tokens(&dispatcher(&server), &exchange(None))
            .await
            .unwrap_err();
        assert!(err.requires_reauthorization(), "got: {err:?}");
    }

    #[tokio::test]
    async fn exchange_other_error_is_generic_request() {
        let server = MockServer::start().await;
        mount_token(
            &server,
            ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_request"})),
        )
        .await;

        let err = exchange_code_for_tokens(&dispatcher(&server), &exchange(None))
            .await
            .unwrap_err();
        assert!(
            matches!(&err, Error::GenericRequest { error, .. } if error == "invalid_request"),
            "got: {err:?}"
        );
    }
}
