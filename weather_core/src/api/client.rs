use super::error::{self, Error, MessageResp};
use super::{login, signup};
use serde::de::DeserializeOwned;
use url::Url;

/// Client for the account API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    /// The server to connect to. Should only be the protocol and domain, e.g.
    /// `http://localhost:3000`.
    pub server: String,
}

impl Client {
    /// Construct a new client
    pub fn new(server: String) -> Self {
        Self { server }
    }

    /// Create an account on the server.
    ///
    /// ## Errors
    ///
    /// Errors are the same as `handle_response`.
    pub async fn signup(
        &self,
        client: &reqwest::Client,
        req: &signup::Req,
    ) -> error::Result<signup::Resp> {
        let url = Url::parse(&self.server)?.join(signup::PATH)?;

        Self::handle_response(client.post(url).json(req)).await
    }

    /// Log into the server.
    ///
    /// ## Errors
    ///
    /// Errors are the same as `handle_response`.
    pub async fn login(
        &self,
        client: &reqwest::Client,
        req: &login::Req,
    ) -> error::Result<login::Resp> {
        let url = Url::parse(&self.server)?.join(login::PATH)?;

        Self::handle_response(client.post(url).json(req)).await
    }

    /// Convert an HTTP response into a result, interpreting errors in a
    /// standard way.
    ///
    /// ## Errors
    ///
    /// - `Ok(..)` if the server returned a success (2xx)
    /// - `Error::Rejected` if the server returned any other status along with
    ///   a `{message}` body
    /// - `Error::Unexpected` if there was no readable message
    /// - `Error::Http` if the request never completed
    async fn handle_response<T>(resp: reqwest::RequestBuilder) -> error::Result<T>
    where
        T: DeserializeOwned,
    {
        let resp = resp.send().await?;

        let status = resp.status();

        if status.is_success() {
            Ok(resp.json().await?)
        } else {
            match resp.json::<MessageResp>().await {
                Ok(body) => Err(Error::Rejected {
                    status,
                    message: body.message,
                }),
                Err(_) => Err(Error::Unexpected(status)),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use httpmock::prelude::*;
    use reqwest::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_signup_success() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(signup::PATH)
                    .json_body(json!({"email": "a@b.com", "password": "pw1"}));
                then.status(201)
                    .json_body(json!({"message": "User created successfully! Please log in."}));
            })
            .await;

        let resp = Client::new(server.base_url())
            .signup(&reqwest::Client::new(), &signup::Req::new("a@b.com", "pw1"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(resp.message, "User created successfully! Please log in.");
    }

    #[tokio::test]
    async fn test_login_success_echoes_email() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(login::PATH);
                then.status(200).json_body(json!({
                    "message": "Login successful!",
                    "user": {"email": "a@b.com"},
                }));
            })
            .await;

        let resp = Client::new(server.base_url())
            .login(&reqwest::Client::new(), &login::Req::new("A@B.com", "pw1"))
            .await
            .unwrap();

        assert_eq!(resp.user.email, "a@b.com");
    }

    #[tokio::test]
    async fn test_rejection_surfaces_server_message_verbatim() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(login::PATH);
                then.status(400)
                    .json_body(json!({"message": "Invalid email or password."}));
            })
            .await;

        let err = Client::new(server.base_url())
            .login(&reqwest::Client::new(), &login::Req::new("a@b.com", "nope"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid email or password.");
        assert!(matches!(
            err,
            Error::Rejected {
                status: StatusCode::BAD_REQUEST,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_server_error_message_is_kept() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(signup::PATH);
                then.status(500)
                    .json_body(json!({"message": "Server error during signup."}));
            })
            .await;

        let err = Client::new(server.base_url())
            .signup(&reqwest::Client::new(), &signup::Req::new("a@b.com", "pw1"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Server error during signup.");
    }

    #[tokio::test]
    async fn test_unreadable_failure_is_unexpected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(signup::PATH);
                then.status(502).body("bad gateway");
            })
            .await;

        let err = Client::new(server.base_url())
            .signup(&reqwest::Client::new(), &signup::Req::new("a@b.com", "pw1"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Unexpected(StatusCode::BAD_GATEWAY)));
    }

    #[tokio::test]
    async fn test_bad_server_url() {
        let err = Client::new("not a url".to_string())
            .signup(&reqwest::Client::new(), &signup::Req::new("a@b.com", "pw1"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::UrlParse(_)));
    }
}
