//! Just enough HTTP Digest authentication to talk to an Envoy.
//!
//! Only `qop=auth` is supported, one challenge per request, and the nonce count is always `1`.

use http::{
    StatusCode,
    header::{ACCEPT, AUTHORIZATION, WWW_AUTHENTICATE},
};
use reqwest::Url;

use crate::prelude::*;

#[must_use]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DigestChallenge {
    pub nonce: Option<String>,
    pub realm: Option<String>,
    pub qop: Option<String>,
}

impl DigestChallenge {
    /// Parse the `WWW-Authenticate` header value.
    ///
    /// Each comma-separated fragment that mentions a key anywhere in its text assigns the first
    /// quoted string of that fragment to the key. Later fragments overwrite earlier ones.
    pub fn parse(header: Option<&str>) -> Self {
        let mut challenge = Self::default();
        let Some(header) = header else {
            return challenge;
        };
        for fragment in header.split(',') {
            let Some(value) = fragment.split('"').nth(1) else {
                continue;
            };
            for (key, slot) in [
                ("nonce", &mut challenge.nonce),
                ("realm", &mut challenge.realm),
                ("qop", &mut challenge.qop),
            ] {
                if fragment.contains(key) {
                    *slot = Some(value.to_string());
                }
            }
        }
        challenge
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Build the `Authorization` header value answering the challenge.
    pub fn authorization(
        &self,
        challenge: &DigestChallenge,
        method: &str,
        uri: &str,
        cnonce: &str,
    ) -> Result<String> {
        const NONCE_COUNT: u32 = 1;

        let nonce = challenge.nonce.as_deref().context("the challenge is missing `nonce`")?;
        let realm = challenge.realm.as_deref().context("the challenge is missing `realm`")?;
        let qop = challenge.qop.as_deref().context("the challenge is missing `qop`")?;
        let username = &self.username;

        let ha1 = md5_hex(&format!("{username}:{realm}:{0}", self.password));
        let ha2 = md5_hex(&format!("{method}:{uri}"));
        let response = md5_hex(&format!("{ha1}:{nonce}:{NONCE_COUNT}:{cnonce}:{qop}:{ha2}"));

        Ok(format!(
            r#"Digest username="{username}", realm="{realm}", nonce="{nonce}", uri="{uri}", cnonce="{cnonce}", nc="{NONCE_COUNT}", qop="{qop}", response="{response}""#,
        ))
    }
}

fn md5_hex(text: &str) -> String {
    format!("{:x}", md5::compute(text))
}

/// 8 random bytes, hex-encoded.
#[must_use]
pub fn generate_cnonce() -> String {
    let mut cnonce = hex::encode(rand::random::<[u8; 8]>());
    cnonce.truncate(16);
    cnonce
}

/// Status and body of the final response.
#[must_use]
pub struct Response {
    pub status: StatusCode,
    pub body: String,
}

impl Response {
    async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let body = response.text().await.context("failed to read the response body")?;
        Ok(Self { status, body })
    }
}

pub struct Client {
    inner: reqwest::Client,
    credentials: Credentials,
}

impl Client {
    pub const fn new(inner: reqwest::Client, credentials: Credentials) -> Self {
        Self { inner, credentials }
    }

    /// Send a `GET` request, answering the Digest challenge if the server issues one.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn get(&self, url: Url) -> Result<Response> {
        let response = self
            .inner
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("failed to call `{url}`"))?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Response::read(response).await;
        }

        let challenge = DigestChallenge::parse(
            response.headers().get(WWW_AUTHENTICATE).and_then(|value| value.to_str().ok()),
        );
        debug!(?challenge, "challenged");
        let authorization = self
            .credentials
            .authorization(&challenge, "GET", &request_target(&url), &generate_cnonce())
            .with_context(|| format!("`{url}` sent an unusable challenge"))?;

        let response = self
            .inner
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, authorization)
            .send()
            .await
            .with_context(|| format!("failed to call `{url}` with authorization"))?;
        Response::read(response).await
    }
}

/// Path and query, as they appear in the request line.
fn request_target(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    }
}
