use std::time::Duration;

use log::debug;
use reqwest::blocking::{Client, Response};
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::{ApiError, MailApi};
use crate::domain::email::{Email, EmailId, EmailPatch, Mailbox, OutgoingEmail};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Shape of the server's error bodies, e.g. `{"error": "Email not found."}`.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// `MailApi` over HTTP with a blocking reqwest client.
pub struct HttpMailApi {
    client: Client,
    base: Url,
}

impl HttpMailApi {
    pub fn new(
        base_url: &str,
        session_cookie: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let mut base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidConfig(format!(
                "base_url '{base_url}' is not an http(s) URL"
            )));
        }
        // Url::join drops the last segment unless the base ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        if let Some(cookie) = session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| ApiError::InvalidConfig(format!("session_cookie: {e}")))?;
            headers.insert(COOKIE, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path)?)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path)?;
        debug!("GET {url}");
        let resp = self.client.get(url).send()?;
        let text = ensure_success(resp)?.text()?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn ensure_success(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request rejected")
            .to_string(),
    };
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

impl MailApi for HttpMailApi {
    fn list_mailbox(&self, mailbox: Mailbox) -> Result<Vec<Email>, ApiError> {
        self.get_json(&format!("emails/{}", mailbox.as_str()))
    }

    fn get_email(&self, id: EmailId) -> Result<Email, ApiError> {
        self.get_json(&format!("emails/{id}"))
    }

    fn update_email(&self, id: EmailId, patch: EmailPatch) -> Result<(), ApiError> {
        let url = self.url(&format!("emails/{id}"))?;
        debug!("PUT {url}");
        let resp = self.client.put(url).json(&patch).send()?;
        ensure_success(resp)?;
        Ok(())
    }

    fn send_email(&self, email: &OutgoingEmail) -> Result<(), ApiError> {
        let url = self.url("emails")?;
        debug!("POST {url}");
        let resp = self.client.post(url).json(email).send()?;
        ensure_success(resp)?;
        Ok(())
    }
}
