//! HTTP client to talk to the public APIs.

use eyre::{Result, WrapErr};
use serde::de::DeserializeOwned;
use std::io::Read;
use url::Url;

/// Identify ourselves to the APIs.
const USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// A simple blocking HTTP client.
///
/// One request, one response: no retry, no timeout, failures surface
/// directly to the caller.
pub struct Client {
    /// HTTP agent.
    agent: ureq::Agent,
}

impl Client {
    /// Initializes a new client.
    pub fn new() -> Self {
        Self {
            agent: ureq::builder().user_agent(USER_AGENT).build(),
        }
    }

    /// Calls `url` and parses the JSON response.
    pub fn get_json<T>(&self, url: &Url) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .agent
            .request_url("GET", url)
            .set("accept", "application/json")
            .call()
            .context("HTTP request failed")?;

        serde_json::from_reader(response.into_reader()).context("read JSON")
    }

    /// Downloads the image at `url` into the given buffer.
    pub fn get_image(&self, url: &Url, buf: &mut Vec<u8>) -> Result<()> {
        let response = self
            .agent
            .request_url("GET", url)
            .set("accept", "image/*")
            .call()
            .context("HTTP request failed")?;

        response
            .into_reader()
            .read_to_end(buf)
            .context("read image")?;

        Ok(())
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}
