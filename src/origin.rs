use bytes::Bytes;
use std::time::Duration;

use crate::error::FetchError;

// Origin fetcher - one GET per cache miss, no retry
#[derive(Clone)]
pub struct OriginClient {
    client: reqwest::Client,
}

impl OriginClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    // anything other than `200 OK` is an error, including other 2xx codes
    pub async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        let res = self.client.get(url).send().await?;

        if res.status() != reqwest::StatusCode::OK {
            return Err(FetchError::Status(res.status()));
        }

        Ok(res.bytes().await?)
    }
}
