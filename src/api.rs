use anyhow::{anyhow, Result};
use reqwest::{Client, Url};

use crate::post::{NewPostDraft, PostDetail, PostSummary};

/// Client for the upstream posts API.
///
/// There is one error bucket: a connection failure, a non-OK status and an
/// undecodable body are all "request failed". Callers turn the error into a
/// user-visible message and never retry.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<ApiClient> {
        let base = Url::parse(base_url)
            .and_then(|url| url.join("/"))
            .map_err(|e| anyhow!("Invalid API base URL {}: {}", base_url, e))?;

        Ok(ApiClient {
            client: Client::new(),
            base,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base.join(path)
            .map_err(|e| anyhow!("Invalid request path {}: {}", path, e))
    }

    pub async fn fetch_posts(&self) -> Result<Vec<PostSummary>> {
        let response = self.client.get(self.url("posts")?).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("Request failed with status {}", response.status()));
        }

        Ok(response.json::<Vec<PostSummary>>().await?)
    }

    pub async fn fetch_post(&self, post_id: u64) -> Result<PostDetail> {
        let response = self.client.get(self.url(&format!("posts/{}", post_id))?).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("Request failed with status {}", response.status()));
        }

        Ok(response.json::<PostDetail>().await?)
    }

    pub async fn create_post(&self, draft: &NewPostDraft) -> Result<PostSummary> {
        let response = self.client.post(self.url("posts")?)
            .json(draft)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(anyhow!("Request failed with status {}", response.status()));
        }

        Ok(response.json::<PostSummary>().await?)
    }
}
