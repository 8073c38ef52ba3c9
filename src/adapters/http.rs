use crate::domain::model::{ArticleQuery, ArticleSummary, Category, Menu, Page, Post};
use crate::domain::ports::{ConfigProvider, ContentProvider};
use crate::utils::error::{CmsError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// 列表端點可能回傳陣列，也可能是分頁物件 `{ "results": [...] }`
#[derive(Deserialize)]
#[serde(untagged)]
enum ListResponse<T> {
    Plain(Vec<T>),
    Paginated { results: Vec<T> },
}

impl<T> ListResponse<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            ListResponse::Plain(items) => items,
            ListResponse::Paginated { results } => results,
        }
    }
}

/// 透過 CMS 公開 REST API 取得內容的 [`ContentProvider`]
pub struct HttpContentProvider {
    client: Client,
    base_url: Url,
    token: Option<String>,
    headers: HashMap<String, String>,
    timeout: Option<Duration>,
}

impl HttpContentProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| CmsError::InvalidConfigValueError {
            field: "api.base_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(CmsError::InvalidConfigValueError {
                field: "api.base_url".to_string(),
                value: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(Self {
            client: Client::new(),
            base_url,
            token: None,
            headers: HashMap::new(),
            timeout: None,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Ok(Self::new(config.api_base_url())?
            .with_timeout(Duration::from_secs(config.request_timeout_seconds())))
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// 每個 segment 會各自做 percent-encoding
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            for segment in segments {
                path.extend(segment.split('/').filter(|part| !part.is_empty()));
            }
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        entity: &'static str,
        key: &str,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T> {
        let mut request = self.client.get(url.clone());

        // 添加自定義標頭
        for (name, value) in &self.headers {
            request = request.header(name, value);
        }

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        if !query.is_empty() {
            request = request.query(query);
        }

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        tracing::debug!("📡 GET {}", url);
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("📡 {} -> {}", url, status);

        if status == StatusCode::NOT_FOUND {
            return Err(CmsError::not_found(entity, key));
        }

        if !status.is_success() {
            tracing::error!("❌ CMS API request failed with status {} for {}", status, url);
            return Err(CmsError::Upstream {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl ContentProvider for HttpContentProvider {
    async fn fetch_page(&self, slug: &str) -> Result<Page> {
        let url = self.endpoint(&["pages", "public", slug]);
        self.get_json("Page", slug, url, &[]).await
    }

    async fn fetch_post(&self, slug: &str) -> Result<Post> {
        let url = self.endpoint(&["posts", "public", slug]);
        self.get_json("Post", slug, url, &[]).await
    }

    async fn fetch_menu(&self, location: &str) -> Result<Menu> {
        let url = self.endpoint(&["menus", "location", location]);
        // 找不到時部分後端回傳 200 + null
        let menu: Option<Menu> = self.get_json("Menu", location, url, &[]).await?;
        menu.ok_or_else(|| CmsError::not_found("Menu", location))
    }

    async fn fetch_category(&self, slug: &str) -> Result<Category> {
        let url = self.endpoint(&["categories", "slug", slug]);
        self.get_json("Category", slug, url, &[]).await
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>> {
        let url = self.endpoint(&["categories"]);
        let list: ListResponse<Category> = self.get_json("Category", "*", url, &[]).await?;
        Ok(list.into_vec())
    }

    async fn fetch_articles(&self, query: &ArticleQuery) -> Result<Vec<ArticleSummary>> {
        let url = self.endpoint(&["posts", "public"]);

        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(category) = &query.category {
            params.push(("category", category.clone()));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(lang) = &query.lang {
            params.push(("lang", lang.clone()));
        }

        let list: ListResponse<ArticleSummary> =
            self.get_json("Article", "*", url, &params).await?;
        let mut articles = list.into_vec();
        if let Some(limit) = query.limit {
            articles.truncate(limit);
        }
        Ok(articles)
    }
}
