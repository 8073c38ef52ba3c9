use crate::core::breadcrumbs::{self, Breadcrumb};
use crate::core::composer::{PageComposer, RenderedSection};
use crate::core::navigation::NavTree;
use crate::core::registry::SectionRegistry;
use crate::domain::model::{ArticleQuery, ArticleSummary, Category, Post};
use crate::domain::ports::{ConfigProvider, ContentProvider};
use crate::domain::section::Block;
use crate::utils::error::{CmsError, Result};
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const CATEGORY_ARTICLE_LIMIT: usize = 12;
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeoMeta {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Navigation {
    pub navbar: Option<NavTree>,
    pub footer: Option<NavTree>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPage {
    pub slug: String,
    pub title: String,
    pub seo: SeoMeta,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub navigation: Navigation,
    pub blocks: Vec<RenderedSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPost {
    pub post: Post,
    pub seo: SeoMeta,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub navigation: Navigation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedCategory {
    pub category: Category,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub articles: Vec<ArticleSummary>,
    pub navigation: Navigation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome<T> {
    Found(T),
    NotFound { slug: String },
}

impl<T> Outcome<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Outcome::Found(value) => Some(value),
            Outcome::NotFound { .. } => None,
        }
    }
}

pub type PageOutcome = Outcome<RenderedPage>;
pub type PostOutcome = Outcome<RenderedPost>;
pub type CategoryOutcome = Outcome<RenderedCategory>;

/// 以 [`ContentProvider`] 為基礎的請求層渲染
///
/// 每次呼叫的所有抓取共用同一個期限。找不到內容、傳輸失敗或逾時都回傳
/// [`Outcome::NotFound`]，但只看主要內容；選單與文章列表失敗時只會是空的。
pub struct SiteRenderer<P: ContentProvider> {
    provider: P,
    registry: &'static SectionRegistry,
    request_timeout: Duration,
    navbar_location: Option<String>,
    footer_location: Option<String>,
}

impl<P: ContentProvider> SiteRenderer<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            registry: SectionRegistry::global(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            navbar_location: None,
            footer_location: None,
        }
    }

    pub fn from_config<C: ConfigProvider>(provider: P, config: &C) -> Self {
        Self::new(provider)
            .with_timeout(Duration::from_secs(config.request_timeout_seconds()))
            .with_menus(
                Some(config.navbar_location().to_string()),
                config.footer_location().map(str::to_string),
            )
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_menus(mut self, navbar: Option<String>, footer: Option<String>) -> Self {
        self.navbar_location = navbar;
        self.footer_location = footer;
        self
    }

    pub fn with_registry(mut self, registry: &'static SectionRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn render_page(&self, slug: &str) -> PageOutcome {
        let slug = normalize_slug(slug);
        let deadline = self.deadline();
        tracing::debug!("📄 Rendering page '{}'", slug);

        let page = match self
            .within(deadline, self.provider.fetch_page(&slug))
            .await
        {
            Ok(page) => page,
            Err(e) => return self.not_found("page", slug, e),
        };

        let mut blocks = PageComposer::with_registry(self.registry)
            .compose(&page)
            .render();
        self.hydrate_article_lists(deadline, &mut blocks).await;
        let navigation = self.navigation(deadline).await;

        tracing::info!("✅ Rendered page '{}' ({} blocks)", slug, blocks.len());
        Outcome::Found(RenderedPage {
            seo: seo(&page.title, page.seo_title.as_deref(), page.seo_description.as_deref()),
            breadcrumbs: breadcrumbs::for_slug(&slug),
            slug,
            title: page.title,
            navigation,
            blocks,
        })
    }

    pub async fn render_post(&self, slug: &str) -> PostOutcome {
        let slug = normalize_slug(slug);
        let deadline = self.deadline();
        tracing::debug!("📰 Rendering post '{}'", slug);

        let post = match self.within(deadline, self.provider.fetch_post(&slug)).await {
            Ok(post) => post,
            Err(e) => return self.not_found("post", slug, e),
        };
        let navigation = self.navigation(deadline).await;

        Outcome::Found(RenderedPost {
            seo: seo(&post.title, None, post.excerpt.as_deref()),
            breadcrumbs: breadcrumbs::for_post(&post),
            post,
            navigation,
        })
    }

    pub async fn render_category(&self, slug: &str) -> CategoryOutcome {
        let slug = normalize_slug(slug);
        let deadline = self.deadline();
        tracing::debug!("🗂️ Rendering category '{}'", slug);

        let category = match self
            .within(deadline, self.provider.fetch_category(&slug))
            .await
        {
            Ok(category) => category,
            Err(e) => return self.not_found("category", slug, e),
        };

        let query = ArticleQuery {
            category: Some(category.slug.clone()),
            limit: Some(CATEGORY_ARTICLE_LIMIT),
            lang: category.language.clone(),
        };
        let articles = self.articles(deadline, &query).await;
        let navigation = self.navigation(deadline).await;

        Outcome::Found(RenderedCategory {
            breadcrumbs: breadcrumbs::for_category(&category),
            category,
            articles,
            navigation,
        })
    }

    /// 補上沒有預先提供文章的文章列表
    async fn hydrate_article_lists(&self, deadline: Instant, blocks: &mut [RenderedSection]) {
        for rendered in blocks.iter_mut() {
            let Block::ArticleList(list) = &mut rendered.block else {
                continue;
            };
            if !list.articles.is_empty() {
                continue;
            }

            let query = ArticleQuery {
                category: list.category.clone(),
                limit: Some(list.limit),
                lang: list.lang.clone(),
            };
            let mut articles = self.articles(deadline, &query).await;
            articles.truncate(list.limit);
            list.articles = articles;
        }
    }

    async fn articles(&self, deadline: Instant, query: &ArticleQuery) -> Vec<ArticleSummary> {
        match self
            .within(deadline, self.provider.fetch_articles(query))
            .await
        {
            Ok(articles) => articles,
            Err(e) => {
                tracing::warn!("⚠️ Could not load articles for {:?}: {}", query, e);
                Vec::new()
            }
        }
    }

    async fn navigation(&self, deadline: Instant) -> Navigation {
        let (navbar, footer) = tokio::join!(
            self.menu(deadline, self.navbar_location.as_deref()),
            self.menu(deadline, self.footer_location.as_deref()),
        );
        Navigation { navbar, footer }
    }

    async fn menu(&self, deadline: Instant, location: Option<&str>) -> Option<NavTree> {
        let location = location?;
        match self
            .within(deadline, self.provider.fetch_menu(location))
            .await
        {
            Ok(menu) => Some(NavTree::from_menu(&menu)),
            Err(e) => {
                tracing::warn!("⚠️ Menu '{}' unavailable: {}", location, e);
                None
            }
        }
    }

    /// 逾時設定過大時 `Instant` 會溢位，改用遠在未來的期限
    fn deadline(&self) -> Instant {
        let now = Instant::now();
        now.checked_add(self.request_timeout)
            .unwrap_or_else(|| now + FAR_FUTURE)
    }

    async fn within<T, F>(&self, deadline: Instant, fetch: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::time::timeout_at(deadline, fetch)
            .await
            .map_err(|_| CmsError::Timeout {
                after_ms: self.request_timeout.as_millis() as u64,
            })?
    }

    fn not_found<T>(&self, kind: &str, slug: String, error: CmsError) -> Outcome<T> {
        if error.is_not_found() {
            tracing::info!("🔍 No {} for slug '{}'", kind, slug);
        } else {
            tracing::warn!(
                "⚠️ Fetching {} '{}' failed, answering not found: {}",
                kind,
                slug,
                error
            );
        }
        Outcome::NotFound { slug }
    }
}

fn normalize_slug(slug: &str) -> String {
    slug.trim()
        .split('/')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

fn seo(title: &str, seo_title: Option<&str>, description: Option<&str>) -> SeoMeta {
    SeoMeta {
        title: seo_title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(title)
            .to_string(),
        description: description.unwrap_or_default().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryContentStore;
    use crate::domain::model::PageStatus;
    use crate::domain::ports::{NewPage, PageRepository};

    #[test]
    fn test_normalize_slug() {
        assert_eq!(normalize_slug("/about/"), "about");
        assert_eq!(normalize_slug(" about//team "), "about/team");
        assert_eq!(normalize_slug(""), "");
    }

    #[test]
    fn test_seo_fallbacks() {
        assert_eq!(
            seo("About", Some("About us"), Some("Who we are")),
            SeoMeta {
                title: "About us".to_string(),
                description: "Who we are".to_string()
            }
        );
        assert_eq!(
            seo("About", Some("  "), None),
            SeoMeta {
                title: "About".to_string(),
                description: String::new()
            }
        );
    }

    #[tokio::test]
    async fn test_huge_timeout_still_renders() {
        let store = InMemoryContentStore::new();
        store
            .create_page(NewPage {
                title: "About".to_string(),
                slug: "about".to_string(),
                status: Some(PageStatus::Published),
                ..Default::default()
            })
            .await
            .unwrap();

        let renderer =
            SiteRenderer::new(store).with_timeout(Duration::from_secs(i64::MAX as u64));

        assert!(renderer.render_page("about").await.is_found());
        assert!(!renderer.render_page("missing").await.is_found());
    }
}
