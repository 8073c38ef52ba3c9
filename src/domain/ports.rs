use crate::domain::model::{
    ArticleQuery, ArticleSummary, Category, Menu, MenuItem, Page, PageStatus, Post, Section,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 前台讀取內容的邊界：缺少的資料回傳 `CmsError::NotFound`
#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn fetch_page(&self, slug: &str) -> Result<Page>;
    async fn fetch_post(&self, slug: &str) -> Result<Post>;
    async fn fetch_menu(&self, location: &str) -> Result<Menu>;
    async fn fetch_category(&self, slug: &str) -> Result<Category>;
    async fn fetch_categories(&self) -> Result<Vec<Category>>;
    async fn fetch_articles(&self, query: &ArticleQuery) -> Result<Vec<ArticleSummary>>;
}

#[async_trait]
impl<P: ContentProvider + ?Sized> ContentProvider for std::sync::Arc<P> {
    async fn fetch_page(&self, slug: &str) -> Result<Page> {
        (**self).fetch_page(slug).await
    }

    async fn fetch_post(&self, slug: &str) -> Result<Post> {
        (**self).fetch_post(slug).await
    }

    async fn fetch_menu(&self, location: &str) -> Result<Menu> {
        (**self).fetch_menu(location).await
    }

    async fn fetch_category(&self, slug: &str) -> Result<Category> {
        (**self).fetch_category(slug).await
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>> {
        (**self).fetch_categories().await
    }

    async fn fetch_articles(&self, query: &ArticleQuery) -> Result<Vec<ArticleSummary>> {
        (**self).fetch_articles(query).await
    }
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn request_timeout_seconds(&self) -> u64;
    fn navbar_location(&self) -> &str;
    fn footer_location(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
}

#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub color: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub color: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewPage {
    pub title: String,
    pub slug: String,
    pub status: Option<PageStatus>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PageUpdate {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub status: Option<PageStatus>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewSection {
    pub section_type: String,
    /// 未指定時接在最後
    pub order: Option<i64>,
    pub content: crate::domain::model::Payload,
}

/// 只更新有給值的欄位；改 `order` 時其他區塊會往後移
#[derive(Debug, Clone, Default)]
pub struct SectionUpdate {
    pub section_type: Option<String>,
    pub order: Option<i64>,
    pub content: Option<crate::domain::model::Payload>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct NewMenu {
    pub name: String,
    pub location: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewMenuItem {
    pub menu_id: String,
    pub label: String,
    pub url: String,
    pub order: i64,
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MenuItemUpdate {
    pub label: Option<String>,
    pub url: Option<String>,
    pub order: Option<i64>,
}

/// 後台 CRUD 邊界
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create_category(&self, input: NewCategory) -> Result<Category>;
    async fn get_category(&self, id: &str) -> Result<Category>;
    async fn list_categories(&self) -> Result<Vec<Category>>;
    async fn update_category(&self, id: &str, update: CategoryUpdate) -> Result<Category>;
    async fn delete_category(&self, id: &str) -> Result<Category>;
}

#[async_trait]
pub trait PageRepository: Send + Sync {
    async fn create_page(&self, input: NewPage) -> Result<Page>;
    async fn get_page(&self, id: &str) -> Result<Page>;
    async fn list_pages(&self, include_drafts: bool) -> Result<Vec<Page>>;
    async fn update_page(&self, id: &str, update: PageUpdate) -> Result<Page>;
    async fn delete_page(&self, id: &str) -> Result<Page>;
    async fn add_section(&self, page_id: &str, input: NewSection) -> Result<Section>;
    async fn update_section(&self, section_id: &str, update: SectionUpdate) -> Result<Section>;
    async fn remove_section(&self, section_id: &str) -> Result<()>;
    async fn reorder_sections(&self, page_id: &str, orders: &[(String, i64)]) -> Result<Vec<Section>>;
}

#[async_trait]
pub trait MenuRepository: Send + Sync {
    async fn create_menu(&self, input: NewMenu) -> Result<Menu>;
    async fn get_menu(&self, id: &str) -> Result<Menu>;
    async fn delete_menu(&self, id: &str) -> Result<Menu>;
    async fn add_menu_item(&self, input: NewMenuItem) -> Result<MenuItem>;
    async fn update_menu_item(&self, id: &str, update: MenuItemUpdate) -> Result<MenuItem>;
    async fn remove_menu_item(&self, id: &str) -> Result<MenuItem>;
}
