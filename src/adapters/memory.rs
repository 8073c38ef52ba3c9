use crate::domain::model::{
    ArticleQuery, ArticleSummary, Category, Menu, MenuItem, Page, PageStatus, Post, PostStatus,
    Section,
};
use crate::domain::ports::{
    CategoryRepository, CategoryUpdate, ContentProvider, MenuItemUpdate, MenuRepository,
    NewCategory, NewMenu, NewMenuItem, NewPage, NewSection, PageRepository, PageUpdate,
    SectionUpdate,
};
use crate::utils::error::{CmsError, Result};
use crate::utils::validation::validate_slug;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    categories: Vec<Category>,
    pages: Vec<Page>,
    menus: Vec<Menu>,
    posts: Vec<Post>,
}

impl State {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn page_mut(&mut self, id: &str) -> Result<&mut Page> {
        self.pages
            .iter_mut()
            .find(|page| page.id == id)
            .ok_or_else(|| CmsError::not_found("Page", id))
    }

    fn menu_mut(&mut self, id: &str) -> Result<&mut Menu> {
        self.menus
            .iter_mut()
            .find(|menu| menu.id == id)
            .ok_or_else(|| CmsError::not_found("Menu", id))
    }

    fn menu_item_mut(&mut self, id: &str) -> Result<&mut MenuItem> {
        self.menus
            .iter_mut()
            .flat_map(|menu| menu.items.iter_mut())
            .find(|item| item.id == id)
            .ok_or_else(|| CmsError::not_found("MenuItem", id))
    }
}

/// 後台 CRUD 邊界的記憶體實作
///
/// 同時提供前台讀取，不需要後端也能完整渲染。頁面的 sections 依 `order`
/// 排序；選單項目以平面方式儲存，透過 `parent_id` 連結。
#[derive(Debug, Default)]
pub struct InMemoryContentStore {
    state: RwLock<State>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 直接放入文章（文章的 CRUD 不在這個 store 的範圍內）
    pub async fn insert_post(&self, post: Post) -> Result<Post> {
        let mut state = self.state.write().await;
        if state.posts.iter().any(|existing| existing.slug == post.slug) {
            return Err(CmsError::conflict("Post", "slug", post.slug));
        }
        state.posts.push(post.clone());
        Ok(post)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryContentStore {
    async fn create_category(&self, input: NewCategory) -> Result<Category> {
        validate_slug(&input.slug)?;
        let mut state = self.state.write().await;

        if state.categories.iter().any(|c| c.slug == input.slug) {
            return Err(CmsError::conflict("Category", "slug", input.slug));
        }

        let category = Category {
            id: state.next_id("cat"),
            name: input.name,
            slug: input.slug,
            color: input.color,
            language: input.language,
        };
        state.categories.push(category.clone());
        tracing::debug!("Created category {} ({})", category.id, category.slug);
        Ok(category)
    }

    async fn get_category(&self, id: &str) -> Result<Category> {
        let state = self.state.read().await;
        state
            .categories
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| CmsError::not_found("Category", id))
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let state = self.state.read().await;
        let mut categories = state.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn update_category(&self, id: &str, update: CategoryUpdate) -> Result<Category> {
        let mut state = self.state.write().await;

        let index = state
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CmsError::not_found("Category", id))?;

        if let Some(slug) = &update.slug {
            validate_slug(slug)?;
            if state.categories.iter().any(|c| c.slug == *slug && c.id != id) {
                return Err(CmsError::conflict("Category", "slug", slug.clone()));
            }
        }

        let category = &mut state.categories[index];
        if let Some(name) = update.name {
            category.name = name;
        }
        if let Some(slug) = update.slug {
            category.slug = slug;
        }
        if update.color.is_some() {
            category.color = update.color;
        }
        if update.language.is_some() {
            category.language = update.language;
        }
        Ok(category.clone())
    }

    async fn delete_category(&self, id: &str) -> Result<Category> {
        let mut state = self.state.write().await;
        let index = state
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CmsError::not_found("Category", id))?;
        Ok(state.categories.remove(index))
    }
}

#[async_trait]
impl PageRepository for InMemoryContentStore {
    async fn create_page(&self, input: NewPage) -> Result<Page> {
        validate_slug(&input.slug)?;
        let mut state = self.state.write().await;

        if state.pages.iter().any(|p| p.slug == input.slug) {
            return Err(CmsError::conflict("Page", "slug", input.slug));
        }

        let page = Page {
            id: state.next_id("page"),
            slug: input.slug,
            title: input.title,
            status: input.status.unwrap_or_default(),
            seo_title: input.seo_title,
            seo_description: input.seo_description,
            sections: Vec::new(),
        };
        state.pages.push(page.clone());
        Ok(page)
    }

    async fn get_page(&self, id: &str) -> Result<Page> {
        let state = self.state.read().await;
        state
            .pages
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| CmsError::not_found("Page", id))
    }

    async fn list_pages(&self, include_drafts: bool) -> Result<Vec<Page>> {
        let state = self.state.read().await;
        Ok(state
            .pages
            .iter()
            .filter(|p| include_drafts || p.status == PageStatus::Published)
            .cloned()
            .collect())
    }

    async fn update_page(&self, id: &str, update: PageUpdate) -> Result<Page> {
        let mut state = self.state.write().await;

        if !state.pages.iter().any(|p| p.id == id) {
            return Err(CmsError::not_found("Page", id));
        }
        if let Some(slug) = &update.slug {
            validate_slug(slug)?;
            if state.pages.iter().any(|p| p.slug == *slug && p.id != id) {
                return Err(CmsError::conflict("Page", "slug", slug.clone()));
            }
        }

        let page = state.page_mut(id)?;
        if let Some(title) = update.title {
            page.title = title;
        }
        if let Some(slug) = update.slug {
            page.slug = slug;
        }
        if let Some(status) = update.status {
            page.status = status;
        }
        if update.seo_title.is_some() {
            page.seo_title = update.seo_title;
        }
        if update.seo_description.is_some() {
            page.seo_description = update.seo_description;
        }
        Ok(page.clone())
    }

    async fn delete_page(&self, id: &str) -> Result<Page> {
        let mut state = self.state.write().await;
        let index = state
            .pages
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CmsError::not_found("Page", id))?;
        // sections 隨頁面一起刪除
        Ok(state.pages.remove(index))
    }

    async fn add_section(&self, page_id: &str, input: NewSection) -> Result<Section> {
        let mut state = self.state.write().await;
        if !state.pages.iter().any(|p| p.id == page_id) {
            return Err(CmsError::not_found("Page", page_id));
        }
        let id = state.next_id("section");
        let page = state.page_mut(page_id)?;

        let order = match input.order {
            Some(order) => {
                // 指定位置時，後面的區塊往後移一格
                for section in page.sections.iter_mut().filter(|s| s.order >= order) {
                    section.order += 1;
                }
                order
            }
            None => page.sections.iter().map(|s| s.order).max().map_or(0, |max| max + 1),
        };

        let section = Section {
            id,
            page_id: page_id.to_string(),
            section_type: input.section_type,
            order,
            content: input.content,
            is_active: true,
        };
        page.sections.push(section.clone());
        page.sections.sort_by_key(|s| s.order);
        Ok(section)
    }

    async fn remove_section(&self, section_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let page = state
            .pages
            .iter_mut()
            .find(|p| p.sections.iter().any(|s| s.id == section_id))
            .ok_or_else(|| CmsError::not_found("Section", section_id))?;

        page.sections.retain(|s| s.id != section_id);
        for (index, section) in page.sections.iter_mut().enumerate() {
            section.order = index as i64;
        }
        Ok(())
    }

    async fn update_section(&self, section_id: &str, update: SectionUpdate) -> Result<Section> {
        let mut state = self.state.write().await;
        let page = state
            .pages
            .iter_mut()
            .find(|p| p.sections.iter().any(|s| s.id == section_id))
            .ok_or_else(|| CmsError::not_found("Section", section_id))?;

        if let Some(order) = update.order {
            let moved = page
                .sections
                .iter()
                .any(|s| s.id == section_id && s.order != order);
            if moved {
                // 移到新位置：其他 order >= n 的區塊往後移一格
                for section in page
                    .sections
                    .iter_mut()
                    .filter(|s| s.id != section_id && s.order >= order)
                {
                    section.order += 1;
                }
            }
        }

        let section = page
            .sections
            .iter_mut()
            .find(|s| s.id == section_id)
            .ok_or_else(|| CmsError::not_found("Section", section_id))?;
        if let Some(section_type) = update.section_type {
            section.section_type = section_type;
        }
        if let Some(order) = update.order {
            section.order = order;
        }
        if let Some(content) = update.content {
            section.content = content;
        }
        if let Some(is_active) = update.is_active {
            section.is_active = is_active;
        }
        let updated = section.clone();

        page.sections.sort_by_key(|s| s.order);
        Ok(updated)
    }

    async fn reorder_sections(&self, page_id: &str, orders: &[(String, i64)]) -> Result<Vec<Section>> {
        let mut state = self.state.write().await;
        let page = state.page_mut(page_id)?;

        // 先全部檢查，避免只套用一部分
        if let Some((missing, _)) = orders
            .iter()
            .find(|(id, _)| !page.sections.iter().any(|s| s.id == *id))
        {
            return Err(CmsError::not_found("Section", missing.clone()));
        }

        let new_orders: HashMap<&str, i64> =
            orders.iter().map(|(id, order)| (id.as_str(), *order)).collect();
        for section in page.sections.iter_mut() {
            if let Some(order) = new_orders.get(section.id.as_str()) {
                section.order = *order;
            }
        }

        // 同一頁的 order 不可重複：排序後重新編號為 0..n-1
        page.sections.sort_by_key(|s| s.order);
        for (index, section) in page.sections.iter_mut().enumerate() {
            section.order = index as i64;
        }
        Ok(page.sections.clone())
    }
}

#[async_trait]
impl MenuRepository for InMemoryContentStore {
    async fn create_menu(&self, input: NewMenu) -> Result<Menu> {
        let mut state = self.state.write().await;

        if state.menus.iter().any(|m| m.name == input.name) {
            return Err(CmsError::conflict("Menu", "name", input.name));
        }
        if state.menus.iter().any(|m| m.location == input.location) {
            return Err(CmsError::conflict("Menu", "location", input.location));
        }

        let menu = Menu {
            id: state.next_id("menu"),
            name: input.name,
            location: input.location,
            items: Vec::new(),
        };
        state.menus.push(menu.clone());
        Ok(menu)
    }

    async fn get_menu(&self, id: &str) -> Result<Menu> {
        let state = self.state.read().await;
        state
            .menus
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| CmsError::not_found("Menu", id))
    }

    async fn delete_menu(&self, id: &str) -> Result<Menu> {
        let mut state = self.state.write().await;
        let index = state
            .menus
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| CmsError::not_found("Menu", id))?;
        Ok(state.menus.remove(index))
    }

    async fn add_menu_item(&self, input: NewMenuItem) -> Result<MenuItem> {
        let mut state = self.state.write().await;

        if !state.menus.iter().any(|m| m.id == input.menu_id) {
            return Err(CmsError::not_found("Menu", input.menu_id));
        }
        if let Some(parent_id) = &input.parent_id {
            let parent_exists = state
                .menus
                .iter()
                .flat_map(|m| m.items.iter())
                .any(|item| item.id == *parent_id);
            if !parent_exists {
                return Err(CmsError::not_found("MenuItem", parent_id.clone()));
            }
        }

        let item = MenuItem {
            id: state.next_id("item"),
            menu_id: input.menu_id.clone(),
            label: input.label,
            url: input.url,
            order: input.order,
            parent_id: input.parent_id,
            children: Vec::new(),
        };
        state.menu_mut(&input.menu_id)?.items.push(item.clone());
        Ok(item)
    }

    async fn update_menu_item(&self, id: &str, update: MenuItemUpdate) -> Result<MenuItem> {
        let mut state = self.state.write().await;
        let item = state.menu_item_mut(id)?;

        if let Some(label) = update.label {
            item.label = label;
        }
        if let Some(url) = update.url {
            item.url = url;
        }
        if let Some(order) = update.order {
            item.order = order;
        }
        Ok(item.clone())
    }

    async fn remove_menu_item(&self, id: &str) -> Result<MenuItem> {
        let mut state = self.state.write().await;
        let menu = state
            .menus
            .iter_mut()
            .find(|menu| menu.items.iter().any(|item| item.id == id))
            .ok_or_else(|| CmsError::not_found("MenuItem", id))?;

        // 整棵子樹一起刪除，避免孫項目變成孤兒
        let mut doomed: HashSet<String> = HashSet::from([id.to_string()]);
        loop {
            let descendants: Vec<String> = menu
                .items
                .iter()
                .filter(|item| !doomed.contains(&item.id))
                .filter(|item| item.parent_id.as_ref().is_some_and(|p| doomed.contains(p)))
                .map(|item| item.id.clone())
                .collect();
            if descendants.is_empty() {
                break;
            }
            doomed.extend(descendants);
        }

        let index = menu
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| CmsError::not_found("MenuItem", id))?;
        let removed = menu.items.remove(index);
        menu.items.retain(|item| !doomed.contains(&item.id));
        tracing::debug!(
            "Removed menu item {} and {} descendants",
            id,
            doomed.len() - 1
        );
        Ok(removed)
    }
}

#[async_trait]
impl ContentProvider for InMemoryContentStore {
    async fn fetch_page(&self, slug: &str) -> Result<Page> {
        let state = self.state.read().await;
        state
            .pages
            .iter()
            .find(|p| p.slug == slug && p.status == PageStatus::Published)
            .cloned()
            .ok_or_else(|| CmsError::not_found("Page", slug))
    }

    async fn fetch_post(&self, slug: &str) -> Result<Post> {
        let state = self.state.read().await;
        state
            .posts
            .iter()
            .find(|p| p.slug == slug && p.status == PostStatus::Published)
            .cloned()
            .ok_or_else(|| CmsError::not_found("Post", slug))
    }

    async fn fetch_menu(&self, location: &str) -> Result<Menu> {
        let state = self.state.read().await;
        state
            .menus
            .iter()
            .find(|m| m.location == location)
            .cloned()
            .ok_or_else(|| CmsError::not_found("Menu", location))
    }

    async fn fetch_category(&self, slug: &str) -> Result<Category> {
        let state = self.state.read().await;
        state
            .categories
            .iter()
            .find(|c| c.slug == slug)
            .cloned()
            .ok_or_else(|| CmsError::not_found("Category", slug))
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>> {
        self.list_categories().await
    }

    async fn fetch_articles(&self, query: &ArticleQuery) -> Result<Vec<ArticleSummary>> {
        let state = self.state.read().await;
        let mut posts: Vec<&Post> = state
            .posts
            .iter()
            .filter(|p| p.status == PostStatus::Published)
            .filter(|p| match &query.category {
                Some(slug) => p.category.as_ref().is_some_and(|c| c.slug == *slug),
                None => true,
            })
            .filter(|p| match &query.lang {
                Some(lang) => p
                    .category
                    .as_ref()
                    .and_then(|c| c.language.as_ref())
                    .map_or(true, |language| language == lang),
                None => true,
            })
            .collect();

        // 最新的在前
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        Ok(posts
            .into_iter()
            .take(query.limit.unwrap_or(usize::MAX))
            .map(ArticleSummary::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_category(name: &str, slug: &str) -> NewCategory {
        NewCategory {
            name: name.to_string(),
            slug: slug.to_string(),
            color: Some("#000000".to_string()),
            language: None,
        }
    }

    async fn page_with_sections(store: &InMemoryContentStore, count: usize) -> Page {
        let page = store
            .create_page(NewPage {
                title: "Home".to_string(),
                slug: "home".to_string(),
                status: Some(PageStatus::Published),
                ..Default::default()
            })
            .await
            .unwrap();
        for _ in 0..count {
            store
                .add_section(
                    &page.id,
                    NewSection {
                        section_type: "TEXT".to_string(),
                        order: None,
                        content: Default::default(),
                    },
                )
                .await
                .unwrap();
        }
        store.get_page(&page.id).await.unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_category_slug_conflicts_without_mutation() {
        let store = InMemoryContentStore::new();
        let original = store.create_category(new_category("Sports", "sports")).await.unwrap();

        let err = store
            .create_category(new_category("Other Sports", "sports"))
            .await
            .unwrap_err();

        assert!(matches!(err, CmsError::Conflict { entity: "Category", .. }));
        let categories = store.list_categories().await.unwrap();
        assert_eq!(categories, vec![original]);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_id() {
        let store = InMemoryContentStore::new();
        let existing = store.create_category(new_category("World", "world")).await.unwrap();

        let err = store
            .update_category(
                "cat-999",
                CategoryUpdate {
                    name: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        assert!(store.delete_category("cat-999").await.unwrap_err().is_not_found());
        assert!(store.delete_page("page-1").await.unwrap_err().is_not_found());
        assert!(store
            .update_page("page-1", PageUpdate::default())
            .await
            .unwrap_err()
            .is_not_found());
        assert_eq!(store.list_categories().await.unwrap(), vec![existing]);
    }

    #[tokio::test]
    async fn test_update_slug_to_taken_value_conflicts() {
        let store = InMemoryContentStore::new();
        store.create_category(new_category("A", "a")).await.unwrap();
        let b = store.create_category(new_category("B", "b")).await.unwrap();

        let err = store
            .update_category(
                &b.id,
                CategoryUpdate {
                    slug: Some("a".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CmsError::Conflict { .. }));
        assert_eq!(store.get_category(&b.id).await.unwrap().slug, "b");

        let renamed = store
            .update_category(
                &b.id,
                CategoryUpdate {
                    name: Some("Bee".to_string()),
                    slug: Some("b".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Bee");
    }

    #[tokio::test]
    async fn test_invalid_slug_rejected() {
        let store = InMemoryContentStore::new();
        let err = store
            .create_page(NewPage {
                title: "Bad".to_string(),
                slug: "Bad Slug".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CmsError::InvalidSlug { .. }));
        assert_eq!(err.category(), crate::utils::error::ErrorCategory::Content);
        assert!(store.list_pages(true).await.unwrap().is_empty());

        let page = store
            .create_page(NewPage {
                title: "Local".to_string(),
                slug: "local_news".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.slug, "local_news");
    }

    #[tokio::test]
    async fn test_add_section_appends_and_shifts() {
        let store = InMemoryContentStore::new();
        let page = page_with_sections(&store, 3).await;
        let orders: Vec<i64> = page.sections.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);

        let inserted = store
            .add_section(
                &page.id,
                NewSection {
                    section_type: "HERO".to_string(),
                    order: Some(1),
                    content: match json!({"title": "t"}) {
                        serde_json::Value::Object(map) => map,
                        _ => unreachable!(),
                    },
                },
            )
            .await
            .unwrap();
        assert_eq!(inserted.order, 1);

        let page = store.get_page(&page.id).await.unwrap();
        let layout: Vec<(String, i64)> = page
            .sections
            .iter()
            .map(|s| (s.section_type.clone(), s.order))
            .collect();
        assert_eq!(
            layout,
            vec![
                ("TEXT".to_string(), 0),
                ("HERO".to_string(), 1),
                ("TEXT".to_string(), 2),
                ("TEXT".to_string(), 3),
            ]
        );
    }

    #[tokio::test]
    async fn test_remove_section_renumbers() {
        let store = InMemoryContentStore::new();
        let page = page_with_sections(&store, 3).await;

        store.remove_section(&page.sections[0].id).await.unwrap();
        let page = store.get_page(&page.id).await.unwrap();
        let orders: Vec<i64> = page.sections.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![0, 1]);

        assert!(store.remove_section("section-404").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_reorder_with_unknown_id_does_not_mutate() {
        let store = InMemoryContentStore::new();
        let page = page_with_sections(&store, 2).await;
        let first = page.sections[0].id.clone();
        let second = page.sections[1].id.clone();

        let err = store
            .reorder_sections(&page.id, &[(first.clone(), 5), ("ghost".to_string(), 0)])
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.get_page(&page.id).await.unwrap(), page);

        let sections = store
            .reorder_sections(&page.id, &[(first.clone(), 5), (second.clone(), 1)])
            .await
            .unwrap();
        let ids: Vec<&str> = sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec![second.as_str(), first.as_str()]);
    }

    #[tokio::test]
    async fn test_public_fetch_hides_drafts() {
        let store = InMemoryContentStore::new();
        let page = store
            .create_page(NewPage {
                title: "Draft".to_string(),
                slug: "draft".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.status, PageStatus::Draft);
        assert!(store.fetch_page("draft").await.unwrap_err().is_not_found());
        assert!(store.list_pages(false).await.unwrap().is_empty());

        store
            .update_page(
                &page.id,
                PageUpdate {
                    status: Some(PageStatus::Published),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(store.fetch_page("draft").await.unwrap().id, page.id);
    }

    #[tokio::test]
    async fn test_menu_rules() {
        let store = InMemoryContentStore::new();
        let menu = store
            .create_menu(NewMenu {
                name: "Main".to_string(),
                location: "navbar".to_string(),
            })
            .await
            .unwrap();

        let dup = store
            .create_menu(NewMenu {
                name: "Other".to_string(),
                location: "navbar".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(dup, CmsError::Conflict { field: "location", .. }));

        let orphan = store
            .add_menu_item(NewMenuItem {
                menu_id: menu.id.clone(),
                label: "Child".to_string(),
                url: "/child".to_string(),
                order: 0,
                parent_id: Some("item-404".to_string()),
            })
            .await
            .unwrap_err();
        assert!(orphan.is_not_found());

        let parent = store
            .add_menu_item(NewMenuItem {
                menu_id: menu.id.clone(),
                label: "News".to_string(),
                url: "/news".to_string(),
                order: 0,
                parent_id: None,
            })
            .await
            .unwrap();
        store
            .add_menu_item(NewMenuItem {
                menu_id: menu.id.clone(),
                label: "Local".to_string(),
                url: "/news/local".to_string(),
                order: 0,
                parent_id: Some(parent.id.clone()),
            })
            .await
            .unwrap();

        let updated = store
            .update_menu_item(
                &parent.id,
                MenuItemUpdate {
                    label: Some("Latest".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.label, "Latest");

        assert_eq!(store.fetch_menu("navbar").await.unwrap().items.len(), 2);
        store.remove_menu_item(&parent.id).await.unwrap();
        assert!(store.fetch_menu("navbar").await.unwrap().items.is_empty());
        assert!(store.remove_menu_item(&parent.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_section_moves_and_edits() {
        let store = InMemoryContentStore::new();
        let page = page_with_sections(&store, 3).await;
        let (first, second, third) = (
            page.sections[0].id.clone(),
            page.sections[1].id.clone(),
            page.sections[2].id.clone(),
        );

        let updated = store
            .update_section(
                &third,
                SectionUpdate {
                    section_type: Some("HERO".to_string()),
                    order: Some(0),
                    content: match json!({"title": "Breaking"}) {
                        serde_json::Value::Object(map) => Some(map),
                        _ => unreachable!(),
                    },
                    is_active: Some(false),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.section_type, "HERO");
        assert_eq!(updated.order, 0);
        assert!(!updated.is_active);
        assert_eq!(updated.content.get("title"), Some(&json!("Breaking")));

        let page = store.get_page(&page.id).await.unwrap();
        let layout: Vec<(&str, i64)> = page
            .sections
            .iter()
            .map(|s| (s.id.as_str(), s.order))
            .collect();
        assert_eq!(
            layout,
            vec![(third.as_str(), 0), (first.as_str(), 1), (second.as_str(), 2)]
        );
    }

    #[tokio::test]
    async fn test_update_section_same_order_does_not_shift() {
        let store = InMemoryContentStore::new();
        let page = page_with_sections(&store, 2).await;

        store
            .update_section(
                &page.sections[1].id,
                SectionUpdate {
                    order: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let orders: Vec<i64> = store
            .get_page(&page.id)
            .await
            .unwrap()
            .sections
            .iter()
            .map(|s| s.order)
            .collect();
        assert_eq!(orders, vec![0, 1]);
    }

    #[tokio::test]
    async fn test_update_missing_section_does_not_mutate() {
        let store = InMemoryContentStore::new();
        let page = page_with_sections(&store, 2).await;

        let err = store
            .update_section(
                "section-404",
                SectionUpdate {
                    order: Some(0),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(store.get_page(&page.id).await.unwrap(), page);
    }

    #[tokio::test]
    async fn test_reorder_with_duplicate_orders_renumbers() {
        let store = InMemoryContentStore::new();
        let page = page_with_sections(&store, 3).await;
        let ids: Vec<String> = page.sections.iter().map(|s| s.id.clone()).collect();

        let sections = store
            .reorder_sections(&page.id, &[(ids[2].clone(), 0), (ids[0].clone(), 0)])
            .await
            .unwrap();

        let layout: Vec<(&str, i64)> = sections.iter().map(|s| (s.id.as_str(), s.order)).collect();
        assert_eq!(
            layout,
            vec![(ids[0].as_str(), 0), (ids[2].as_str(), 1), (ids[1].as_str(), 2)]
        );
    }

    #[tokio::test]
    async fn test_remove_menu_item_removes_whole_subtree() {
        let store = InMemoryContentStore::new();
        let menu = store
            .create_menu(NewMenu {
                name: "Main".to_string(),
                location: "navbar".to_string(),
            })
            .await
            .unwrap();

        let mut parent_id = None;
        let mut ids = Vec::new();
        for label in ["News", "Local", "City"] {
            let item = store
                .add_menu_item(NewMenuItem {
                    menu_id: menu.id.clone(),
                    label: label.to_string(),
                    url: format!("/{}", label.to_lowercase()),
                    order: 0,
                    parent_id: parent_id.clone(),
                })
                .await
                .unwrap();
            parent_id = Some(item.id.clone());
            ids.push(item.id);
        }
        let sibling = store
            .add_menu_item(NewMenuItem {
                menu_id: menu.id.clone(),
                label: "About".to_string(),
                url: "/about".to_string(),
                order: 1,
                parent_id: None,
            })
            .await
            .unwrap();

        let removed = store.remove_menu_item(&ids[0]).await.unwrap();
        assert_eq!(removed.label, "News");

        let menu = store.fetch_menu("navbar").await.unwrap();
        let remaining: Vec<&str> = menu.items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(remaining, vec![sibling.id.as_str()]);

        let tree = crate::core::navigation::NavTree::from_menu(&menu);
        let roots: Vec<&str> = tree.links.iter().map(|link| link.label.as_str()).collect();
        assert_eq!(roots, vec!["About"]);
    }
}
