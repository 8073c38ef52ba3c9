use anyhow::Result;
use chrono::{TimeZone, Utc};
use newsdesk::core::export::{parse_categories_csv, CATEGORY_CSV_HEADER};
use newsdesk::domain::model::{Category, PageStatus, Post, PostStatus};
use newsdesk::domain::ports::{
    CategoryRepository, MenuRepository, NewCategory, NewMenu, NewMenuItem, NewPage, NewSection,
    PageRepository, PageUpdate,
};
use newsdesk::{Block, CategoryExporter, InMemoryContentStore, LocalStorage, SiteRenderer};
use std::sync::Arc;
use tempfile::TempDir;

fn payload(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    match value {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    }
}

fn post(id: &str, slug: &str, day: u32, category: &Category) -> Post {
    Post {
        id: id.to_string(),
        title: slug.replace('-', " "),
        slug: slug.to_string(),
        excerpt: None,
        content: None,
        featured_image: None,
        status: PostStatus::Published,
        published_at: Utc.with_ymd_and_hms(2024, 5, day, 8, 0, 0).single(),
        category: Some(category.clone()),
        is_featured: false,
        is_slider: false,
        is_breaking: false,
    }
}

#[tokio::test]
async fn test_edit_then_render_page() -> Result<()> {
    let store = Arc::new(InMemoryContentStore::new());

    let sports = store
        .create_category(NewCategory {
            name: "Sports".to_string(),
            slug: "sports".to_string(),
            color: Some("#ff0000".to_string()),
            language: None,
        })
        .await?;
    store.insert_post(post("p1", "old-match", 1, &sports)).await?;
    store.insert_post(post("p2", "new-match", 20, &sports)).await?;

    let page = store
        .create_page(NewPage {
            title: "Home".to_string(),
            slug: "home".to_string(),
            ..Default::default()
        })
        .await?;
    store
        .add_section(
            &page.id,
            NewSection {
                section_type: "ARTICLE_LIST".to_string(),
                order: None,
                content: payload(serde_json::json!({"category": "sports", "limit": 1})),
            },
        )
        .await?;
    store
        .add_section(
            &page.id,
            NewSection {
                section_type: "HERO".to_string(),
                order: Some(0),
                content: payload(serde_json::json!({"title": "Top stories"})),
            },
        )
        .await?;

    let menu = store
        .create_menu(NewMenu {
            name: "Main".to_string(),
            location: "navbar".to_string(),
        })
        .await?;
    store
        .add_menu_item(NewMenuItem {
            menu_id: menu.id.clone(),
            label: "Sports".to_string(),
            url: "/category/sports".to_string(),
            order: 0,
            parent_id: None,
        })
        .await?;

    let renderer = SiteRenderer::new(store.clone()).with_menus(Some("navbar".to_string()), None);

    // 草稿不對外
    assert!(!renderer.render_page("home").await.is_found());

    store
        .update_page(
            &page.id,
            PageUpdate {
                status: Some(PageStatus::Published),
                ..Default::default()
            },
        )
        .await?;

    let rendered = renderer
        .render_page("home")
        .await
        .found()
        .ok_or_else(|| anyhow::anyhow!("published page should render"))?;

    assert_eq!(rendered.blocks.len(), 2);
    assert!(matches!(rendered.blocks[0].block, Block::Hero(_)));
    match &rendered.blocks[1].block {
        Block::ArticleList(list) => {
            assert_eq!(list.articles.len(), 1);
            assert_eq!(list.articles[0].slug, "new-match");
        }
        other => panic!("expected article list, got {:?}", other),
    }
    assert_eq!(
        rendered.navigation.navbar.map(|nav| nav.links.len()),
        Some(1)
    );

    Ok(())
}

#[tokio::test]
async fn test_export_categories_to_disk() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let store = InMemoryContentStore::new();
    for (name, slug) in [("World", "world"), ("Arts, Culture", "arts")] {
        store
            .create_category(NewCategory {
                name: name.to_string(),
                slug: slug.to_string(),
                ..Default::default()
            })
            .await?;
    }

    let exporter = CategoryExporter::new(LocalStorage::new(output_path.clone()), output_path.clone());
    let saved_path = exporter.export_from(&store, "categories.csv").await?;
    assert!(saved_path.ends_with("categories.csv"));

    let written = std::fs::read_to_string(temp_dir.path().join("categories.csv"))?;
    assert!(written.starts_with(CATEGORY_CSV_HEADER));

    // 依名稱排序
    let parsed = parse_categories_csv(&written)?;
    let names: Vec<&str> = parsed.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Arts, Culture", "World"]);
    assert!(parsed.iter().all(|c| c.color.is_none()));

    Ok(())
}
