use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// 區塊內容：依區塊類型而定的開放式 JSON 物件
pub type Payload = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PageStatus {
    #[default]
    #[serde(alias = "draft")]
    Draft,
    #[serde(alias = "published")]
    Published,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub status: PageStatus,
    #[serde(default, alias = "seo_title")]
    pub seo_title: Option<String>,
    #[serde(default, alias = "seo_description")]
    pub seo_description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, alias = "page_id", alias = "page", deserialize_with = "string_or_number")]
    pub page_id: String,
    #[serde(default, rename = "type", alias = "section_type")]
    pub section_type: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default, alias = "data", deserialize_with = "object_or_empty")]
    pub content: Payload,
    #[serde(default = "default_true", alias = "is_active")]
    pub is_active: bool,
}

impl Section {
    pub fn new(id: impl Into<String>, section_type: impl Into<String>, order: i64) -> Self {
        Self {
            id: id.into(),
            page_id: String::new(),
            section_type: section_type.into(),
            order,
            content: Payload::new(),
            is_active: true,
        }
    }

    pub fn with_content(mut self, content: Value) -> Self {
        if let Value::Object(map) = content {
            self.content = map;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, alias = "lang")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, alias = "menu_id", alias = "menu", deserialize_with = "string_or_number")]
    pub menu_id: String,
    pub label: String,
    #[serde(alias = "link")]
    pub url: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default, alias = "parent_id", alias = "parent", deserialize_with = "optional_string_or_number")]
    pub parent_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<MenuItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PostStatus {
    #[default]
    #[serde(alias = "draft")]
    Draft,
    #[serde(alias = "pending")]
    Pending,
    #[serde(alias = "published")]
    Published,
    #[serde(alias = "scheduled")]
    Scheduled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, alias = "featured_image", alias = "featuredImageUrl", alias = "featured_image_url")]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default, alias = "published_at", alias = "publish_at")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default, alias = "is_featured")]
    pub is_featured: bool,
    #[serde(default, alias = "is_slider")]
    pub is_slider: bool,
    #[serde(default, alias = "is_breaking")]
    pub is_breaking: bool,
}

/// 文章列表中的單筆摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default, alias = "seo_description")]
    pub excerpt: Option<String>,
    #[serde(default, alias = "featured_image", alias = "featured_image_url")]
    pub featured_image: Option<String>,
    #[serde(default, alias = "category_name")]
    pub category_name: Option<String>,
    #[serde(default, alias = "category_slug")]
    pub category_slug: Option<String>,
    #[serde(default, alias = "published_at", alias = "publish_at")]
    pub published_at: Option<DateTime<Utc>>,
}

impl From<&Post> for ArticleSummary {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            slug: post.slug.clone(),
            excerpt: post.excerpt.clone(),
            featured_image: post.featured_image.clone(),
            category_name: post.category.as_ref().map(|c| c.name.clone()),
            category_slug: post.category.as_ref().map(|c| c.slug.clone()),
            published_at: post.published_at,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Django 後端使用數字 id，Prisma 後端使用字串 id
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

fn optional_string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 非物件的內容一律視為空物件
fn object_or_empty<'de, D>(deserializer: D) -> std::result::Result<Payload, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Payload::new()),
    }
}
