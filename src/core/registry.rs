use crate::domain::model::{ArticleSummary, Payload};
use crate::domain::section::{
    ArticleListBlock, BannerBlock, Block, CtaBlock, FaqBlock, FaqItem, HeroBlock, HtmlBlock,
    ImageBlock, Link, SectionType, TextBlock,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;

const DEFAULT_FAQ_TITLE: &str = "Frequently Asked Questions";
const DEFAULT_ARTICLE_LIST_TITLE: &str = "Latest Articles";
const DEFAULT_ARTICLE_LIMIT: usize = 6;
const DEFAULT_BANNER_STYLE: &str = "primary";
const DEFAULT_LINK: &str = "#";

/// 單一區塊渲染失敗；由 composer 吞掉，頁面仍會渲染
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("{section_type} section is missing required field '{field}'")]
    MissingField {
        section_type: SectionType,
        field: &'static str,
    },

    #[error("{section_type} section has an invalid payload: {message}")]
    InvalidPayload {
        section_type: SectionType,
        message: String,
    },
}

pub type Renderer = fn(&Payload) -> Result<Block, RenderError>;

static GLOBAL_REGISTRY: OnceLock<SectionRegistry> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct SectionRegistry {
    renderers: HashMap<SectionType, Renderer>,
    fallback: Renderer,
}

impl SectionRegistry {
    /// 全域 registry，包含所有內建 renderer，第一次使用時建立
    pub fn global() -> &'static SectionRegistry {
        GLOBAL_REGISTRY.get_or_init(SectionRegistry::builtin)
    }

    pub fn builtin() -> Self {
        Self::empty()
            .with_renderer(SectionType::Hero, render_hero)
            .with_renderer(SectionType::Text, render_text)
            .with_renderer(SectionType::Image, render_image)
            .with_renderer(SectionType::Cta, render_cta)
            .with_renderer(SectionType::Faq, render_faq)
            .with_renderer(SectionType::Html, render_html)
            .with_renderer(SectionType::ArticleList, render_article_list)
            .with_renderer(SectionType::Slider, render_slider)
            .with_renderer(SectionType::Banner, render_banner)
    }

    pub fn empty() -> Self {
        Self {
            renderers: HashMap::new(),
            fallback: render_nothing,
        }
    }

    pub fn with_renderer(mut self, section_type: SectionType, renderer: Renderer) -> Self {
        self.renderers.insert(section_type, renderer);
        self
    }

    /// 不會失敗：未知或未註冊的類型交給 fallback renderer
    pub fn resolve(&self, tag: &str) -> Renderer {
        SectionType::parse(tag)
            .and_then(|section_type| self.renderers.get(&section_type).copied())
            .unwrap_or(self.fallback)
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        SectionType::parse(tag).is_some_and(|section_type| self.renderers.contains_key(&section_type))
    }

    pub fn registered_types(&self) -> Vec<SectionType> {
        SectionType::ALL
            .into_iter()
            .filter(|section_type| self.renderers.contains_key(section_type))
            .collect()
    }
}

impl Default for SectionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn render_nothing(_payload: &Payload) -> Result<Block, RenderError> {
    Ok(Block::Empty)
}

fn render_hero(payload: &Payload) -> Result<Block, RenderError> {
    let title = require_text(payload, SectionType::Hero, "title", &["title", "heading"])?;

    Ok(Block::Hero(HeroBlock {
        title,
        subtitle: text(payload, &["subtitle", "subheading"]),
        image: text(payload, &["image"]),
        button: button(
            payload,
            &["button_text", "buttonText", "cta_text"],
            &["button_link", "buttonLink", "cta_link"],
        ),
    }))
}

fn render_text(payload: &Payload) -> Result<Block, RenderError> {
    let body = require_text(payload, SectionType::Text, "body", &["body", "content"])?;

    Ok(Block::Text(TextBlock {
        title: text(payload, &["title"]),
        body,
    }))
}

fn render_image(payload: &Payload) -> Result<Block, RenderError> {
    let src = require_text(payload, SectionType::Image, "src", &["src", "image", "url"])?;

    Ok(Block::Image(ImageBlock {
        src,
        alt: text(payload, &["alt"]).unwrap_or_default(),
        caption: text(payload, &["caption"]),
    }))
}

fn render_cta(payload: &Payload) -> Result<Block, RenderError> {
    let button = button(payload, &["button_text", "buttonText"], &["button_link", "buttonLink"])
        .ok_or(RenderError::MissingField {
            section_type: SectionType::Cta,
            field: "button_text",
        })?;

    Ok(Block::Cta(CtaBlock {
        title: text(payload, &["title"]),
        description: text(payload, &["description"]),
        button,
    }))
}

fn render_faq(payload: &Payload) -> Result<Block, RenderError> {
    let raw_items = match payload.get("items") {
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(RenderError::InvalidPayload {
                section_type: SectionType::Faq,
                message: "'items' must be an array".to_string(),
            })
        }
        None => {
            return Err(RenderError::MissingField {
                section_type: SectionType::Faq,
                field: "items",
            })
        }
    };

    // 不完整的問答直接略過
    let items: Vec<FaqItem> = raw_items
        .iter()
        .filter_map(|item| {
            let entry = item.as_object()?;
            Some(FaqItem {
                question: text(entry, &["question"])?,
                answer: text(entry, &["answer"])?,
            })
        })
        .collect();

    if items.is_empty() {
        return Err(RenderError::InvalidPayload {
            section_type: SectionType::Faq,
            message: "no complete question/answer pairs".to_string(),
        });
    }

    Ok(Block::Faq(FaqBlock {
        title: text(payload, &["title"]).unwrap_or_else(|| DEFAULT_FAQ_TITLE.to_string()),
        items,
    }))
}

fn render_html(payload: &Payload) -> Result<Block, RenderError> {
    let html = require_text(payload, SectionType::Html, "html", &["html", "content"])?;
    Ok(Block::Html(HtmlBlock { html }))
}

fn render_article_list(payload: &Payload) -> Result<Block, RenderError> {
    Ok(Block::ArticleList(article_list(payload, false)))
}

fn render_slider(payload: &Payload) -> Result<Block, RenderError> {
    Ok(Block::ArticleList(article_list(payload, true)))
}

fn article_list(payload: &Payload, slider: bool) -> ArticleListBlock {
    let limit = payload
        .get("limit")
        .and_then(|value| match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .filter(|limit| *limit > 0)
        .map(|limit| limit as usize)
        .unwrap_or(DEFAULT_ARTICLE_LIMIT);

    let articles: Vec<ArticleSummary> = payload
        .get("articles")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .take(limit)
                .collect()
        })
        .unwrap_or_default();

    ArticleListBlock {
        title: text(payload, &["title"]).unwrap_or_else(|| DEFAULT_ARTICLE_LIST_TITLE.to_string()),
        category: text(payload, &["category"]),
        limit,
        lang: text(payload, &["lang", "language"]),
        slider,
        articles,
    }
}

fn render_banner(payload: &Payload) -> Result<Block, RenderError> {
    let title = text(payload, &["title"]);
    let content = text(payload, &["content"]);
    let image = text(payload, &["image"]);

    if title.is_none() && content.is_none() && image.is_none() {
        return Err(RenderError::InvalidPayload {
            section_type: SectionType::Banner,
            message: "banner needs at least one of title, content or image".to_string(),
        });
    }

    Ok(Block::Banner(BannerBlock {
        title,
        content,
        image,
        link: text(payload, &["link"]),
        style: text(payload, &["style"]).unwrap_or_else(|| DEFAULT_BANNER_STYLE.to_string()),
    }))
}

/// 依序尋找第一個非空白的字串欄位（數字會轉成字串）
fn text(payload: &Payload, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match payload.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn require_text(
    payload: &Payload,
    section_type: SectionType,
    field: &'static str,
    keys: &[&str],
) -> Result<String, RenderError> {
    text(payload, keys).ok_or(RenderError::MissingField {
        section_type,
        field,
    })
}

fn button(payload: &Payload, text_keys: &[&str], link_keys: &[&str]) -> Option<Link> {
    let label = text(payload, text_keys)?;
    Some(Link {
        text: label,
        href: text(payload, link_keys).unwrap_or_else(|| DEFAULT_LINK.to_string()),
    })
}
