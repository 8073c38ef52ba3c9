//! 型別化的區塊
//!
//! 儲存的 [`Section`](super::model::Section) 只有自由格式的類型標籤與未定型的
//! payload；渲染後變成 [`Block`]，每個已知類型一個變體，無法渲染時為 [`Block::Empty`]。

use super::model::ArticleSummary;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SectionType {
    Hero,
    Text,
    Image,
    Cta,
    Faq,
    Html,
    ArticleList,
    Banner,
    Slider,
}

impl SectionType {
    pub const ALL: [SectionType; 9] = [
        SectionType::Hero,
        SectionType::Text,
        SectionType::Image,
        SectionType::Cta,
        SectionType::Faq,
        SectionType::Html,
        SectionType::ArticleList,
        SectionType::Banner,
        SectionType::Slider,
    ];

    /// 大小寫不敏感，`-` 與 `_` 視為相同
    pub fn parse(tag: &str) -> Option<Self> {
        let normalized = tag.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|section_type| section_type.as_tag() == normalized)
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            SectionType::Hero => "HERO",
            SectionType::Text => "TEXT",
            SectionType::Image => "IMAGE",
            SectionType::Cta => "CTA",
            SectionType::Faq => "FAQ",
            SectionType::Html => "HTML",
            SectionType::ArticleList => "ARTICLE_LIST",
            SectionType::Banner => "BANNER",
            SectionType::Slider => "SLIDER",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub text: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeroBlock {
    pub title: String,
    pub subtitle: Option<String>,
    pub image: Option<String>,
    pub button: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub title: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageBlock {
    pub src: String,
    pub alt: String,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CtaBlock {
    pub title: Option<String>,
    pub description: Option<String>,
    pub button: Link,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaqBlock {
    pub title: String,
    pub items: Vec<FaqItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HtmlBlock {
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleListBlock {
    pub title: String,
    pub category: Option<String>,
    pub limit: usize,
    pub lang: Option<String>,
    pub slider: bool,
    pub articles: Vec<ArticleSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BannerBlock {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub style: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Block {
    Hero(HeroBlock),
    Text(TextBlock),
    Image(ImageBlock),
    Cta(CtaBlock),
    Faq(FaqBlock),
    Html(HtmlBlock),
    ArticleList(ArticleListBlock),
    Banner(BannerBlock),
    Empty,
}

impl Block {
    pub fn is_empty(&self) -> bool {
        matches!(self, Block::Empty)
    }

    pub fn section_type(&self) -> Option<SectionType> {
        match self {
            Block::Hero(_) => Some(SectionType::Hero),
            Block::Text(_) => Some(SectionType::Text),
            Block::Image(_) => Some(SectionType::Image),
            Block::Cta(_) => Some(SectionType::Cta),
            Block::Faq(_) => Some(SectionType::Faq),
            Block::Html(_) => Some(SectionType::Html),
            Block::ArticleList(list) if list.slider => Some(SectionType::Slider),
            Block::ArticleList(_) => Some(SectionType::ArticleList),
            Block::Banner(_) => Some(SectionType::Banner),
            Block::Empty => None,
        }
    }
}
