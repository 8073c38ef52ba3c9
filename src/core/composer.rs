use crate::core::registry::SectionRegistry;
use crate::domain::model::{Page, Section};
use crate::domain::section::Block;
use serde::Serialize;

/// 已渲染的區塊，保留來源 section 的 id 與排序鍵
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedSection {
    pub section_id: String,
    pub section_type: String,
    pub order: i64,
    pub block: Block,
}

pub struct PageComposer<'r> {
    registry: &'r SectionRegistry,
}

impl PageComposer<'static> {
    pub fn new() -> Self {
        Self {
            registry: SectionRegistry::global(),
        }
    }
}

impl Default for PageComposer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> PageComposer<'r> {
    pub fn with_registry(registry: &'r SectionRegistry) -> Self {
        Self { registry }
    }

    /// 依 `order` 穩定排序，真正的渲染延到 [`Composition::iter`]
    pub fn compose<'p>(&self, page: &'p Page) -> Composition<'p, 'r> {
        let mut ordered: Vec<&'p Section> = page.sections.iter().collect();
        // sort_by_key 是穩定排序，相同 order 保留原本順序
        ordered.sort_by_key(|section| section.order);

        tracing::debug!(
            "🧩 Composing page '{}' with {} sections",
            page.slug,
            ordered.len()
        );

        Composition {
            page_slug: &page.slug,
            ordered,
            registry: self.registry,
        }
    }

    pub fn render_section(&self, section: &Section) -> Block {
        render_with(self.registry, "", section)
    }
}

/// 使用全域 registry 的 `compose`
pub fn compose(page: &Page) -> Composition<'_, 'static> {
    PageComposer::new().compose(page)
}

/// 頁面區塊的延遲渲染視圖，可以重複迭代
#[derive(Debug, Clone)]
pub struct Composition<'p, 'r> {
    page_slug: &'p str,
    ordered: Vec<&'p Section>,
    registry: &'r SectionRegistry,
}

impl<'p, 'r> Composition<'p, 'r> {
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// 每次呼叫都重新渲染，不做快取
    pub fn iter(&self) -> RenderedSections<'_, 'p, 'r> {
        RenderedSections {
            inner: self.ordered.iter(),
            page_slug: self.page_slug,
            registry: self.registry,
        }
    }

    pub fn blocks(&self) -> Vec<Block> {
        self.iter().map(|rendered| rendered.block).collect()
    }

    pub fn render(&self) -> Vec<RenderedSection> {
        self.iter().collect()
    }
}

pub struct RenderedSections<'c, 'p, 'r> {
    inner: std::slice::Iter<'c, &'p Section>,
    page_slug: &'p str,
    registry: &'r SectionRegistry,
}

impl Iterator for RenderedSections<'_, '_, '_> {
    type Item = RenderedSection;

    fn next(&mut self) -> Option<Self::Item> {
        let section = self.inner.next()?;
        Some(RenderedSection {
            section_id: section.id.clone(),
            section_type: section.section_type.clone(),
            order: section.order,
            block: render_with(self.registry, self.page_slug, section),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for RenderedSections<'_, '_, '_> {}

fn render_with(registry: &SectionRegistry, page_slug: &str, section: &Section) -> Block {
    if !section.is_active {
        tracing::debug!(
            "⏭️ Section {} on '{}' is inactive, rendering nothing",
            section.id,
            page_slug
        );
        return Block::Empty;
    }

    if !registry.is_registered(&section.section_type) {
        tracing::debug!(
            "❓ Unknown section type '{}' (section {}) on '{}'",
            section.section_type,
            section.id,
            page_slug
        );
    }

    let renderer = registry.resolve(&section.section_type);
    match renderer(&section.content) {
        Ok(block) => block,
        Err(e) => {
            tracing::warn!(
                "⚠️ Section {} on '{}' degraded to empty: {}",
                section.id,
                page_slug,
                e
            );
            Block::Empty
        }
    }
}
