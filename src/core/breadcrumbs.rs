use crate::domain::model::{Category, Post};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub label: String,
    /// 最後一節（目前頁面）沒有連結
    pub href: Option<String>,
}

impl Breadcrumb {
    fn link(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: Some(href.into()),
        }
    }

    fn current(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: None,
        }
    }
}

fn home() -> Breadcrumb {
    Breadcrumb::link("Home", "/")
}

/// 例如 `about/our-team` 得到 Home / About / Our team
pub fn for_slug(slug: &str) -> Vec<Breadcrumb> {
    let parts: Vec<&str> = slug.split('/').filter(|part| !part.is_empty()).collect();
    let mut crumbs = vec![home()];

    for (index, part) in parts.iter().enumerate() {
        let label = humanize(part);
        if index == parts.len() - 1 {
            crumbs.push(Breadcrumb::current(label));
        } else {
            crumbs.push(Breadcrumb::link(label, format!("/{}", parts[..=index].join("/"))));
        }
    }

    crumbs
}

pub fn for_post(post: &Post) -> Vec<Breadcrumb> {
    let mut crumbs = vec![home()];
    if let Some(category) = &post.category {
        crumbs.push(Breadcrumb::link(
            category.name.clone(),
            format!("/category/{}", category.slug),
        ));
    }
    crumbs.push(Breadcrumb::current(post.title.clone()));
    crumbs
}

pub fn for_category(category: &Category) -> Vec<Breadcrumb> {
    vec![home(), Breadcrumb::current(category.name.clone())]
}

fn humanize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => {
            let rest: String = chars.collect();
            format!("{}{}", first.to_uppercase(), rest.replace('-', " "))
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_slug() {
        let crumbs = for_slug("about/our-team");
        assert_eq!(
            crumbs,
            vec![
                Breadcrumb::link("Home", "/"),
                Breadcrumb::link("About", "/about"),
                Breadcrumb::current("Our team"),
            ]
        );
    }

    #[test]
    fn test_single_and_empty_slug() {
        assert_eq!(
            for_slug("contact-us"),
            vec![Breadcrumb::link("Home", "/"), Breadcrumb::current("Contact us")]
        );
        assert_eq!(for_slug(""), vec![Breadcrumb::link("Home", "/")]);
        assert_eq!(for_slug("/a//b/").len(), 3);
    }

    #[test]
    fn test_post_with_category() {
        let post: Post = serde_json::from_value(serde_json::json!({
            "id": "1", "title": "Budget passed", "slug": "budget-passed",
            "category": {"id": "c", "name": "Politics", "slug": "politics"}
        }))
        .unwrap();

        let crumbs = for_post(&post);
        assert_eq!(crumbs[1], Breadcrumb::link("Politics", "/category/politics"));
        assert_eq!(crumbs[2], Breadcrumb::current("Budget passed"));
    }
}
