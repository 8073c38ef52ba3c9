use crate::domain::model::{Menu, MenuItem};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavLink {
    pub id: String,
    pub label: String,
    pub url: String,
    pub children: Vec<NavLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavTree {
    pub name: String,
    pub location: String,
    pub links: Vec<NavLink>,
}

struct FlatItem<'a> {
    item: &'a MenuItem,
    parent: Option<String>,
}

impl NavTree {
    /// 項目可能是平面的（靠 `parent_id` 連結）或已經巢狀在 `children` 裡，
    /// 兩種形狀會得到相同的樹
    pub fn from_menu(menu: &Menu) -> Self {
        let mut flat: Vec<FlatItem<'_>> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        flatten(&menu.items, None, &mut flat, &mut seen);

        let known: HashSet<&str> = flat.iter().map(|f| f.item.id.as_str()).collect();
        let mut by_parent: HashMap<Option<&str>, Vec<&FlatItem<'_>>> = HashMap::new();
        for entry in &flat {
            // 找不到父節點的項目當成根節點
            let parent = entry
                .parent
                .as_deref()
                .filter(|parent| known.contains(parent) && *parent != entry.item.id);
            by_parent.entry(parent).or_default().push(entry);
        }

        let mut attached: HashSet<&str> = HashSet::new();
        let mut links = build_level(None, &by_parent, &mut attached);

        // 形成環的項目沒有根可以掛，補在最後
        for entry in &flat {
            let id = entry.item.id.as_str();
            if attached.insert(id) {
                links.push(NavLink {
                    id: entry.item.id.clone(),
                    label: entry.item.label.clone(),
                    url: entry.item.url.clone(),
                    children: build_level(Some(id), &by_parent, &mut attached),
                });
            }
        }

        Self {
            name: menu.name.clone(),
            location: menu.location.clone(),
            links,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

fn flatten<'a>(
    items: &'a [MenuItem],
    container: Option<&str>,
    flat: &mut Vec<FlatItem<'a>>,
    seen: &mut HashSet<&'a str>,
) {
    for item in items {
        if seen.insert(item.id.as_str()) {
            let parent = item
                .parent_id
                .clone()
                .or_else(|| container.map(str::to_string));
            flat.push(FlatItem { item, parent });
        }
        flatten(&item.children, Some(item.id.as_str()), flat, seen);
    }
}

fn build_level<'a>(
    parent: Option<&'a str>,
    by_parent: &HashMap<Option<&'a str>, Vec<&'a FlatItem<'a>>>,
    attached: &mut HashSet<&'a str>,
) -> Vec<NavLink> {
    let Some(entries) = by_parent.get(&parent) else {
        return Vec::new();
    };

    let mut siblings: Vec<&&FlatItem<'_>> = entries.iter().collect();
    siblings.sort_by_key(|entry| entry.item.order);

    let mut links = Vec::with_capacity(siblings.len());
    for entry in siblings {
        let id = entry.item.id.as_str();
        if !attached.insert(id) {
            continue;
        }
        links.push(NavLink {
            id: entry.item.id.clone(),
            label: entry.item.label.clone(),
            url: entry.item.url.clone(),
            children: build_level(Some(id), by_parent, attached),
        });
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn menu(items: serde_json::Value) -> Menu {
        serde_json::from_value(json!({
            "id": "m1", "name": "Main", "location": "navbar", "items": items
        }))
        .unwrap()
    }

    fn labels(links: &[NavLink]) -> Vec<&str> {
        links.iter().map(|l| l.label.as_str()).collect()
    }

    #[test]
    fn test_flat_items_with_parent_ids() {
        let tree = NavTree::from_menu(&menu(json!([
            {"id": "3", "label": "Sports", "url": "/sports", "order": 2},
            {"id": "1", "label": "Home", "url": "/", "order": 0},
            {"id": "4", "label": "Cricket", "url": "/sports/cricket", "order": 1, "parentId": "3"},
            {"id": "5", "label": "Football", "url": "/sports/football", "order": 0, "parentId": "3"},
            {"id": "2", "label": "World", "url": "/world", "order": 1}
        ])));

        assert_eq!(labels(&tree.links), vec!["Home", "World", "Sports"]);
        assert_eq!(labels(&tree.links[2].children), vec!["Football", "Cricket"]);
        assert_eq!(tree.location, "navbar");
    }

    #[test]
    fn test_nested_items_and_duplicates() {
        let tree = NavTree::from_menu(&menu(json!([
            {"id": "1", "label": "News", "url": "/news", "order": 0, "children": [
                {"id": "2", "label": "Local", "url": "/news/local", "order": 1},
                {"id": "3", "label": "National", "url": "/news/national", "order": 0}
            ]},
            {"id": "2", "label": "Local", "url": "/news/local", "order": 1, "parentId": "1"}
        ])));

        assert_eq!(labels(&tree.links), vec!["News"]);
        assert_eq!(labels(&tree.links[0].children), vec!["National", "Local"]);
    }

    #[test]
    fn test_orphans_and_cycles_become_roots() {
        let tree = NavTree::from_menu(&menu(json!([
            {"id": "1", "label": "Orphan", "url": "/o", "order": 0, "parentId": "missing"},
            {"id": "2", "label": "A", "url": "/a", "order": 1, "parentId": "3"},
            {"id": "3", "label": "B", "url": "/b", "order": 2, "parentId": "2"}
        ])));

        assert_eq!(labels(&tree.links), vec!["Orphan", "A"]);
        assert_eq!(labels(&tree.links[1].children), vec!["B"]);
        assert!(tree.links[1].children[0].children.is_empty());
    }

    #[test]
    fn test_empty_menu() {
        let tree = NavTree::from_menu(&menu(json!(null)));
        assert!(tree.is_empty());
    }
}
