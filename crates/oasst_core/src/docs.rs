//! Documentation index: sidebar tree plus flat document map.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SidebarItem {
    Link {
        label: String,
        href: String,
        #[serde(rename = "docId", default, skip_serializing_if = "Option::is_none")]
        doc_id: Option<String>,
    },
    Category {
        label: String,
        #[serde(default)]
        items: Vec<SidebarItem>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        href: Option<String>,
        #[serde(default)]
        collapsed: bool,
        #[serde(default)]
        collapsible: bool,
    },
}

impl SidebarItem {
    pub fn label(&self) -> &str {
        match self {
            SidebarItem::Link { label, .. } | SidebarItem::Category { label, .. } => label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sidebar: Option<String>,
}

/// A link reached while walking the sidebar, with the categories above it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarLink<'a> {
    pub label: &'a str,
    pub href: &'a str,
    pub doc_id: Option<&'a str>,
    pub categories: Vec<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocsIndex {
    #[serde(rename = "pluginId", default)]
    pub plugin_id: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "docsSidebars", default)]
    pub docs_sidebars: BTreeMap<String, Vec<SidebarItem>>,
    #[serde(default)]
    pub docs: BTreeMap<String, DocEntry>,
}

impl DocsIndex {
    pub fn sidebar(&self, name: &str) -> Option<&[SidebarItem]> {
        self.docs_sidebars.get(name).map(Vec::as_slice)
    }

    pub fn doc(&self, id: &str) -> Option<&DocEntry> {
        self.docs.get(id)
    }

    /// Every link of a sidebar in display order.
    pub fn links<'a>(&'a self, sidebar: &str) -> Vec<SidebarLink<'a>> {
        let mut links = Vec::new();
        if let Some(items) = self.docs_sidebars.get(sidebar) {
            collect_links(items, &mut Vec::new(), &mut links);
        }
        links
    }

    /// Category labels leading to the first link of `doc_id` in its sidebar.
    pub fn breadcrumb(&self, doc_id: &str) -> Option<Vec<&str>> {
        let sidebar = self.doc(doc_id)?.sidebar.as_deref()?;
        self.links(sidebar)
            .into_iter()
            .find(|link| link.doc_id == Some(doc_id))
            .map(|link| link.categories)
    }
}

fn collect_links<'a>(
    items: &'a [SidebarItem],
    path: &mut Vec<&'a str>,
    out: &mut Vec<SidebarLink<'a>>,
) {
    for item in items {
        match item {
            SidebarItem::Link {
                label,
                href,
                doc_id,
            } => out.push(SidebarLink {
                label,
                href,
                doc_id: doc_id.as_deref(),
                categories: path.clone(),
            }),
            SidebarItem::Category { label, items, .. } => {
                path.push(label);
                collect_links(items, path, out);
                path.pop();
            }
        }
    }
}
