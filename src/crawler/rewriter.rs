//! Structural HTML edits applied to every archived page
//!
//! The edits are an ordered list of named rules run against the parsed tree.
//! Every rule is idempotent, so rewriting an already-archived page yields the
//! same document again.

use crate::config::RewriteConfig;
use crate::url::rewrite_tagcloud;
use crate::ArchiveError;
use ego_tree::{NodeId, NodeRef, Tree};
use scraper::{Html, Node, Selector};

/// One structural edit
#[derive(Debug, Clone)]
pub enum RewriteRule {
    /// Drops every `container` whose first `heading` descendant has exactly `text`
    RemoveWhereHeading {
        name: &'static str,
        container: Selector,
        heading: Selector,
        text: String,
    },

    /// Drops every element matching `target`
    Remove {
        name: &'static str,
        target: Selector,
    },

    /// Replaces the first `target` with `markup`, or inserts `markup` before
    /// the first `anchor` when no target exists
    ReplaceOrInsert {
        name: &'static str,
        target: Selector,
        anchor: Selector,
        markup: String,
    },
}

impl RewriteRule {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RemoveWhereHeading { name, .. } => name,
            Self::Remove { name, .. } => name,
            Self::ReplaceOrInsert { name, .. } => name,
        }
    }

    /// Applies the rule, returning true if the tree changed
    pub fn apply(&self, document: &mut Html) -> bool {
        match self {
            Self::RemoveWhereHeading {
                container,
                heading,
                text,
                ..
            } => {
                let ids: Vec<NodeId> = document
                    .select(container)
                    .filter(|element| {
                        element
                            .select(heading)
                            .next()
                            .map(|h| h.text().collect::<String>() == *text)
                            .unwrap_or(false)
                    })
                    .map(|element| element.id())
                    .collect();
                detach_all(&mut document.tree, &ids)
            }

            Self::Remove { target, .. } => {
                let ids: Vec<NodeId> = document.select(target).map(|e| e.id()).collect();
                detach_all(&mut document.tree, &ids)
            }

            Self::ReplaceOrInsert {
                target,
                anchor,
                markup,
                ..
            } => {
                let fragment = Html::parse_fragment(markup);
                let fragment_root = fragment.root_element();

                if let Some(existing) = document.select(target).next().map(|e| e.id()) {
                    // Only the element: the separator text after an earlier insert stays put
                    for child in fragment_root.children().filter(|c| c.value().is_element()) {
                        graft_before(&mut document.tree, existing, child);
                    }
                    return detach_all(&mut document.tree, &[existing]);
                }

                let Some(anchor) = document.select(anchor).next().map(|e| e.id()) else {
                    return false;
                };
                for child in fragment_root.children() {
                    graft_before(&mut document.tree, anchor, child);
                }
                true
            }
        }
    }
}

/// The configured rule list and the serializer around it
#[derive(Debug, Clone)]
pub struct PageRewriter {
    rules: Vec<RewriteRule>,
}

impl PageRewriter {
    /// Builds the fixed rule sequence from the rewrite settings
    ///
    /// 1. drop the ranking widget
    /// 2. drop the mobile-view list item
    /// 3. replace or insert the archive notice banner
    pub fn from_config(config: &RewriteConfig) -> Result<Self, ArchiveError> {
        let rules = vec![
            RewriteRule::RemoveWhereHeading {
                name: "ranking-widget",
                container: selector("div.widget")?,
                heading: selector("h3")?,
                text: config.ranking_widget_heading.clone(),
            },
            RewriteRule::Remove {
                name: "mobile-view-item",
                target: selector(&format!("li[id=\"{}\"]", config.mobile_view_item_id))?,
            },
            RewriteRule::ReplaceOrInsert {
                name: "archive-banner",
                target: selector(&format!("div[id=\"{}\"]", config.banner_id))?,
                anchor: selector(&format!("div[id=\"{}\"]", config.banner_anchor_id))?,
                markup: banner_markup(&config.banner_id, &config.archive_notice),
            },
        ];

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    /// Runs every rule in order against the parsed document
    pub fn apply(&self, document: &mut Html) {
        for rule in &self.rules {
            if rule.apply(document) {
                tracing::trace!("Rewrite rule {} changed the document", rule.name());
            }
        }
    }

    /// Serializes an edited document, mapping tag links onto their path form
    pub fn serialize(&self, document: &Html) -> String {
        rewrite_tagcloud(&document.html())
    }

    /// Parses, rewrites and serializes a page in one go
    pub fn rewrite(&self, html: &str) -> String {
        let mut document = Html::parse_document(html);
        self.apply(&mut document);
        self.serialize(&document)
    }
}

fn banner_markup(banner_id: &str, notice: &str) -> String {
    format!(
        "<div id=\"{}\"><span class=\"da-fg da-gray\"><span class=\"da-bg da-yellow\">{}</span></span></div>\n",
        banner_id, notice
    )
}

fn selector(css: &str) -> Result<Selector, ArchiveError> {
    Selector::parse(css)
        .map_err(|e| ArchiveError::Rewrite(format!("invalid selector '{}': {:?}", css, e)))
}

fn detach_all(tree: &mut Tree<Node>, ids: &[NodeId]) -> bool {
    let mut changed = false;
    for id in ids {
        if let Some(mut node) = tree.get_mut(*id) {
            node.detach();
            changed = true;
        }
    }
    changed
}

/// Deep-copies `source` from another tree in front of `target`
fn graft_before(tree: &mut Tree<Node>, target: NodeId, source: NodeRef<'_, Node>) {
    let Some(mut target) = tree.get_mut(target) else {
        return;
    };
    let copy = target.insert_before(source.value().clone()).id();
    append_children(tree, copy, source);
}

fn append_children(tree: &mut Tree<Node>, parent: NodeId, source: NodeRef<'_, Node>) {
    for child in source.children() {
        let Some(mut parent_node) = tree.get_mut(parent) else {
            return;
        };
        let copy = parent_node.append(child.value().clone()).id();
        append_children(tree, copy, child);
    }
}
