//! Page access for the trigger registry.
//!
//! [`Markup`] is the seam between the engine-agnostic core and whatever hosts
//! the page: the wasm adapter implements it over the live DOM, tests and
//! server-side tooling use [`StaticMarkup`], an in-memory element tree.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Rect, Viewport};
use crate::ids::ElementId;

/// Read-only view of the rendered page.
pub trait Markup {
    /// All elements carrying `attribute`, in document order.
    fn select_all(&self, attribute: &str) -> Vec<ElementId>;
    /// First descendant of `root` carrying `attribute`.
    fn select_within(&self, root: ElementId, attribute: &str) -> Option<ElementId>;
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;
    fn children(&self, element: ElementId) -> Vec<ElementId>;
    fn parent(&self, element: ElementId) -> Option<ElementId>;
    /// Untransformed layout box in document space.
    fn measure(&self, element: ElementId) -> Option<Rect>;
    fn viewport(&self) -> Viewport;
}

#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("markup json parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Serialized element tree used by fixtures.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MarkupNode {
    #[serde(default)]
    pub attrs: std::collections::BTreeMap<String, String>,
    #[serde(default)]
    pub rect: Rect,
    #[serde(default)]
    pub children: Vec<MarkupNode>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MarkupDocument {
    pub viewport: Viewport,
    #[serde(default)]
    pub elements: Vec<MarkupNode>,
}

#[derive(Debug, Clone)]
struct StaticNode {
    attrs: HashMap<String, String>,
    rect: Rect,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

/// In-memory element tree.
#[derive(Debug, Clone, Default)]
pub struct StaticMarkup {
    viewport: Viewport,
    nodes: Vec<StaticNode>,
    roots: Vec<ElementId>,
}

impl StaticMarkup {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    pub fn from_document(doc: &MarkupDocument) -> Self {
        let mut markup = Self::new(doc.viewport);
        for node in &doc.elements {
            markup.push_tree(None, node);
        }
        markup
    }

    pub fn from_json(json: &str) -> Result<Self, MarkupError> {
        let doc: MarkupDocument = serde_json::from_str(json)?;
        Ok(Self::from_document(&doc))
    }

    fn push_tree(&mut self, parent: Option<ElementId>, node: &MarkupNode) -> ElementId {
        let attrs: Vec<(&str, &str)> = node
            .attrs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let id = self.push(parent, &attrs, node.rect);
        for child in &node.children {
            self.push_tree(Some(id), child);
        }
        id
    }

    /// Append an element as the last child of `parent` (or as a new root).
    pub fn push(
        &mut self,
        parent: Option<ElementId>,
        attrs: &[(&str, &str)],
        rect: Rect,
    ) -> ElementId {
        let id = ElementId(self.nodes.len() as u32);
        self.nodes.push(StaticNode {
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            rect,
            parent,
            children: Vec::new(),
        });
        match parent.and_then(|p| self.nodes.get_mut(p.0 as usize)) {
            Some(p) => p.children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn set_rect(&mut self, element: ElementId, rect: Rect) {
        if let Some(node) = self.nodes.get_mut(element.0 as usize) {
            node.rect = rect;
        }
    }

    pub fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(element.0 as usize) {
            node.attrs.insert(name.to_string(), value.to_string());
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, element: ElementId) -> Option<&StaticNode> {
        self.nodes.get(element.0 as usize)
    }

    /// Pre-order walk from `start`, stopping early when `visit` returns true.
    fn walk(&self, start: &[ElementId], visit: &mut dyn FnMut(ElementId) -> bool) -> bool {
        for &id in start {
            if visit(id) {
                return true;
            }
            if let Some(node) = self.node(id) {
                if self.walk(&node.children, visit) {
                    return true;
                }
            }
        }
        false
    }
}

impl Markup for StaticMarkup {
    fn select_all(&self, attribute: &str) -> Vec<ElementId> {
        let mut found = Vec::new();
        self.walk(&self.roots, &mut |id| {
            if self
                .node(id)
                .is_some_and(|n| n.attrs.contains_key(attribute))
            {
                found.push(id);
            }
            false
        });
        found
    }

    fn select_within(&self, root: ElementId, attribute: &str) -> Option<ElementId> {
        let children = self.node(root)?.children.clone();
        let mut found = None;
        self.walk(&children, &mut |id| {
            if self
                .node(id)
                .is_some_and(|n| n.attrs.contains_key(attribute))
            {
                found = Some(id);
                return true;
            }
            false
        });
        found
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.node(element)?.attrs.get(name).cloned()
    }

    fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.node(element)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.node(element)?.parent
    }

    fn measure(&self, element: ElementId) -> Option<Rect> {
        self.node(element).map(|n| n.rect)
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport {
            width: 1280.0,
            height: 1000.0,
            document_height: 4000.0,
        }
    }

    #[test]
    fn select_all_is_document_order() {
        let mut m = StaticMarkup::new(viewport());
        let a = m.push(None, &[("data-x", "")], Rect::new(0.0, 10.0));
        let b = m.push(None, &[], Rect::new(10.0, 10.0));
        let c = m.push(Some(a), &[("data-x", "")], Rect::new(0.0, 5.0));
        let d = m.push(Some(b), &[("data-x", "")], Rect::new(10.0, 5.0));
        assert_eq!(m.select_all("data-x"), vec![a, c, d]);
        assert_eq!(m.parent(c), Some(a));
        assert_eq!(m.children(b), vec![d]);
    }

    #[test]
    fn select_within_skips_root_itself() {
        let mut m = StaticMarkup::new(viewport());
        let root = m.push(None, &[("data-hero", "")], Rect::default());
        let wrapper = m.push(Some(root), &[], Rect::default());
        let title = m.push(Some(wrapper), &[("data-hero-title", "")], Rect::default());
        assert_eq!(m.select_within(root, "data-hero-title"), Some(title));
        assert_eq!(m.select_within(root, "data-hero"), None);
    }

    #[test]
    fn parses_nested_json() {
        let json = r#"{
            "viewport": { "width": 800, "height": 600, "document_height": 2400 },
            "elements": [
                { "attrs": { "data-stagger": "0.2" }, "rect": { "top": 900, "height": 300 },
                  "children": [ { "rect": { "top": 900, "height": 100 } },
                                { "rect": { "top": 1000, "height": 100 } } ] }
            ]
        }"#;
        let m = StaticMarkup::from_json(json).unwrap();
        let containers = m.select_all("data-stagger");
        assert_eq!(containers.len(), 1);
        assert_eq!(m.children(containers[0]).len(), 2);
        assert_eq!(m.attribute(containers[0], "data-stagger").as_deref(), Some("0.2"));
        assert_eq!(m.viewport().scroll_limit(), 1800.0);
    }
}
