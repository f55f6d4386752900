//! Live-DOM implementation of [`Markup`] and the per-frame style writer.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

use canopy_motion_core::property::transform_css;
use canopy_motion_core::{ElementId, Markup, Property, Rect, StyleChange, Viewport};

/// Hands out stable [`ElementId`]s for DOM elements the core asks about.
pub struct DomMarkup {
    window: Window,
    document: Document,
    elements: RefCell<Vec<Element>>,
}

impl DomMarkup {
    pub fn new(window: Window, document: Document) -> Self {
        Self {
            window,
            document,
            elements: RefCell::new(Vec::new()),
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn intern(&self, element: Element) -> ElementId {
        let mut elements = self.elements.borrow_mut();
        if let Some(index) = elements.iter().position(|e| *e == element) {
            return ElementId(index as u32);
        }
        elements.push(element);
        ElementId((elements.len() - 1) as u32)
    }

    pub fn element(&self, id: ElementId) -> Option<Element> {
        self.elements.borrow().get(id.0 as usize).cloned()
    }

    /// Forget interned elements. Only valid once nothing holds their ids.
    pub fn clear(&self) {
        self.elements.borrow_mut().clear();
    }

    pub fn query(&self, selector: &str) -> Option<ElementId> {
        match self.document.query_selector(selector) {
            Ok(found) => found.map(|el| self.intern(el)),
            Err(err) => {
                log::warn!("invalid selector `{selector}`: {err:?}");
                None
            }
        }
    }
}

impl std::fmt::Debug for DomMarkup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomMarkup")
            .field("interned", &self.elements.borrow().len())
            .finish()
    }
}

fn attribute_selector(attribute: &str) -> String {
    format!("[{attribute}]")
}

impl Markup for DomMarkup {
    fn select_all(&self, attribute: &str) -> Vec<ElementId> {
        let Ok(list) = self.document.query_selector_all(&attribute_selector(attribute)) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|el| self.intern(el))
            .collect()
    }

    fn select_within(&self, root: ElementId, attribute: &str) -> Option<ElementId> {
        let root = self.element(root)?;
        let found = root.query_selector(&attribute_selector(attribute)).ok()??;
        Some(self.intern(found))
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.element(element)?.get_attribute(name)
    }

    fn children(&self, element: ElementId) -> Vec<ElementId> {
        let Some(el) = self.element(element) else {
            return Vec::new();
        };
        let children = el.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .map(|child| self.intern(child))
            .collect()
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        let parent = self.element(element)?.parent_element()?;
        Some(self.intern(parent))
    }

    /// Offset-parent chain, so transforms written by the engine do not feed
    /// back into trigger boundaries.
    fn measure(&self, element: ElementId) -> Option<Rect> {
        let el = self.element(element)?;
        match el.dyn_ref::<HtmlElement>() {
            Some(html) => {
                let mut top = 0.0f64;
                let mut current = Some(html.clone());
                while let Some(node) = current {
                    top += f64::from(node.offset_top());
                    current = node
                        .offset_parent()
                        .and_then(|p| p.dyn_into::<HtmlElement>().ok());
                }
                Some(Rect::new(top as f32, html.offset_height() as f32))
            }
            None => {
                let rect = el.get_bounding_client_rect();
                let scroll = self.window.scroll_y().unwrap_or(0.0);
                Some(Rect::new((rect.top() + scroll) as f32, rect.height() as f32))
            }
        }
    }

    fn viewport(&self) -> Viewport {
        let dimension = |v: Result<wasm_bindgen::JsValue, _>| {
            v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
        };
        let document_height = self
            .document
            .document_element()
            .map(|root| root.scroll_height() as f32)
            .unwrap_or(0.0);
        Viewport {
            width: dimension(self.window.inner_width()),
            height: dimension(self.window.inner_height()),
            document_height,
        }
    }
}

/// Write this frame's changes to inline styles.
pub fn apply_changes(markup: &DomMarkup, changes: &[StyleChange]) {
    for change in changes {
        let Some(el) = markup.element(change.element) else {
            continue;
        };
        let Some(html) = el.dyn_ref::<HtmlElement>() else {
            continue;
        };
        let style = html.style();
        if let Some(opacity) = change.values.get(&Property::Opacity) {
            let _ = style.set_property("opacity", &opacity.to_string());
        }
        if let Some(transform) = transform_css(&change.values) {
            let _ = style.set_property("transform", &transform);
        }
    }
}
