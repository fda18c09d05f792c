//! Retained SVG element tree.

use crate::Viewport;
use chordgram_layout::path::js_number;
use indexmap::IndexMap;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// One SVG element. Attributes keep insertion order so serialization is stable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    name: String,
    attrs: IndexMap<String, String>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
    }

    pub fn remove_attr(&mut self, key: &str) -> Option<String> {
        self.attrs.shift_remove(key)
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn append(&mut self, child: Element) -> &mut Element {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Depth-first, pre-order walk over all descendants (not including `self`).
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    pub fn select_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.descendants().filter(move |e| e.name == name)
    }

    pub fn write_svg(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (k, v) in &self.attrs {
            out.push(' ');
            out.push_str(k);
            out.push_str("=\"");
            escape_xml_into(out, v);
            out.push('"');
        }
        if self.children.is_empty() && self.text.is_none() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if let Some(text) = &self.text {
            escape_xml_into(out, text);
        }
        for child in &self.children {
            child.write_svg(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<&'a Element> {
        let e = self.stack.pop()?;
        self.stack.extend(e.children.iter().rev());
        Some(e)
    }
}

/// The persistent drawing surface: an `<svg>` root sized to the viewport and centered on the
/// origin. Its children are replaced wholesale on every diagram update; the root itself lives as
/// long as the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    root: Element,
}

impl Surface {
    pub fn new(viewport: Viewport, font: &str) -> Self {
        let (w, h) = (viewport.width, viewport.height);
        let view_box = [-w / 2.0, -h / 2.0, w, h]
            .iter()
            .map(|v| js_number(*v))
            .collect::<Vec<_>>()
            .join(",");
        let root = Element::new("svg")
            .with_attr("xmlns", SVG_NS)
            .with_attr("width", js_number(w))
            .with_attr("height", js_number(h))
            .with_attr("viewBox", view_box)
            .with_attr(
                "style",
                format!("max-width: 100%; height: auto; font: {font};"),
            );
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Sets (or with `None`, removes) the root `id` attribute.
    pub fn set_id(&mut self, id: Option<&str>) {
        match id {
            Some(id) => self.root.set_attr("id", id),
            None => {
                self.root.remove_attr("id");
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    pub fn clear(&mut self) {
        self.root.children.clear();
    }

    pub fn append(&mut self, child: Element) -> &mut Element {
        self.root.append(child)
    }

    /// Swaps in a complete set of children.
    pub fn replace_children(&mut self, children: Vec<Element>) {
        self.root.children = children;
    }

    pub fn select_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.root.select_all(name)
    }

    pub fn count(&self, name: &str) -> usize {
        self.select_all(name).count()
    }

    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        self.root.write_svg(&mut out);
        out
    }
}

fn escape_xml_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}
