use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a node for as long as it stays in the tree
///
/// Every constructed element gets a fresh id, so a replacement node never
/// shares identity (or listeners) with the node it replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Click handler attached to an element
pub type Listener = Arc<dyn Fn(&mut ClickEvent) + Send + Sync>;

/// A click delivered to an element's listeners
#[derive(Debug, Clone)]
pub struct ClickEvent {
    target: NodeId,
    default_prevented: bool,
}

impl ClickEvent {
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Stop the control's default navigation
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// A node of the page
pub struct Element {
    node_id: NodeId,
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    children: Vec<Element>,
    listeners: Vec<(&'static str, Listener)>,
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("node_id", &self.node_id)
            .field("tag", &self.tag)
            .field("id", &self.id)
            .field("classes", &self.classes)
            .field("attributes", &self.attributes)
            .field("text", &self.text)
            .field("children", &self.children)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            node_id: NodeId::next(),
            tag: tag.to_string(),
            id: None,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            text: None,
            children: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
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

    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    /// Returns whether the class was present
    pub fn remove_class(&mut self, class: &str) -> bool {
        let before = self.classes.len();
        self.classes.retain(|c| c != class);
        self.classes.len() != before
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Own text followed by the text of all descendants, space separated
    pub fn text_content(&self) -> String {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts.join(" ")
    }

    fn collect_text<'a>(&'a self, parts: &mut Vec<&'a str>) {
        if let Some(text) = self.text.as_deref() {
            let text = text.trim();
            if !text.is_empty() {
                parts.push(text);
            }
        }
        for child in &self.children {
            child.collect_text(parts);
        }
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Drop the current children (and their listeners) and mount new ones
    pub fn replace_children(&mut self, children: Vec<Element>) {
        self.children = children;
    }

    /// Attach a listener under `key` unless one with that key is already attached
    ///
    /// Returns `false` when the element already had a listener for `key`.
    pub fn add_listener(&mut self, key: &'static str, listener: Listener) -> bool {
        if self.has_listener(key) {
            return false;
        }
        self.listeners.push((key, listener));
        true
    }

    pub fn has_listener(&self, key: &str) -> bool {
        self.listeners.iter().any(|(k, _)| *k == key)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Depth-first search including `self`
    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(pred))
    }

    pub fn find_mut(&mut self, pred: &dyn Fn(&Element) -> bool) -> Option<&mut Element> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(pred))
    }

    /// All matching nodes in document order, including `self`
    pub fn find_all<'a>(&'a self, pred: &dyn Fn(&Element) -> bool, out: &mut Vec<&'a Element>) {
        if pred(self) {
            out.push(self);
        }
        for child in &self.children {
            child.find_all(pred, out);
        }
    }

    /// Detach the descendant with the given node id
    pub fn remove_descendant(&mut self, node: NodeId) -> Option<Element> {
        if let Some(pos) = self.children.iter().position(|c| c.node_id == node) {
            return Some(self.children.remove(pos));
        }
        self.children
            .iter_mut()
            .find_map(|child| child.remove_descendant(node))
    }
}

/// The page: a single tree rooted at `<body>`
#[derive(Debug)]
pub struct Document {
    body: Element,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            body: Element::new("body"),
        }
    }

    pub fn with_body(children: impl IntoIterator<Item = Element>) -> Self {
        Self {
            body: Element::new("body").with_children(children),
        }
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Element {
        &mut self.body
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<&Element> {
        self.body.find(&|el: &Element| el.id() == Some(id))
    }

    pub fn get_element_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.body.find_mut(&|el: &Element| el.id() == Some(id))
    }

    pub fn get_element(&self, node: NodeId) -> Option<&Element> {
        self.body.find(&|el: &Element| el.node_id() == node)
    }

    pub fn get_element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.body.find_mut(&|el: &Element| el.node_id() == node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.get_element(node).is_some()
    }

    /// Node ids of all elements carrying `class`, in document order
    pub fn query_class(&self, class: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        self.body.find_all(&|el: &Element| el.has_class(class), &mut found);
        found.into_iter().map(Element::node_id).collect()
    }

    /// Detach an element from the tree; the body itself cannot be removed
    pub fn remove_element(&mut self, node: NodeId) -> Option<Element> {
        self.body.remove_descendant(node)
    }

    fn listeners(&self, node: NodeId) -> Option<Vec<Listener>> {
        self.get_element(node)
            .map(|el| el.listeners.iter().map(|(_, l)| Arc::clone(l)).collect())
    }
}

/// Handle to the page shared by the binder, the controller and the renderer
#[derive(Debug, Clone, Default)]
pub struct SharedDocument {
    inner: Arc<Mutex<Document>>,
}

impl SharedDocument {
    pub fn new(document: Document) -> Self {
        Self {
            inner: Arc::new(Mutex::new(document)),
        }
    }

    /// Lock the page; a panic in another holder does not make it unusable
    pub fn lock(&self) -> MutexGuard<'_, Document> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn read<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        f(&self.lock())
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        f(&mut self.lock())
    }

    /// Deliver a click to every listener of `node`
    ///
    /// Listeners run without the page lock held, so they are free to
    /// mutate the page. Returns `None` if the node is not in the tree.
    pub fn click(&self, node: NodeId) -> Option<ClickEvent> {
        let listeners = self.lock().listeners(node)?;
        let mut event = ClickEvent {
            target: node,
            default_prevented: false,
        };
        for listener in listeners {
            listener(&mut event);
        }
        Some(event)
    }

    pub fn click_by_id(&self, id: &str) -> Option<ClickEvent> {
        let node = self.read(|doc| doc.get_element_by_id(id).map(Element::node_id))?;
        self.click(node)
    }
}
