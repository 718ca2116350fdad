//! In-memory Document
//!
//! A flat element store with just enough DOM behavior for link interception:
//! class queries, attribute reads, click listeners with removable handles,
//! and click dispatch with the anchor default action (navigate to `href`)
//! unless a listener prevented it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use clicktrack_core::{ClickEvent, ClickEventKind, ClickTrackError, ElementId, Navigator};
use clicktrack_logging::ClickEventLogger;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Callback run for a click on the element it is bound to.
pub type ClickCallback = Arc<dyn Fn(&mut DomEvent, &Element) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

// ---------------------------------------------------------------------------
// Markup description
// ---------------------------------------------------------------------------

/// Declarative element description, used to build documents from YAML pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSpec {
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

fn default_tag() -> String {
    "a".to_string()
}

impl ElementSpec {
    /// `<a href="...">`
    pub fn anchor(href: impl Into<String>) -> Self {
        Self::new("a").attr("href", href)
    }

    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// A page: its own URL plus its elements in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub elements: Vec<ElementSpec>,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A click in flight through the listeners of its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomEvent {
    target: ElementId,
    default_prevented: bool,
}

impl DomEvent {
    pub fn click(target: ElementId) -> Self {
        Self {
            target,
            default_prevented: false,
        }
    }

    pub fn target(&self) -> ElementId {
        self.target
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

struct Listener {
    id: ListenerId,
    owner: String,
    callback: ClickCallback,
}

struct Node {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    listeners: Vec<Listener>,
}

#[derive(Default)]
struct DocumentState {
    nodes: BTreeMap<ElementId, Node>,
    next_element: u64,
    next_listener: u64,
    default_navigator: Option<Arc<dyn Navigator>>,
}

/// Shared handle to a document. Clones see the same elements and listeners.
#[derive(Clone, Default)]
pub struct Document {
    state: Arc<Mutex<DocumentState>>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("elements", &self.len())
            .finish()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_page(page: &PageSpec) -> Self {
        let document = Self::new();
        for spec in &page.elements {
            document.append(spec.clone());
        }
        document
    }

    fn lock(&self) -> MutexGuard<'_, DocumentState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Where unprevented anchor clicks navigate to.
    pub fn set_default_navigator(&self, navigator: Arc<dyn Navigator>) {
        self.lock().default_navigator = Some(navigator);
    }

    /// Append an element; attribute names are stored lowercased.
    pub fn append(&self, spec: ElementSpec) -> ElementId {
        let mut state = self.lock();
        let id = ElementId(state.next_element);
        state.next_element += 1;
        state.nodes.insert(
            id,
            Node {
                tag: spec.tag.to_ascii_lowercase(),
                classes: spec.classes,
                attributes: spec
                    .attributes
                    .into_iter()
                    .map(|(k, v)| (k.to_ascii_lowercase(), v))
                    .collect(),
                listeners: Vec::new(),
            },
        );
        id
    }

    pub fn len(&self) -> usize {
        self.lock().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn element(&self, id: ElementId) -> Option<Element> {
        self.lock().nodes.contains_key(&id).then(|| Element {
            document: self.clone(),
            id,
        })
    }

    /// Elements carrying `class`, in document order.
    pub fn elements_by_class(&self, class: &str) -> Vec<Element> {
        self.lock()
            .nodes
            .iter()
            .filter(|(_, node)| node.classes.iter().any(|c| c == class))
            .map(|(id, _)| Element {
                document: self.clone(),
                id: *id,
            })
            .collect()
    }

    pub fn set_attribute(
        &self,
        id: ElementId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), ClickTrackError> {
        let mut state = self.lock();
        let node = state
            .nodes
            .get_mut(&id)
            .ok_or(ClickTrackError::UnknownElement(id))?;
        node.attributes.insert(name.to_ascii_lowercase(), value.into());
        Ok(())
    }

    pub fn remove_attribute(&self, id: ElementId, name: &str) -> Result<(), ClickTrackError> {
        let mut state = self.lock();
        let node = state
            .nodes
            .get_mut(&id)
            .ok_or(ClickTrackError::UnknownElement(id))?;
        node.attributes.remove(&name.to_ascii_lowercase());
        Ok(())
    }

    /// Bind `callback` to clicks on `element`. `owner` tags the listener so a
    /// component can tell whether it already bound this element.
    pub fn add_click_listener<F>(
        &self,
        element: ElementId,
        owner: &str,
        callback: F,
    ) -> Result<ListenerHandle, ClickTrackError>
    where
        F: Fn(&mut DomEvent, &Element) + Send + Sync + 'static,
    {
        let mut state = self.lock();
        let id = ListenerId(state.next_listener);
        let node = state
            .nodes
            .get_mut(&element)
            .ok_or(ClickTrackError::UnknownElement(element))?;
        node.listeners.push(Listener {
            id,
            owner: owner.to_string(),
            callback: Arc::new(callback),
        });
        state.next_listener += 1;

        Ok(ListenerHandle {
            document: self.clone(),
            element,
            listener: id,
        })
    }

    pub fn has_listener(&self, element: ElementId, owner: &str) -> bool {
        self.lock()
            .nodes
            .get(&element)
            .is_some_and(|node| node.listeners.iter().any(|l| l.owner == owner))
    }

    pub fn listener_count(&self, element: ElementId) -> usize {
        self.lock()
            .nodes
            .get(&element)
            .map_or(0, |node| node.listeners.len())
    }

    fn remove_listener(&self, element: ElementId, listener: ListenerId) -> bool {
        let mut state = self.lock();
        let Some(node) = state.nodes.get_mut(&element) else {
            return false;
        };
        let before = node.listeners.len();
        node.listeners.retain(|l| l.id != listener);
        node.listeners.len() != before
    }

    /// Dispatch a click on `element`.
    ///
    /// Listeners run in registration order outside the document lock, so they
    /// may read the document freely. If none prevented the default and the
    /// element is an anchor with an `href`, the default navigator (if any) is
    /// sent there synchronously.
    ///
    /// The default action always reads the literal `href` attribute, as a
    /// browser would. Listeners that navigate themselves pick their own
    /// attribute (`selector.hrefAttribute` for the click handler).
    ///
    /// Dispatch itself is synchronous, but listeners may need more: the click
    /// handler's listeners intercept only inside a tokio runtime.
    pub fn click(&self, element: ElementId) -> Result<DomEvent, ClickTrackError> {
        let callbacks: Vec<ClickCallback> = {
            let state = self.lock();
            let node = state
                .nodes
                .get(&element)
                .ok_or(ClickTrackError::UnknownElement(element))?;
            node.listeners.iter().map(|l| Arc::clone(&l.callback)).collect()
        };

        let target = Element {
            document: self.clone(),
            id: element,
        };
        let mut event = DomEvent::click(element);
        for callback in callbacks {
            callback(&mut event, &target);
        }

        if !event.default_prevented() {
            let (href, navigator) = {
                let state = self.lock();
                let href = state
                    .nodes
                    .get(&element)
                    .filter(|node| node.tag == "a")
                    .and_then(|node| node.attributes.get("href").cloned());
                (href, state.default_navigator.clone())
            };
            if let (Some(href), Some(navigator)) = (href, navigator) {
                debug!(element = %element, href = %href, "Default anchor navigation");
                navigator.navigate(&href)?;
            }
        }

        Ok(event)
    }
}

// ---------------------------------------------------------------------------
// Element
// ---------------------------------------------------------------------------

/// A live reference to one element of a document.
#[derive(Debug, Clone)]
pub struct Element {
    document: Document,
    id: ElementId,
}

impl Element {
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn tag(&self) -> Option<String> {
        self.document
            .lock()
            .nodes
            .get(&self.id)
            .map(|node| node.tag.clone())
    }

    /// Current value of `name`, read at call time.
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.document
            .lock()
            .nodes
            .get(&self.id)
            .and_then(|node| node.attributes.get(&name.to_ascii_lowercase()).cloned())
    }

    pub fn click(&self) -> Result<DomEvent, ClickTrackError> {
        self.document.click(self.id)
    }
}

// ---------------------------------------------------------------------------
// Listener handles
// ---------------------------------------------------------------------------

/// Disposable registration of one click listener.
///
/// Dropping the handle leaves the listener bound, like an unremoved DOM
/// listener; call [`ListenerHandle::remove`] to detach it.
#[derive(Debug)]
pub struct ListenerHandle {
    document: Document,
    element: ElementId,
    listener: ListenerId,
}

impl ListenerHandle {
    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn id(&self) -> ListenerId {
        self.listener
    }

    /// Detach the listener. Returns false if it was already gone.
    pub fn remove(self) -> bool {
        let removed = self.document.remove_listener(self.element, self.listener);
        if removed {
            ClickEventLogger::log_event(
                ClickEvent::new(ClickEventKind::ListenerRemoved).with_element(self.element),
            );
        }
        removed
    }
}
