//! Click-Tracked Navigation Handler
//!
//! Binds one click listener per `article-link` element. A click suppresses the
//! browser's own navigation, fires the tracking POST in the background, and
//! navigates to the link's `href` once the delay elapses. Request and timer are
//! independent: nothing the request does (fail, hang, 500) reaches the timer.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use clicktrack_config::{ClickTrackConfig, SelectorConfig, TrackingConfig};
use clicktrack_core::{
    ClickEvent, ClickEventKind, LinkAttributes, Navigator, TrackingRequest, Transport,
};
use clicktrack_logging::ClickEventLogger;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::dom::{Document, DomEvent, Element, ListenerHandle};
use crate::timer::NavigationTimer;

/// Owner tag on listeners this handler binds.
pub const LISTENER_OWNER: &str = "article-click";

/// Everything one click set in motion.
#[derive(Debug)]
pub struct ClickOutcome {
    pub request: TrackingRequest,
    /// The background send. Its result is already discarded.
    pub tracking: JoinHandle<()>,
    /// `None` when the link has no navigation target.
    pub navigation: Option<NavigationTimer>,
}

pub struct ArticleClickHandler {
    selector: SelectorConfig,
    tracking: TrackingConfig,
    delay: Duration,
    transport: Arc<dyn Transport>,
    navigator: Arc<dyn Navigator>,
}

impl ArticleClickHandler {
    pub fn new(
        config: &ClickTrackConfig,
        transport: Arc<dyn Transport>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            selector: config.selector.clone(),
            tracking: config.tracking.clone(),
            delay: Duration::from_millis(config.navigation.delay_ms),
            transport,
            navigator,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait for `ready`, then [`attach`](Self::attach).
    pub async fn attach_when_ready<F>(
        self: &Arc<Self>,
        document: &Document,
        ready: F,
    ) -> Vec<ListenerHandle>
    where
        F: Future<Output = ()>,
    {
        ready.await;
        self.attach(document)
    }

    /// Bind a click listener to every matching element that does not already
    /// carry one from this handler. Returns handles for the new bindings only.
    ///
    /// The listeners need a tokio runtime at click time. A click dispatched
    /// without one is not intercepted and falls through to the document's
    /// default navigation.
    pub fn attach(self: &Arc<Self>, document: &Document) -> Vec<ListenerHandle> {
        let links = document.elements_by_class(&self.selector.class_name);
        let mut handles = Vec::with_capacity(links.len());

        for link in links {
            let id = link.id();
            if document.has_listener(id, LISTENER_OWNER) {
                debug!(element = %id, "Link already bound, skipping");
                continue;
            }

            let handler = Arc::clone(self);
            let bound = document.add_click_listener(id, LISTENER_OWNER, move |event, element| {
                if Handle::try_current().is_err() {
                    warn!(
                        element = %element.id(),
                        "Click dispatched outside a tokio runtime; leaving default navigation"
                    );
                    return;
                }
                handler.handle_click(event, element);
            });
            match bound {
                Ok(handle) => {
                    ClickEventLogger::log_event(
                        ClickEvent::new(ClickEventKind::ListenerAttached).with_element(id),
                    );
                    handles.push(handle);
                }
                Err(e) => warn!(element = %id, error = %e, "Failed to bind click listener"),
            }
        }

        info!(
            class = %self.selector.class_name,
            bound = handles.len(),
            "Article click listeners attached"
        );
        handles
    }

    /// Read the link attributes as they are right now.
    pub fn read_link(&self, element: &Element) -> LinkAttributes {
        LinkAttributes {
            href: element.attribute(&self.selector.href_attribute),
            endpoint: element.attribute(&self.selector.endpoint_attribute),
            identifier: element.attribute(&self.selector.identifier_attribute),
        }
    }

    /// React to one click. Must run inside a tokio runtime.
    pub fn handle_click(&self, event: &mut DomEvent, element: &Element) -> ClickOutcome {
        let link = self.read_link(element);
        event.prevent_default();

        ClickEventLogger::log_event(
            ClickEvent::new(ClickEventKind::LinkClicked)
                .with_element(element.id())
                .with_link(&link),
        );

        let request = link.tracking_request(&self.tracking.body_key, &self.tracking.content_type);
        let tracking = self.spawn_tracking(request.clone());

        let navigation = match link.href {
            Some(href) => Some(NavigationTimer::schedule(
                self.delay,
                Arc::clone(&self.navigator),
                href,
            )),
            None => {
                warn!(element = %element.id(), "Link has no navigation target");
                None
            }
        };

        ClickOutcome {
            request,
            tracking,
            navigation,
        }
    }

    fn spawn_tracking(&self, request: TrackingRequest) -> JoinHandle<()> {
        let transport = Arc::clone(&self.transport);
        tokio::spawn(async move {
            let endpoint = request.endpoint.clone();
            match transport.send(request).await {
                Ok(response) => ClickEventLogger::log_event(
                    ClickEvent::new(ClickEventKind::TrackingSent)
                        .with_endpoint(endpoint)
                        .with_detail(format!("status {}", response.status)),
                ),
                Err(e) => {
                    debug!(transport = transport.name(), error = %e, "Tracking request dropped");
                    ClickEventLogger::log_event(
                        ClickEvent::new(ClickEventKind::TrackingDropped)
                            .with_endpoint(endpoint)
                            .with_detail(e.to_string()),
                    );
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementSpec;
    use crate::navigation::PageLocation;
    use async_trait::async_trait;
    use clicktrack_core::{ClickTrackError, TransportResponse};
    use std::sync::Mutex;
    use tokio::time::{self, Instant};

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<TrackingRequest>>,
    }

    impl RecordingTransport {
        fn sent(&self) -> Vec<TrackingRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        fn name(&self) -> &str {
            "recording"
        }

        async fn send(
            &self,
            request: TrackingRequest,
        ) -> Result<TransportResponse, ClickTrackError> {
            self.sent.lock().unwrap().push(request);
            Ok(TransportResponse { status: 204 })
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl Transport for FailingTransport {
        fn name(&self) -> &str {
            "failing"
        }

        async fn send(
            &self,
            request: TrackingRequest,
        ) -> Result<TransportResponse, ClickTrackError> {
            Err(ClickTrackError::transport(request.endpoint, "connection refused"))
        }
    }

    struct HangingTransport;

    #[async_trait]
    impl Transport for HangingTransport {
        fn name(&self) -> &str {
            "hanging"
        }

        async fn send(&self, _: TrackingRequest) -> Result<TransportResponse, ClickTrackError> {
            std::future::pending().await
        }
    }

    fn article(doc: &Document, href: &str, pk: &str) -> crate::dom::Element {
        let id = doc.append(
            ElementSpec::anchor(href)
                .class("article-link")
                .attr("data-link", "/track")
                .attr("data-pk", pk),
        );
        doc.element(id).unwrap()
    }

    fn handler(transport: Arc<dyn Transport>, page: Arc<PageLocation>) -> Arc<ArticleClickHandler> {
        Arc::new(ArticleClickHandler::new(
            &ClickTrackConfig::default(),
            transport,
            page,
        ))
    }

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn attaches_once_per_matching_element() {
        let doc = Document::new();
        let a = article(&doc, "/articles/1", "1");
        let b = article(&doc, "/articles/2", "2");
        let other = doc.append(ElementSpec::anchor("/about").class("nav"));

        let h = handler(Arc::new(RecordingTransport::default()), Arc::new(PageLocation::new()));
        let handles = h.attach(&doc);

        assert_eq!(handles.len(), 2);
        assert_eq!(doc.listener_count(a.id()), 1);
        assert_eq!(doc.listener_count(b.id()), 1);
        assert_eq!(doc.listener_count(other), 0);
    }

    #[tokio::test]
    async fn reattach_is_idempotent() {
        let doc = Document::new();
        let a = article(&doc, "/articles/1", "1");
        let h = handler(Arc::new(RecordingTransport::default()), Arc::new(PageLocation::new()));

        let first = h.attach(&doc);
        assert_eq!(first.len(), 1);
        assert!(h.attach(&doc).is_empty());
        assert_eq!(doc.listener_count(a.id()), 1);

        // A link added later is picked up on the next pass.
        let b = article(&doc, "/articles/2", "2");
        let second = h.attach(&doc);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].element(), b.id());

        // Removing a handle makes the element eligible again.
        for handle in first {
            assert!(handle.remove());
        }
        assert_eq!(doc.listener_count(a.id()), 0);
        assert_eq!(h.attach(&doc).len(), 1);
        assert_eq!(doc.listener_count(a.id()), 1);
    }

    #[tokio::test]
    async fn no_matching_elements_is_noop() {
        let doc = Document::new();
        doc.append(ElementSpec::anchor("/about"));
        let h = handler(Arc::new(RecordingTransport::default()), Arc::new(PageLocation::new()));
        assert!(h.attach(&doc).is_empty());
        assert!(h.attach(&Document::new()).is_empty());
    }

    #[tokio::test]
    async fn waits_for_ready_signal() {
        let doc = Document::new();
        let a = article(&doc, "/articles/1", "1");
        let h = handler(Arc::new(RecordingTransport::default()), Arc::new(PageLocation::new()));
        let (ready_tx, ready_rx) = tokio::sync::oneshot::channel::<()>();

        let task = {
            let (h, doc) = (h.clone(), doc.clone());
            tokio::spawn(async move {
                h.attach_when_ready(&doc, async {
                    let _ = ready_rx.await;
                })
                .await
            })
        };

        settle().await;
        assert_eq!(doc.listener_count(a.id()), 0);

        ready_tx.send(()).unwrap();
        let handles = task.await.unwrap();
        assert_eq!(handles.len(), 1);
        assert_eq!(doc.listener_count(a.id()), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn click_prevents_default_tracks_and_navigates_later() {
        let doc = Document::new();
        let link = article(&doc, "/articles/42", "42");
        let transport = Arc::new(RecordingTransport::default());
        let page = Arc::new(PageLocation::new());
        let h = handler(transport.clone(), page.clone());

        let mut event = DomEvent::click(link.id());
        let start = Instant::now();
        let outcome = h.handle_click(&mut event, &link);

        assert!(event.default_prevented());
        assert_eq!(outcome.request, TrackingRequest::article("/track", "42"));
        assert_eq!(page.location(), None);

        settle().await;
        assert_eq!(transport.sent(), vec![TrackingRequest::article("/track", "42")]);

        let timer = outcome.navigation.unwrap();
        assert_eq!(timer.deadline(), start + Duration::from_millis(100));
        assert!(timer.wait().await);
        assert_eq!(page.location().as_deref(), Some("/articles/42"));
    }

    #[tokio::test(start_paused = true)]
    async fn identifier_is_read_at_click_time() {
        let doc = Document::new();
        let link = article(&doc, "/articles/1", "1");
        let transport = Arc::new(RecordingTransport::default());
        let h = handler(transport.clone(), Arc::new(PageLocation::new()));
        let _handles = h.attach(&doc);

        doc.set_attribute(link.id(), "data-pk", "99").unwrap();
        doc.click(link.id()).unwrap();
        settle().await;

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, "article=99");
    }

    #[tokio::test(start_paused = true)]
    async fn failed_tracking_still_navigates() {
        let doc = Document::new();
        let link = article(&doc, "/articles/7", "7");
        let page = Arc::new(PageLocation::new());
        let h = handler(Arc::new(FailingTransport), page.clone());

        let outcome = h.handle_click(&mut DomEvent::click(link.id()), &link);
        outcome.tracking.await.unwrap();
        assert!(outcome.navigation.unwrap().wait().await);
        assert_eq!(page.location().as_deref(), Some("/articles/7"));
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_tracking_still_navigates_on_time() {
        let doc = Document::new();
        let link = article(&doc, "/articles/8", "8");
        let page = Arc::new(PageLocation::new());
        let h = handler(Arc::new(HangingTransport), page.clone());

        let start = Instant::now();
        let outcome = h.handle_click(&mut DomEvent::click(link.id()), &link);

        time::advance(Duration::from_millis(50)).await;
        settle().await;
        assert_eq!(page.location(), None);

        assert!(outcome.navigation.unwrap().wait().await);
        assert!(Instant::now() - start >= Duration::from_millis(100));
        assert_eq!(page.location().as_deref(), Some("/articles/8"));
        assert!(!outcome.tracking.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_clicks_are_independent() {
        let doc = Document::new();
        let link = article(&doc, "/articles/3", "3");
        let transport = Arc::new(RecordingTransport::default());
        let page = Arc::new(PageLocation::new());
        let h = handler(transport.clone(), page.clone());
        let _handles = h.attach(&doc);

        doc.click(link.id()).unwrap();
        time::advance(Duration::from_millis(10)).await;
        doc.click(link.id()).unwrap();
        settle().await;
        assert_eq!(transport.sent().len(), 2);

        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(page.history(), vec!["/articles/3", "/articles/3"]);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_data_attributes_send_empty_payload() {
        let doc = Document::new();
        let id = doc.append(ElementSpec::anchor("/articles/5").class("article-link"));
        let link = doc.element(id).unwrap();
        let transport = Arc::new(RecordingTransport::default());
        let page = Arc::new(PageLocation::new());
        let h = handler(transport.clone(), page.clone());

        let outcome = h.handle_click(&mut DomEvent::click(id), &link);
        settle().await;

        assert_eq!(transport.sent(), vec![TrackingRequest::article("", "")]);
        assert!(outcome.navigation.unwrap().wait().await);
        assert_eq!(page.location().as_deref(), Some("/articles/5"));
    }

    #[tokio::test(start_paused = true)]
    async fn missing_href_tracks_without_navigation() {
        let doc = Document::new();
        let id = doc.append(
            ElementSpec::new("a")
                .class("article-link")
                .attr("data-link", "/track")
                .attr("data-pk", "4"),
        );
        let link = doc.element(id).unwrap();
        let transport = Arc::new(RecordingTransport::default());
        let h = handler(transport.clone(), Arc::new(PageLocation::new()));

        let mut event = DomEvent::click(id);
        let outcome = h.handle_click(&mut event, &link);
        settle().await;

        assert!(event.default_prevented());
        assert!(outcome.navigation.is_none());
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_selector_and_delay() {
        let mut config = ClickTrackConfig::default();
        config.selector.class_name = "story-link".into();
        config.selector.identifier_attribute = "data-id".into();
        config.tracking.body_key = "code".into();
        config.navigation.delay_ms = 250;

        let doc = Document::new();
        let id = doc.append(
            ElementSpec::anchor("/s/1")
                .class("story-link")
                .attr("data-link", "/t")
                .attr("data-id", "abc"),
        );
        doc.append(ElementSpec::anchor("/a/1").class("article-link"));
        let transport = Arc::new(RecordingTransport::default());
        let page = Arc::new(PageLocation::new());
        let h = Arc::new(ArticleClickHandler::new(&config, transport.clone(), page.clone()));

        assert_eq!(h.attach(&doc).len(), 1);
        let start = Instant::now();
        let outcome = h.handle_click(&mut DomEvent::click(id), &doc.element(id).unwrap());
        settle().await;

        assert_eq!(transport.sent()[0].body, "code=abc");
        assert!(outcome.navigation.unwrap().wait().await);
        assert!(Instant::now() - start >= Duration::from_millis(250));
    }

    #[test]
    fn click_without_runtime_falls_back_to_default_navigation() {
        let doc = Document::new();
        let link = article(&doc, "/articles/7", "7");
        let transport = Arc::new(RecordingTransport::default());
        let page = Arc::new(PageLocation::new());
        doc.set_default_navigator(page.clone());

        let h = handler(transport.clone(), page.clone());
        assert_eq!(h.attach(&doc).len(), 1);

        let event = link.click().unwrap();
        assert!(!event.default_prevented());
        assert_eq!(page.location().as_deref(), Some("/articles/7"));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn configured_href_attribute_wins_over_plain_href() {
        let mut config = ClickTrackConfig::default();
        config.selector.href_attribute = "data-href".into();

        let doc = Document::new();
        let id = doc.append(
            ElementSpec::anchor("/plain")
                .class("article-link")
                .attr("data-href", "/tracked")
                .attr("data-link", "/track")
                .attr("data-pk", "9"),
        );
        let page = Arc::new(PageLocation::new());
        doc.set_default_navigator(page.clone());
        let h = Arc::new(ArticleClickHandler::new(
            &config,
            Arc::new(RecordingTransport::default()),
            page.clone(),
        ));
        h.attach(&doc);

        let event = doc.click(id).unwrap();
        assert!(event.default_prevented());
        assert_eq!(page.location(), None);

        time::advance(Duration::from_millis(100)).await;
        settle().await;
        assert_eq!(page.history(), vec!["/tracked".to_string()]);
    }
}
