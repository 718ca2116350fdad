pub mod dom;
pub mod handler;
pub mod navigation;
pub mod timer;
pub mod transport;

pub use dom::{Document, DomEvent, Element, ElementSpec, ListenerHandle, PageSpec};
pub use handler::{ArticleClickHandler, ClickOutcome, LISTENER_OWNER};
pub use navigation::PageLocation;
pub use timer::NavigationTimer;
pub use transport::HttpTransport;
