pub mod error;
pub mod event;
pub mod traits;
pub mod types;

pub use error::ClickTrackError;
pub use event::{ClickEvent, ClickEventKind};
pub use traits::{Navigator, Transport};
pub use types::{
    ElementId, LinkAttributes, TrackingRequest, TransportResponse, ARTICLE_BODY_KEY,
    FORM_CONTENT_TYPE,
};
