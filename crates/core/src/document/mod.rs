pub mod id;
pub mod model;
pub mod validate;

pub use id::{InvalidIdentifier, OwnerId, WebsiteId};
pub use model::{
    new_document, Content, Customizations, NewWebsite, Section, SectionBody, WebsiteDocument,
    DEFAULT_LAYOUT,
};
