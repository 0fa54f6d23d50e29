pub mod client;
pub mod resolver;

pub use client::{ContactsClient, ContactsError};
pub use resolver::{
    AudienceResolver, AudienceSelection, ListSelection, ResolvedAudience, SegmentSelection,
};
