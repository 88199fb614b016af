pub mod article;
pub mod feed;

pub use article::{Article, SourceKind};
pub use feed::{Feed, FeedSample};
