mod article;
mod region;
mod source;

pub use article::{Article, NewArticle, RawItem};
pub use region::{Region, RegionWithCount};
pub use source::{NewSource, Source, SourceKind, SourceWithRegion};
