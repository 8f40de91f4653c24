//! BOIB core: bulletin domain model, label taxonomy and pure helpers.
mod model;
mod query;
mod storage_path;
mod taxonomy;
mod urls;

pub use model::{Article, Bulletin, BulletinType, DocumentFormat, Section, SectionType};
pub use query::{DateQuery, QueryError};
pub use storage_path::{article_identifier, document_path, UNNUMBERED_BULLETIN};
pub use taxonomy::{
    bulletin_type_from_labels, month_from_name, section_type_from_label, TaxonomyError,
    CATALAN_MONTHS,
};
pub use urls::{first_integer, leading_integer, resolve_url, UrlError};
