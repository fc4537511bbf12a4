pub mod assembler;
pub mod model;
pub mod reject;
pub mod subdomain;

pub use assembler::{Assembler, AssemblyInput, SiteProfile, record_id};
pub use model::{ArticleRecord, ContentInfo, DataInfo, RecordMeta, RecordType};
pub use reject::Rejection;
pub use subdomain::{KeywordTag, SubdomainRule};
