//! Records and clients for the Notion API.
//!
//! Only the endpoints the site needs are covered: querying the posts
//! database and listing the children of a block. Everything returned here
//! is close to the wire; turning it into a typed document tree is the job
//! of `nsite-content`.

mod api;
mod error;
mod http;
mod memory;
mod query;
pub mod wire;

pub use api::NotionApi;
pub use error::ApiError;
pub use http::ClientOptions;
pub use http::HttpNotionClient;
pub use memory::InMemoryNotion;
pub use query::property;
pub use query::DocumentQuery;
pub use wire::RawBlock;
pub use wire::RawPage;
pub use wire::ResultsPage;
