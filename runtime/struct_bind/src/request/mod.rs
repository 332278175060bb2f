//! Process and extract data from incoming HTTP requests.
pub use query::QueryParams;
pub use request_::Request;
pub use request_head::RequestHead;

pub mod body;
mod query;
mod request_;
mod request_head;
