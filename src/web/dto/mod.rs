//! Request/response data transfer objects.

mod request;
mod response;

pub use request::{CredentialsRequest, FeedUrlRequest, FeedsQuery, MarkReadRequest};
pub use response::{FeedItemResponse, LoginResponse, ScheduleResponse, StatusResponse};
