pub mod json;
pub mod response;
pub mod status;

pub use json::ValidJson;
pub use response::{ApiResponse, ApiResult};
pub use status::strict_status_codes;
