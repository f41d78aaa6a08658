pub mod http;
pub mod traits;

pub use http::HttpEventsClient;
pub use traits::*;
