mod app;
mod http;
mod sink;
mod validation;

pub use app::{AppError, AppResult};
pub use http::HttpError;
pub use sink::SinkError;
pub use validation::ValidationError;
