pub mod arguments;
pub mod catalogue;
pub mod dispatcher;
mod handle;
pub mod models;

pub use arguments::Arguments;
pub use catalogue::{OperationSpec, CATALOGUE};
pub use dispatcher::Dispatcher;
pub use handle::CalendlyHandle;
pub use models::{ApiResponse, Method, RequestDescriptor};
