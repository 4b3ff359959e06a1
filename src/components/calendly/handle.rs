use super::arguments::Arguments;
use super::catalogue::{self, OperationSpec, CATALOGUE};
use super::dispatcher::Dispatcher;
use super::models::ApiResponse;
use crate::config::Config;
use crate::error::{AppResult, Error};
use serde_json::Value;
use tracing::{debug, info};

/// Handle for invoking catalogue operations against Calendly.
///
/// Built once at startup and cloned into every front end.
#[derive(Clone, Debug)]
pub struct CalendlyHandle {
    dispatcher: Dispatcher,
}

impl CalendlyHandle {
    /// Create a new handle and its shared HTTP client
    pub fn new(config: &Config) -> AppResult<Self> {
        let dispatcher = Dispatcher::new(config)?;
        info!(
            "Calendly client ready for {} ({} operations)",
            dispatcher.base_url(),
            CATALOGUE.len()
        );
        Ok(Self { dispatcher })
    }

    /// All operations this handle can run
    pub fn operations(&self) -> &'static [OperationSpec] {
        CATALOGUE
    }

    /// Run the named operation with JSON arguments
    pub async fn call(&self, name: &str, arguments: Value) -> AppResult<ApiResponse> {
        let operation =
            catalogue::find(name).ok_or_else(|| Error::UnknownOperation(name.to_string()))?;
        let arguments = Arguments::from_value(arguments)?;
        self.run(operation, &arguments).await
    }

    /// Build the request for one operation and dispatch it
    pub async fn run(
        &self,
        operation: &OperationSpec,
        arguments: &Arguments,
    ) -> AppResult<ApiResponse> {
        let request = operation.build(arguments)?;
        debug!("Running {} as {} {}", operation.name, request.method, request.path);
        self.dispatcher.dispatch(&request).await
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}
