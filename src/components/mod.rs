// Export components
pub mod calendly;

// Re-export the Calendly handle
pub use calendly::CalendlyHandle;
