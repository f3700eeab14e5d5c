mod settings;

pub use settings::{CatalogConfig, LoggingConfig, PickerConfig, ServerConfig, Settings};
