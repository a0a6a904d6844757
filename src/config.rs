//! Storefront configuration

use std::{path::PathBuf, time::Duration};

use clap::{Args, ValueEnum};

use crate::{
    catalog::{Catalog, CatalogError},
    checkout::{form::FormOptions, payment::WidgetSettings},
    order_log::SpreadsheetConfig,
};

/// Store settings.
#[derive(Debug, Clone, Args)]
pub struct StoreConfig {
    /// Store name shown in the payment dialog
    #[arg(long, env = "STORE_NAME", default_value = "Rare Package")]
    pub store_name: String,

    /// Purchase description shown in the payment dialog
    #[arg(
        long,
        env = "STORE_DESCRIPTION",
        default_value = "Purchase from Rare Package"
    )]
    pub store_description: String,

    /// Catalog YAML file; the bundled catalog is used when omitted
    #[arg(long, env = "CATALOG_PATH")]
    pub catalog_path: Option<PathBuf>,

    /// Collect and require an email address at checkout
    #[arg(long, env = "REQUIRE_EMAIL", default_value_t = false)]
    pub require_email: bool,
}

impl StoreConfig {
    /// Load the configured catalog.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the catalog cannot be loaded.
    pub fn catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.catalog_path {
            Some(path) => Catalog::from_path(path),
            None => Catalog::bundled(),
        }
    }

    /// Checkout form options.
    #[must_use]
    pub fn form_options(&self) -> FormOptions {
        FormOptions {
            require_email: self.require_email,
        }
    }
}

/// Hosted payment widget settings.
#[derive(Debug, Clone, Args)]
pub struct PaymentConfig {
    /// Merchant key id for the payment widget
    #[arg(long, env = "PAYMENT_KEY_ID", hide_env_values = true, default_value = "")]
    pub payment_key_id: String,

    /// Accent colour of the payment dialog
    #[arg(long, env = "PAYMENT_THEME_COLOR", default_value = "#000000")]
    pub payment_theme_color: String,
}

impl PaymentConfig {
    /// Widget settings for this store.
    #[must_use]
    pub fn widget_settings(&self, store: &StoreConfig) -> WidgetSettings {
        WidgetSettings {
            key_id: self.payment_key_id.clone(),
            store_name: store.store_name.clone(),
            description: store.store_description.clone(),
            theme_color: self.payment_theme_color.clone(),
        }
    }
}

/// Order log settings.
#[derive(Debug, Clone, Args)]
pub struct OrderLogConfig {
    /// Spreadsheet endpoint receiving completed orders
    #[arg(long, env = "ORDER_LOG_URL")]
    pub order_log_url: Option<String>,

    /// Order log request timeout in milliseconds
    #[arg(long, env = "ORDER_LOG_TIMEOUT_MS", default_value_t = 5_000_u64)]
    pub order_log_timeout_ms: u64,
}

impl OrderLogConfig {
    /// Spreadsheet settings, when an endpoint is configured.
    #[must_use]
    pub fn spreadsheet(&self) -> Option<SpreadsheetConfig> {
        self.order_log_url.as_ref().map(|url| SpreadsheetConfig {
            url: url.clone(),
            timeout: Duration::from_millis(self.order_log_timeout_ms),
        })
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}
