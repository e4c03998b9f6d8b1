//! `TREEVIEW__SECTION__KEY` environment overlay.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment};

pub const PREFIX: &str = "TREEVIEW";

/// Highest-precedence layer; values such as `true` and `50` are parsed.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(Environment::with_prefix(PREFIX).separator("__").try_parsing(true)))
}
