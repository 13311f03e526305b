//! Settings service configuration

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsConfig {
	/// Keep a process-local snapshot of all values
	pub cache_enabled: bool,
	pub default_per_page: u32,
	pub max_per_page: u32,
}

impl Default for SettingsConfig {
	fn default() -> Self {
		Self { cache_enabled: true, default_per_page: 15, max_per_page: 100 }
	}
}

impl SettingsConfig {
	/// Clamps a requested page size to the configured bounds
	pub fn per_page(&self, requested: Option<u32>) -> u32 {
		requested.unwrap_or(self.default_per_page).clamp(1, self.max_per_page.max(1))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_per_page_clamps() {
		let config = SettingsConfig::default();
		assert_eq!(config.per_page(None), 15);
		assert_eq!(config.per_page(Some(0)), 1);
		assert_eq!(config.per_page(Some(500)), 100);
	}

	#[test]
	fn test_partial_config_uses_defaults() {
		let config: SettingsConfig = serde_json::from_str(r#"{"cacheEnabled": false}"#).unwrap();
		assert!(!config.cache_enabled);
		assert_eq!(config.default_per_page, 15);
	}
}

// vim: ts=4
