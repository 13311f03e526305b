//! Store adapter query tests
//!
//! Filters, case-insensitive search, ordering and limit/offset

use tabula::setting::{FieldType, ListSettingOptions, NewSetting, Role};
use tabula::store_adapter::StoreAdapter;
use tabula_store_adapter_sqlite::StoreAdapterSqlite;
use tempfile::TempDir;

async fn create_seeded_adapter() -> (StoreAdapterSqlite, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let adapter =
		StoreAdapterSqlite::new(temp_dir.path()).await.expect("Failed to create adapter");

	let seed = [
		("site_name", Some("Tabula Demo"), Some("Site name"), Role::System, Some("general")),
		("admin_email", Some("ops@example.com"), Some("Admin e-mail"), Role::System, Some("general")),
		("session_lifetime", Some("120"), Some("Session lifetime"), Role::User, Some("security")),
		("oauth_enabled", Some("0"), None, Role::Plugin, Some("authentication")),
		("footer_text", None, Some("Footer"), Role::User, None),
	];
	for (key, value, label, role, group) in seed {
		adapter
			.create_setting(&NewSetting {
				key: key.into(),
				value: value.map(Into::into),
				label: label.map(Into::into),
				description: Some(format!("Description of {}", key).into()),
				role,
				group: group.map(Into::into),
				..NewSetting::default()
			})
			.await
			.expect("seed");
	}

	(adapter, temp_dir)
}

fn keys(settings: &[tabula::setting::Setting]) -> Vec<&str> {
	settings.iter().map(|s| s.key.as_ref()).collect()
}

#[tokio::test]
async fn test_list_all_in_id_order() {
	let (adapter, _temp) = create_seeded_adapter().await;

	let all = adapter.list_settings(&ListSettingOptions::default()).await.expect("list");
	assert_eq!(
		keys(&all),
		vec!["site_name", "admin_email", "session_lifetime", "oauth_enabled", "footer_text"]
	);
}

#[tokio::test]
async fn test_filter_by_role_and_group() {
	let (adapter, _temp) = create_seeded_adapter().await;

	let system = adapter.list_settings(&ListSettingOptions::by_role(Role::System)).await.expect("list");
	assert_eq!(keys(&system), vec!["site_name", "admin_email"]);

	let security =
		adapter.list_settings(&ListSettingOptions::by_group("security")).await.expect("list");
	assert_eq!(keys(&security), vec!["session_lifetime"]);

	let opts = ListSettingOptions {
		role: Some(Role::User),
		field_type: Some(FieldType::Input),
		..ListSettingOptions::default()
	};
	let users = adapter.list_settings(&opts).await.expect("list");
	assert_eq!(keys(&users), vec!["session_lifetime", "footer_text"]);
}

#[tokio::test]
async fn test_search_is_case_insensitive_across_fields() {
	let (adapter, _temp) = create_seeded_adapter().await;

	// value
	let found = adapter.list_settings(&ListSettingOptions::search("DEMO")).await.expect("search");
	assert_eq!(keys(&found), vec!["site_name"]);

	// label
	let found = adapter.list_settings(&ListSettingOptions::search("e-MAIL")).await.expect("search");
	assert_eq!(keys(&found), vec!["admin_email"]);

	// key
	let found = adapter.list_settings(&ListSettingOptions::search("oauth")).await.expect("search");
	assert_eq!(keys(&found), vec!["oauth_enabled"]);

	// description matches everything, store order is kept
	let found =
		adapter.list_settings(&ListSettingOptions::search("description of")).await.expect("search");
	assert_eq!(found.len(), 5);
	assert_eq!(found[0].key.as_ref(), "site_name");
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
	let (adapter, _temp) = create_seeded_adapter().await;

	let found = adapter.list_settings(&ListSettingOptions::search("%")).await.expect("search");
	assert!(found.is_empty());

	let found = adapter.list_settings(&ListSettingOptions::search("_name")).await.expect("search");
	assert_eq!(keys(&found), vec!["site_name"]);
}

#[tokio::test]
async fn test_search_folds_non_ascii_case() {
	let (adapter, _temp) = create_seeded_adapter().await;
	adapter
		.create_setting(&NewSetting {
			key: "screen".into(),
			label: Some("Écran principal".into()),
			..NewSetting::default()
		})
		.await
		.expect("create");

	for term in ["écran", "ÉCRAN", "PRINCIPAL"] {
		let found = adapter.list_settings(&ListSettingOptions::search(term)).await.expect("search");
		assert_eq!(keys(&found), vec!["screen"], "term {:?}", term);
	}
	assert_eq!(adapter.count_settings(&ListSettingOptions::search("écran")).await.expect("count"), 1);
}

#[tokio::test]
async fn test_search_pages_after_matching() {
	let (adapter, _temp) = create_seeded_adapter().await;

	let opts = ListSettingOptions {
		q: Some("Description of".into()),
		role: Some(Role::User),
		limit: Some(1),
		offset: Some(1),
		..Default::default()
	};
	let page = adapter.list_settings(&opts).await.expect("search");
	assert_eq!(keys(&page), vec!["footer_text"]);
	assert_eq!(adapter.count_settings(&opts).await.expect("count"), 2);
}

#[tokio::test]
async fn test_limit_offset_and_count() {
	let (adapter, _temp) = create_seeded_adapter().await;

	let opts = ListSettingOptions { limit: Some(2), offset: Some(2), ..Default::default() };
	let page = adapter.list_settings(&opts).await.expect("list");
	assert_eq!(keys(&page), vec!["session_lifetime", "oauth_enabled"]);

	// Count ignores limit and offset
	assert_eq!(adapter.count_settings(&opts).await.expect("count"), 5);
	assert_eq!(
		adapter.count_settings(&ListSettingOptions::by_role(Role::System)).await.expect("count"),
		2
	);
}

#[tokio::test]
async fn test_list_values_maps_every_key() {
	let (adapter, _temp) = create_seeded_adapter().await;

	let values = adapter.list_values().await.expect("list values");
	assert_eq!(values.len(), 5);
	assert_eq!(values.get("session_lifetime"), Some(&Some("120".into())));
	assert_eq!(values.get("footer_text"), Some(&None));
}

// vim: ts=4
