//! App state type and builder

use std::sync::Arc;

use tabula_core::{SettingsConfig, SettingsService};
use tabula_types::audit::AuditSink;
use tabula_types::store_adapter::StoreAdapter;

use crate::guard::AdminGuard;
use crate::prelude::*;
use crate::routes;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct AppState {
	pub settings: SettingsService,
	pub admin_guard: Arc<dyn AdminGuard>,
	pub opts: AppBuilderOpts,
}

impl std::fmt::Debug for AppState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AppState").field("opts", &self.opts).finish_non_exhaustive()
	}
}

pub type App = Arc<AppState>;

#[derive(Default)]
pub struct Adapters {
	pub store_adapter: Option<Arc<dyn StoreAdapter>>,
	pub audit_sink: Option<Arc<dyn AuditSink>>,
	pub admin_guard: Option<Arc<dyn AdminGuard>>,
}

#[derive(Debug, Clone)]
pub struct AppBuilderOpts {
	pub listen: Box<str>,
	pub settings: SettingsConfig,
}

pub struct AppBuilder {
	opts: AppBuilderOpts,
	adapters: Adapters,
}

impl AppBuilder {
	pub fn new() -> Self {
		AppBuilder {
			opts: AppBuilderOpts {
				listen: "127.0.0.1:8080".into(),
				settings: SettingsConfig::default(),
			},
			adapters: Adapters::default(),
		}
	}

	// Opts
	pub fn listen(&mut self, listen: impl Into<Box<str>>) -> &mut Self {
		self.opts.listen = listen.into();
		self
	}
	pub fn settings_config(&mut self, settings: SettingsConfig) -> &mut Self {
		self.opts.settings = settings;
		self
	}

	// Adapters
	pub fn store_adapter(&mut self, store_adapter: Arc<dyn StoreAdapter>) -> &mut Self {
		self.adapters.store_adapter = Some(store_adapter);
		self
	}
	pub fn audit_sink(&mut self, audit_sink: Arc<dyn AuditSink>) -> &mut Self {
		self.adapters.audit_sink = Some(audit_sink);
		self
	}
	pub fn admin_guard(&mut self, admin_guard: Arc<dyn AdminGuard>) -> &mut Self {
		self.adapters.admin_guard = Some(admin_guard);
		self
	}

	/// Assembles the app state without starting the server
	pub fn build(self) -> ClResult<App> {
		let store_adapter = self
			.adapters
			.store_adapter
			.ok_or_else(|| Error::ConfigError("no store adapter".into()))?;
		let admin_guard = self
			.adapters
			.admin_guard
			.ok_or_else(|| Error::ConfigError("no admin guard".into()))?;

		let mut settings = SettingsService::new(store_adapter, self.opts.settings.clone());
		if let Some(audit_sink) = self.adapters.audit_sink {
			settings = settings.with_audit_sink(audit_sink);
		}

		Ok(Arc::new(AppState { settings, admin_guard, opts: self.opts }))
	}

	pub async fn run(self) -> ClResult<()> {
		let _ = tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_target(false)
			.try_init();
		info!("Tabula settings store V{}", VERSION);

		let app = self.build()?;
		let router = routes::init(app.clone());

		let listener = tokio::net::TcpListener::bind(app.opts.listen.as_ref()).await?;
		info!("Listening on HTTP {}", app.opts.listen);

		axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

		info!("Shutting down");
		Ok(())
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

async fn shutdown_signal() {
	if let Err(err) = tokio::signal::ctrl_c().await {
		error!("Cannot listen for shutdown signal: {}", err);
		std::future::pending::<()>().await;
	}
}

// vim: ts=4
