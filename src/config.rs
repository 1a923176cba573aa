use std::{path::PathBuf, time::Duration};

use clap::Args;
use miette::Diagnostic;
use serde::Deserialize;
use smart_default::SmartDefault;
use thiserror::Error;
use url::Url;
use userblocks::HttpManagementClient;
use v_utils::prelude::*;

const CONFIG_FILE_NAME: &str = "config.toml";
const ENV_PREFIX: &str = "USERBLOCKS";

/// Command-line overrides for [`Settings`]
#[derive(Args, Clone, Debug, Default)]
pub struct SettingsFlags {
	/// Config file to read instead of $XDG_CONFIG_HOME/userblocks/config.toml
	#[arg(long, global = true)]
	pub config: Option<PathBuf>,
	/// Tenant domain, e.g. travel0.eu.auth0.com
	#[arg(long, global = true)]
	pub domain: Option<String>,
	/// Management API access token
	#[arg(long, global = true)]
	pub access_token: Option<String>,
}

/// Connection settings for the Management API.
///
/// Layered lowest to highest: defaults, the XDG config file, `--config`, `USERBLOCKS_*` env vars, CLI flags.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Settings {
	pub domain: String,
	pub access_token: String,
	/// Overrides the `https://{domain}/api/v2/` base, mostly for proxies and local testing
	pub base_url: Option<Url>,
	#[default(30)]
	pub timeout_secs: u64,
}

#[derive(Debug, Diagnostic, Error)]
pub enum ConfigError {
	#[error("failed to load configuration")]
	#[diagnostic(code(userblocks::config::load))]
	Load(#[from] ::config::ConfigError),

	#[error("missing `{0}` in configuration")]
	#[diagnostic(
		code(userblocks::config::missing),
		help("set it in $XDG_CONFIG_HOME/userblocks/config.toml, through a USERBLOCKS_* environment variable, or with the matching command-line flag")
	)]
	Missing(&'static str),
}

impl Settings {
	pub fn load(flags: &SettingsFlags) -> Result<Self, ConfigError> {
		let mut builder = ::config::Config::builder();

		if let Some(path) = default_config_path() {
			tracing::debug!(path = %path.display(), "using config file");
			builder = builder.add_source(::config::File::from(path).required(false));
		}
		if let Some(path) = &flags.config {
			builder = builder.add_source(::config::File::from(path.clone()).required(true));
		}

		let settings: Settings = builder
			.add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
			.set_override_option("domain", flags.domain.clone())?
			.set_override_option("access_token", flags.access_token.clone())?
			.build()?
			.try_deserialize()?;

		settings.validate()
	}

	fn validate(self) -> Result<Self, ConfigError> {
		if self.domain.trim().is_empty() && self.base_url.is_none() {
			return Err(ConfigError::Missing("domain"));
		}
		if self.access_token.trim().is_empty() {
			return Err(ConfigError::Missing("access_token"));
		}
		Ok(self)
	}

	pub fn api_url(&self) -> Result<Url> {
		match &self.base_url {
			Some(url) => Ok(url.clone()),
			None => Ok(HttpManagementClient::tenant_url(&self.domain)?),
		}
	}

	pub fn client(&self) -> Result<HttpManagementClient> {
		let client = HttpManagementClient::new(self.api_url()?, self.access_token.clone(), Duration::from_secs(self.timeout_secs))?;
		Ok(client)
	}
}

fn default_config_path() -> Option<PathBuf> {
	xdg::BaseDirectories::with_prefix(env!("CARGO_PKG_NAME")).find_config_file(CONFIG_FILE_NAME)
}
