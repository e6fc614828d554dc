use std::{net::IpAddr, time::Duration};

use tracing::level_filters::LevelFilter;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("{name} has an invalid value {value:?}")]
	Invalid { name: &'static str, value: String },
	#[error("{0} must be set")]
	Missing(&'static str),
}

/// Where posts are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
	InMemory,
	Mongo {
		url: String,
		database: Option<String>,
	},
}

impl Storage {
	/// The `STORAGE_MODE` value selecting this storage.
	pub fn mode(&self) -> &'static str {
		match self {
			Self::InMemory => "inmemory",
			Self::Mongo { .. } => "mongo",
		}
	}
}

/// Service configuration, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	pub host: IpAddr,
	pub port: u16,
	pub storage: Storage,
	pub request_timeout: Duration,
	pub log_level: LevelFilter,
	/// When set, traces and metrics are exported to this OTLP endpoint.
	pub otlp_endpoint: Option<String>,
}

impl Config {
	/// Reads the configuration from the process environment, after loading
	/// a `.env` file if one exists.
	pub fn from_env() -> Result<Self, Error> {
		dotenvy::dotenv().ok();

		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Reads the configuration through `lookup`, which returns the value of
	/// a variable if it is set.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
		let var = |name: &'static str| lookup(name).filter(|value| !value.is_empty());

		let storage = match var("STORAGE_MODE").as_deref() {
			None | Some("inmemory") => Storage::InMemory,
			Some("mongo") => Storage::Mongo {
				url: var("MONGO_URL").ok_or(Error::Missing("MONGO_URL"))?,
				database: var("MONGO_DATABASE"),
			},
			Some(other) => {
				return Err(Error::Invalid {
					name: "STORAGE_MODE",
					value: other.to_owned(),
				})
			}
		};

		Ok(Self {
			host: parse(&var, "SERVER_HOST")?.unwrap_or(IpAddr::from([0, 0, 0, 0])),
			port: parse(&var, "SERVER_PORT")?.unwrap_or(DEFAULT_PORT),
			storage,
			request_timeout: Duration::from_secs(
				parse(&var, "REQUEST_TIMEOUT_SECS")?.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
			),
			log_level: parse(&var, "LOG_LEVEL")?.unwrap_or(LevelFilter::INFO),
			otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
		})
	}
}

fn parse<T: std::str::FromStr>(
	var: impl Fn(&'static str) -> Option<String>,
	name: &'static str,
) -> Result<Option<T>, Error> {
	var(name)
		.map(|value| {
			value
				.parse()
				.map_err(|_| Error::Invalid { name, value })
		})
		.transpose()
}
