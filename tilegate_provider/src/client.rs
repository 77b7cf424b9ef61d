//! Outbound HTTP client factory.
//!
//! All providers share one pooled client so that upstream connections are
//! reused across requests. Some shard hosts ship certificates that don't
//! match their rotated hostnames, so peer verification is disabled.
//!
//! Proxy policy, matching the configuration surface:
//! - `""` → system proxy from the environment (reqwest's default behavior)
//! - `"direct"` → no proxy at all
//! - anything else → parsed as a proxy URL; a malformed value falls back to
//!   the system proxy

use anyhow::{Context, Result, ensure};
use reqwest::{Client, Proxy, redirect};
use std::{sync::OnceLock, time::Duration};

/// Browser-like user agent sent with upstream tile requests.
pub const DESKTOP_USER_AGENT: &str =
	"Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

#[derive(Debug, Clone)]
pub struct ClientOptions {
	/// Total per-request deadline, connection setup included.
	pub timeout: Duration,
	/// `""`, `"direct"` or a proxy URL. See module docs.
	pub proxy: String,
	/// When false, 3xx responses are returned verbatim instead of followed.
	pub follow_redirects: bool,
}

impl Default for ClientOptions {
	fn default() -> Self {
		ClientOptions {
			timeout: Duration::from_secs(10),
			proxy: String::new(),
			follow_redirects: true,
		}
	}
}

/// Build a pooled outbound client from `options`.
pub fn build_client(options: &ClientOptions) -> Result<Client> {
	let mut builder = Client::builder()
		.timeout(options.timeout)
		.pool_max_idle_per_host(10_000)
		.pool_idle_timeout(Duration::from_secs(90))
		.tcp_keepalive(Some(3 * options.timeout))
		.danger_accept_invalid_certs(true);

	match options.proxy.as_str() {
		"" => {} // system proxy from the environment
		"direct" => builder = builder.no_proxy(),
		other => match Proxy::all(other) {
			Ok(proxy) => builder = builder.proxy(proxy),
			Err(err) => {
				log::warn!("invalid proxy url '{other}', falling back to system proxy: {err}");
			}
		},
	}

	if !options.follow_redirects {
		builder = builder.redirect(redirect::Policy::none());
	}

	builder.build().context("building outbound http client")
}

static DEFAULT_CLIENT: OnceLock<Client> = OnceLock::new();

/// Install the process-wide default client. Call once at startup, before
/// any provider issues a request.
pub fn init_default_client(options: &ClientOptions) -> Result<()> {
	let client = build_client(options)?;
	ensure!(
		DEFAULT_CLIENT.set(client).is_ok(),
		"default http client initialized twice"
	);
	log::info!(
		"outbound http client ready (timeout {:?}, proxy '{}')",
		options.timeout,
		if options.proxy.is_empty() { "system" } else { &options.proxy }
	);
	Ok(())
}

/// The process-wide default client. Falls back to default options when
/// [`init_default_client`] was never called (tests, ad-hoc tools).
pub fn default_client() -> Client {
	DEFAULT_CLIENT
		.get_or_init(|| build_client(&ClientOptions::default()).expect("default http client options are valid"))
		.clone()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn build_with_default_options() {
		build_client(&ClientOptions::default()).unwrap();
	}

	#[test]
	fn build_direct_and_explicit_proxy() {
		build_client(&ClientOptions {
			proxy: "direct".to_string(),
			..ClientOptions::default()
		})
		.unwrap();
		build_client(&ClientOptions {
			proxy: "http://127.0.0.1:7890".to_string(),
			..ClientOptions::default()
		})
		.unwrap();
	}

	#[test]
	fn malformed_proxy_falls_back_to_system() {
		// must not error, only warn
		build_client(&ClientOptions {
			proxy: "::not a proxy::".to_string(),
			follow_redirects: false,
			..ClientOptions::default()
		})
		.unwrap();
	}
}
