//! Google Earth Enterprise session manager and relay.
//!
//! The Google Earth Pro desktop client buys a session cookie through a
//! binary POST handshake against `/geauth?ct=pro`. This module replays that
//! handshake with the known 48-byte auth blob, extracts the session id from
//! the response by fixed offsets, keeps it fresh on a 2-minute ticker, and
//! stamps it as a `SessionId` cookie onto relayed requests so that tile,
//! terrain and historical-imagery paths can be proxied to third-party
//! viewers.

use anyhow::{Context, Result, bail, ensure};
use bytes::Bytes;
use parking_lot::{Mutex, RwLock};
use reqwest::{Client, Method, Response, StatusCode, header};
use std::{sync::Arc, time::Duration};
use tokio::{sync::oneshot, task::JoinHandle};

pub const DEFAULT_GEE_BASE_URL: &str = "https://kh.google.com";

const AUTH_PATH: &str = "/geauth?ct=pro";

/// The 48-byte handshake body sent by Google Earth Pro.
const AUTH_BODY_HEX: &str = "0100000003c953420fc9b7c14a90ddcc620d2087f1df4fa5d6410b57e9dbe4f653cf6d8b1a200b2396c4e58ec6e0467209";

const GEE_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// How often the session id is re-acquired.
const REFRESH_INTERVAL: Duration = Duration::from_secs(120);

/// One authenticated session against a GEE server.
///
/// The session id is guarded by a single RW lock: the background refresher
/// takes the write side, relays and `session_id()` take the read side, so
/// readers always observe either the previous or the new id, never a torn
/// string.
pub struct GeeSession {
	base_url: String,
	client: Client,
	auth_body: Vec<u8>,
	session_id: RwLock<String>,
	refresher: Mutex<Option<(oneshot::Sender<()>, JoinHandle<()>)>>,
}

impl GeeSession {
	/// Connect to a GEE server: perform the initial handshake (failure is
	/// logged, not fatal; relayed requests will proceed without a cookie)
	/// and start the background refresh task.
	pub async fn connect(client: Client, base_url: Option<String>) -> Result<Arc<GeeSession>> {
		let auth_body = hex::decode(AUTH_BODY_HEX).context("decoding GEE auth body")?;
		ensure!(auth_body.len() == 48, "GEE auth body must be 48 bytes");

		let session = Arc::new(GeeSession {
			base_url: base_url.unwrap_or_else(|| DEFAULT_GEE_BASE_URL.to_string()),
			client,
			auth_body,
			session_id: RwLock::new(String::new()),
			refresher: Mutex::new(None),
		});

		if let Err(err) = session.authenticate().await {
			log::error!("initial GEE authentication failed: {err:#}");
		}
		Arc::clone(&session).spawn_refresher();
		log::info!("GEE session manager ready for {}", session.base_url);
		Ok(session)
	}

	/// Build a session without the initial handshake or refresh task.
	/// For contexts with no network (router tests, offline tooling); the
	/// relay works but sends no cookie until `authenticate` succeeds.
	pub fn offline(client: Client, base_url: Option<String>) -> Result<Arc<GeeSession>> {
		let auth_body = hex::decode(AUTH_BODY_HEX).context("decoding GEE auth body")?;
		Ok(Arc::new(GeeSession {
			base_url: base_url.unwrap_or_else(|| DEFAULT_GEE_BASE_URL.to_string()),
			client,
			auth_body,
			session_id: RwLock::new(String::new()),
			refresher: Mutex::new(None),
		}))
	}

	fn spawn_refresher(self: Arc<Self>) {
		let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
		let session = Arc::clone(&self);
		let handle = tokio::spawn(async move {
			let mut ticker = tokio::time::interval(REFRESH_INTERVAL);
			ticker.tick().await; // the first tick fires immediately
			log::info!("GEE session refresh loop started (interval {REFRESH_INTERVAL:?})");
			loop {
				tokio::select! {
					_ = ticker.tick() => match session.authenticate().await {
						Ok(()) => log::debug!("GEE session refreshed"),
						Err(err) => log::error!("GEE session refresh failed: {err:#}"),
					},
					_ = &mut stop_rx => {
						log::info!("GEE session refresh loop stopped");
						break;
					}
				}
			}
		});
		*self.refresher.lock() = Some((stop_tx, handle));
	}

	/// Perform the binary handshake and store the extracted session id.
	pub async fn authenticate(&self) -> Result<()> {
		let body = self.raw_handshake().await?;
		let session_id = extract_session_id(&body)?;
		log::info!("obtained GEE session id ({} chars)", session_id.len());
		*self.session_id.write() = session_id;
		Ok(())
	}

	async fn raw_handshake(&self) -> Result<Vec<u8>> {
		let url = format!("{}{}", self.base_url, AUTH_PATH);
		let response = self
			.client
			.post(&url)
			.header(header::CONTENT_TYPE, "application/octet-stream")
			.header(header::USER_AGENT, GEE_USER_AGENT)
			.body(self.auth_body.clone())
			.send()
			.await
			.with_context(|| format!("GEE auth request to {url}"))?;

		let status = response.status();
		ensure!(status == StatusCode::OK, "GEE auth request failed with status {status}");

		Ok(response.bytes().await.context("reading GEE auth response")?.to_vec())
	}

	/// Re-issue the handshake and hand back the raw response body, without
	/// touching the stored session. Used to answer downstream `geauth`
	/// requests from desktop clients that perform their own handshake.
	pub async fn auth_response_bytes(&self) -> Result<Vec<u8>> {
		self.raw_handshake().await
	}

	/// The current session id; empty while no handshake has succeeded yet.
	pub fn session_id(&self) -> String {
		self.session_id.read().clone()
	}

	/// Forward a request to `{base}{path}` with the session cookie attached,
	/// returning the upstream response untouched for streaming.
	///
	/// `path` must start with `/` and already carry the query string.
	pub async fn relay(&self, method: Method, path: &str, body: Bytes) -> Result<Response> {
		let url = format!("{}{}", self.base_url, path);

		let mut request = self
			.client
			.request(method, &url)
			.header(header::USER_AGENT, GEE_USER_AGENT)
			.header(header::ACCEPT, "*/*");

		let session_id = self.session_id();
		if session_id.is_empty() {
			log::warn!("GEE session id is empty, relayed request may fail");
		} else {
			request = request.header(header::COOKIE, format!("SessionId={session_id}"));
		}
		if !body.is_empty() {
			request = request.body(body);
		}

		let response = request
			.send()
			.await
			.with_context(|| format!("GEE relay request to {url}"))?;
		log::debug!("GEE relay {url} -> {}", response.status());
		Ok(response)
	}

	/// Stop the refresh loop and wait for it to finish.
	pub async fn shutdown(&self) {
		let refresher = self.refresher.lock().take();
		if let Some((stop, handle)) = refresher {
			let _ = stop.send(());
			if let Err(err) = handle.await {
				log::warn!("GEE refresh task join error: {err}");
			}
		}
	}
}

/// Extract the session id from an auth response.
///
/// The slice offsets depend on the observed body length; any other length
/// is a hard error (the offset table is all we know about the format).
fn extract_session_id(body: &[u8]) -> Result<String> {
	let range = match body.len() {
		112 => 8..88,
		124 => 8..100,
		136 => 8..112,
		144 => 8..120,
		len => bail!("unexpected GEE auth response length {len}, cannot extract session id"),
	};

	let session_id = std::str::from_utf8(&body[range])
		.context("GEE session id is not valid ascii")?
		.to_string();
	ensure!(!session_id.is_empty(), "extracted GEE session id is empty");
	Ok(session_id)
}
