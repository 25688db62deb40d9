//! # Sightline CDP - Chrome DevTools Protocol Client
//!
//! Low-level Chrome DevTools Protocol (CDP) implementation over WebSocket,
//! providing the wire layer for Sightline browser automation.
//!
//! This crate handles:
//! - WebSocket connection management to Chromium-family browsers
//! - CDP message framing, serialization, and response correlation
//! - Event fan-out to subscribers
//! - Debugging-endpoint discovery over HTTP
//!
//! ## Quick Start
//!
//! ```no_run
//! use sightline_cdp::CdpClient;
//! use sightline_cdp::protocol::target::GetTargetsResult;
//!
//! # async fn example() -> Result<(), sightline_cdp::CdpError> {
//! // Connect to a target's WebSocket endpoint
//! let client = CdpClient::connect("ws://localhost:9222/devtools/page/TARGET").await?;
//!
//! // Send a typed CDP command
//! let targets: GetTargetsResult = client
//!     .send_command("Target.getTargets", None::<()>)
//!     .await?;
//!
//! for target in targets.target_infos {
//!     println!("{} - {}", target.target_type, target.url);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Subscribing to Events
//!
//! ```no_run
//! use sightline_cdp::CdpClient;
//!
//! # async fn example(client: &CdpClient) {
//! let mut events = client.subscribe_events();
//! while let Ok(event) = events.recv().await {
//!     match event.method.as_str() {
//!         "Page.loadEventFired" => println!("page loaded"),
//!         "Network.requestWillBeSent" => println!("request: {:?}", event.params),
//!         _ => {}
//!     }
//! }
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`connection`] - WebSocket client and endpoint discovery
//! - [`transport`] - Wire frame types and serialization
//! - [`protocol`] - Typed CDP domain definitions
//! - [`error`] - Error types

pub mod connection;
pub mod error;
pub mod protocol;
pub mod transport;

pub use connection::CdpClient;
pub use connection::discovery::{BrowserVersion, discover_websocket_url, page_ws_url};
pub use error::CdpError;
pub use transport::{CdpEvent, CdpMessage, CdpRequest, CdpResponse};
