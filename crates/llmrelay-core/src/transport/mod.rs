//! Remote completion transports
//!
//! A transport performs exactly one chat completion call with one
//! credential. The `RotatingClient` layers retries and key rotation on top.
//!
//! - `HttpTransport`: OpenAI-compatible `POST /chat/completions` via reqwest
//! - `MockTransport`: deterministic, network-free, records every call

mod error;
mod http;
mod mock;
mod traits;

pub use error::{TransportError, TransportResult};
pub use http::HttpTransport;
pub use mock::{MockCall, MockConfig, MockMode, MockReply, MockTransport};
pub use traits::Transport;

use crate::logging::Logger;
use std::sync::Arc;

/// URL scheme that selects the echoing `MockTransport`
pub const MOCK_SCHEME: &str = "mock://";

/// Create a transport for the given base URL
///
/// `mock://...` yields an echoing `MockTransport`; anything else is treated
/// as an OpenAI-compatible HTTP endpoint.
pub fn create_transport(base_url: &str, logger: Arc<dyn Logger>) -> Arc<dyn Transport> {
    if base_url.starts_with(MOCK_SCHEME) {
        logger.info("[Transport] Using mock transport");
        Arc::new(MockTransport::echo(logger))
    } else {
        Arc::new(HttpTransport::new(base_url, logger))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;

    #[test]
    fn test_create_transport() {
        let logger: Arc<dyn Logger> = Arc::new(NoOpLogger);
        assert_eq!(create_transport("mock://echo", Arc::clone(&logger)).name(), "mock");
        assert_eq!(create_transport("https://api.openai.com/v1", logger).name(), "http");
    }
}
