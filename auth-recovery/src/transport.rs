use async_trait::async_trait;
use tracing::debug;

/// Delivery seam for one-time codes.
///
/// Real delivery (email, SMS) lives outside this core; implementations
/// here only have to accept the code and route it somewhere.
#[async_trait]
pub trait CodeTransport: Send + Sync {
    async fn deliver(&self, identifier: &str, code: &str) -> anyhow::Result<()>;
}

/// Development transport: surfaces the code on the log stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTransport;

#[async_trait]
impl CodeTransport for TracingTransport {
    async fn deliver(&self, identifier: &str, code: &str) -> anyhow::Result<()> {
        debug!(identifier = %identifier, code = %code, "one-time code issued (dev transport)");
        Ok(())
    }
}

/// Transport that drops every code. Useful in tests that only exercise
/// throttling and error paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTransport;

#[async_trait]
impl CodeTransport for NullTransport {
    async fn deliver(&self, _identifier: &str, _code: &str) -> anyhow::Result<()> {
        Ok(())
    }
}
