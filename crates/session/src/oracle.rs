use crate::error::Result;
use async_trait::async_trait;

/// Anything that can compile the project and report the raw compiler output.
#[async_trait]
pub trait BuildOracle: Send {
    /// One full compile round-trip
    async fn compile(&mut self) -> Result<String>;
}
