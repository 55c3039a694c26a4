//! Blocking client.
//!
//! Same operations as the async [`crate::Client`], executed on the calling
//! thread. Must not be created or used from inside an async runtime.

use crate::client::remember_input;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::request;
use crate::response::decode;
use crate::transport::BlockingTransport;
use maia_types::*;

/// Blocking client for the MAIA API.
///
/// Owns its connection pool; release it with [`Client::close`] or by letting
/// the client drop at the end of its scope.
///
/// ```rust,no_run
/// use maia_client::blocking::Client;
///
/// # fn example() -> maia_client::Result<()> {
/// let client = Client::new("http://localhost:8080")?;
/// let memory = client.remember("default", "User prefers dark mode")?;
/// client.forget(&memory.id)?;
/// client.close();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client {
    transport: BlockingTransport,
}

impl Client {
    /// Client for `base_url` with default timeout and headers.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(base_url))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            transport: BlockingTransport::new(&config)?,
        })
    }

    /// Client configured from `MAIA_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::with_config(ClientConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Release the connection pool.
    pub fn close(self) {
        tracing::debug!(base_url = %self.base_url(), "closing client");
    }

    // ----- health -----

    pub fn health(&self) -> Result<HealthResponse> {
        decode(self.transport.execute(request::health())?)
    }

    /// Succeeds when the server is ready; the body is ignored.
    pub fn ready(&self) -> Result<()> {
        self.transport.execute_discard(request::ready())
    }

    pub fn stats(&self) -> Result<Stats> {
        decode(self.transport.execute(request::stats())?)
    }

    // ----- memories -----

    pub fn create_memory(&self, input: &CreateMemoryInput) -> Result<Memory> {
        let req = request::create_memory(input)?;
        decode(self.transport.execute(req)?)
    }

    pub fn get_memory(&self, id: &str) -> Result<Memory> {
        let req = request::get_memory(id)?;
        decode(self.transport.execute(req)?)
    }

    pub fn update_memory(&self, id: &str, input: &UpdateMemoryInput) -> Result<Memory> {
        let req = request::update_memory(id, input)?;
        decode(self.transport.execute(req)?)
    }

    pub fn delete_memory(&self, id: &str) -> Result<()> {
        let req = request::delete_memory(id)?;
        self.transport.execute(req)?;
        Ok(())
    }

    /// `None` searches with an empty filter.
    pub fn search_memories(
        &self,
        input: Option<&SearchMemoriesInput>,
    ) -> Result<ListResponse<SearchResult>> {
        let req = request::search_memories(input)?;
        decode(self.transport.execute(req)?)
    }

    // ----- namespaces -----

    pub fn create_namespace(&self, input: &CreateNamespaceInput) -> Result<Namespace> {
        let req = request::create_namespace(input)?;
        decode(self.transport.execute(req)?)
    }

    pub fn get_namespace(&self, id_or_name: &str) -> Result<Namespace> {
        let req = request::get_namespace(id_or_name)?;
        decode(self.transport.execute(req)?)
    }

    pub fn update_namespace(
        &self,
        id: &str,
        input: &UpdateNamespaceInput,
    ) -> Result<Namespace> {
        let req = request::update_namespace(id, input)?;
        decode(self.transport.execute(req)?)
    }

    pub fn delete_namespace(&self, id: &str) -> Result<()> {
        let req = request::delete_namespace(id)?;
        self.transport.execute(req)?;
        Ok(())
    }

    pub fn list_namespaces(
        &self,
        options: Option<&ListOptions>,
    ) -> Result<ListResponse<Namespace>> {
        let req = request::list_namespaces(options);
        decode(self.transport.execute(req)?)
    }

    pub fn list_namespace_memories(
        &self,
        namespace: &str,
        options: Option<&ListOptions>,
    ) -> Result<ListResponse<Memory>> {
        let req = request::list_namespace_memories(namespace, options)?;
        decode(self.transport.execute(req)?)
    }

    // ----- context -----

    pub fn get_context(&self, input: &GetContextInput) -> Result<ContextResponse> {
        let req = request::get_context(input)?;
        decode(self.transport.execute(req)?)
    }

    // ----- convenience -----

    /// Store `content` as a user-sourced semantic memory with full confidence.
    pub fn remember(
        &self,
        namespace: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Memory> {
        self.create_memory(&remember_input(namespace, content))
    }

    /// Assemble context for `query`.
    pub fn recall(
        &self,
        query: impl Into<String>,
        options: RecallOptions,
    ) -> Result<ContextResponse> {
        self.get_context(&GetContextInput::new(query).with_options(options))
    }

    pub fn forget(&self, id: &str) -> Result<()> {
        self.delete_memory(id)
    }
}
