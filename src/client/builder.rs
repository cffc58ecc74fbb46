// ABOUTME: Builder for wiring an MmsManager to a transport service endpoint
// ABOUTME: Provides quick constructors for TCP and Unix socket services plus a fluent form

use crate::client::directory::{Endpoint, SERVICE_NAME, ServiceDirectory};
use crate::client::manager::MmsManager;
use std::net::SocketAddr;
#[cfg(unix)]
use std::path::PathBuf;

/// Factory for `MmsManager` instances backed by a [`ServiceDirectory`]
///
/// The manager still resolves the service on every call; the builder only
/// decides which name it resolves and where that name points.
#[derive(Debug)]
pub struct ClientBuilder {
    service_name: String,
    endpoint: Option<Endpoint>,
    directory: ServiceDirectory,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            service_name: SERVICE_NAME.to_string(),
            endpoint: None,
            directory: ServiceDirectory::new(),
        }
    }
}

/// Convenience functions for quick client creation
impl ClientBuilder {
    /// Manager for a transport service listening on `addr`
    pub fn tcp(addr: SocketAddr) -> MmsManager<ServiceDirectory> {
        Self::new().endpoint(Endpoint::Tcp(addr)).build()
    }

    /// Manager for a transport service listening on the Unix socket at `path`
    #[cfg(unix)]
    pub fn unix(path: impl Into<PathBuf>) -> MmsManager<ServiceDirectory> {
        Self::new().endpoint(Endpoint::Unix(path.into())).build()
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the manager resolves (default: [`SERVICE_NAME`])
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    /// Endpoint registered under the manager's service name
    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Register an additional name in the directory
    pub fn register(mut self, name: impl Into<String>, endpoint: Endpoint) -> Self {
        self.directory.register(name, endpoint);
        self
    }

    pub fn build(self) -> MmsManager<ServiceDirectory> {
        let mut directory = self.directory;
        if let Some(endpoint) = self.endpoint {
            directory.register(self.service_name.clone(), endpoint);
        }
        MmsManager::with_service_name(directory, self.service_name)
    }
}
