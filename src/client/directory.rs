// ABOUTME: Name-to-endpoint service directory, the default ServiceLocator implementation
// ABOUTME: Resolving a name opens a fresh TCP or Unix socket connection to the registered endpoint

use crate::client::error::ServiceUnavailable;
use crate::client::remote::RemoteService;
use crate::client::traits::ServiceLocator;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::net::SocketAddr;
#[cfg(unix)]
use std::path::PathBuf;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
#[cfg(unix)]
use tokio::net::UnixStream;
use tracing::debug;

/// Well-known name the transport service registers under
pub const SERVICE_NAME: &str = "mms";

/// Socket the transport service listens on unless configured otherwise
#[cfg(unix)]
pub const DEFAULT_SOCKET_PATH: &str = "/run/mms/transport.sock";

/// Loopback port the transport service listens on where Unix sockets are unavailable
pub const DEFAULT_TCP_PORT: u16 = 2949;

/// Any stream a resolved service handle can write to
pub trait Transport: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> Transport for T {}

/// Where a transport service can be reached
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// TCP socket address
    Tcp(SocketAddr),
    /// Unix domain socket path
    #[cfg(unix)]
    Unix(PathBuf),
}

impl Endpoint {
    /// Loopback TCP endpoint on the default port
    pub fn loopback() -> Self {
        Endpoint::Tcp(SocketAddr::from(([127, 0, 0, 1], DEFAULT_TCP_PORT)))
    }

    /// Open a new stream to this endpoint
    pub async fn connect(&self) -> io::Result<Box<dyn Transport>> {
        match self {
            Endpoint::Tcp(addr) => {
                let stream = TcpStream::connect(addr).await?;
                Ok(Box::new(stream))
            }
            #[cfg(unix)]
            Endpoint::Unix(path) => {
                let stream = UnixStream::connect(path).await?;
                Ok(Box::new(stream))
            }
        }
    }
}

impl Default for Endpoint {
    #[cfg(unix)]
    fn default() -> Self {
        Endpoint::Unix(PathBuf::from(DEFAULT_SOCKET_PATH))
    }

    #[cfg(not(unix))]
    fn default() -> Self {
        Endpoint::loopback()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Tcp(addr) => write!(f, "tcp://{addr}"),
            #[cfg(unix)]
            Endpoint::Unix(path) => write!(f, "unix://{}", path.display()),
        }
    }
}

/// Registry mapping service names to endpoints
///
/// Every `resolve` looks the name up and connects anew. Nothing is cached
/// between calls, so a service that restarts on a new endpoint is picked up
/// as soon as it is re-registered.
#[derive(Clone, Debug, Default)]
pub struct ServiceDirectory {
    services: HashMap<String, Endpoint>,
}

impl ServiceDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory with [`SERVICE_NAME`] registered at the default endpoint
    pub fn with_defaults() -> Self {
        Self::new().with_service(SERVICE_NAME, Endpoint::default())
    }

    /// Register `name` at `endpoint`, returning the endpoint it replaced
    pub fn register(&mut self, name: impl Into<String>, endpoint: Endpoint) -> Option<Endpoint> {
        self.services.insert(name.into(), endpoint)
    }

    /// Builder-style [`register`](Self::register)
    pub fn with_service(mut self, name: impl Into<String>, endpoint: Endpoint) -> Self {
        self.register(name, endpoint);
        self
    }

    pub fn deregister(&mut self, name: &str) -> Option<Endpoint> {
        self.services.remove(name)
    }

    pub fn lookup(&self, name: &str) -> Option<&Endpoint> {
        self.services.get(name)
    }
}

impl ServiceLocator for ServiceDirectory {
    type Service = RemoteService<Box<dyn Transport>>;

    async fn resolve(&self, name: &str) -> Result<Self::Service, ServiceUnavailable> {
        let endpoint = self
            .lookup(name)
            .ok_or_else(|| ServiceUnavailable::NotRegistered {
                name: name.to_string(),
            })?;

        let stream = endpoint
            .connect()
            .await
            .map_err(|source| ServiceUnavailable::Unreachable {
                name: name.to_string(),
                endpoint: endpoint.to_string(),
                source,
            })?;

        debug!(service = name, %endpoint, "resolved transport service");
        Ok(RemoteService::new(stream))
    }
}
