//! Main server orchestration

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tracing::{info, warn};

use crate::transport::HttpTransport;
use vault_core::ItemService;

/// Default listen port
pub const DEFAULT_PORT: u16 = 8080;

/// textvault HTTP server
pub struct VaultServer {
    service: Arc<ItemService>,
    addr: SocketAddr,
}

impl VaultServer {
    /// Create a new server listening on all interfaces at the default port
    pub fn new(service: Arc<ItemService>) -> Self {
        Self {
            service,
            addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
        }
    }

    /// Set the listen address
    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Run the server until Ctrl-C
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        info!(
            "Starting textvault on {} with {} storage",
            self.addr,
            self.service.backend_name()
        );

        let transport = HttpTransport::new(self.service.clone(), self.addr);
        transport.run(shutdown_signal()).await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
    }
}
