use crate::adapter::Error;
use heapless::String;

/// Max. length of a remote host (IP address or domain name)
pub const MAX_HOST_LENGTH: usize = 64;

/// Connection state of the module. Transitions are driven by the handshake methods of [Adapter](crate::adapter::Adapter).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionStatus {
    /// Module was not initialized yet
    #[default]
    Uninitialized,
    /// Module responded to the liveness probe and was reset to station mode
    ModuleReady,
    /// Module joined the WIFI network
    WifiAssociated,
    /// Joining the WIFI network was rejected
    WifiFailed,
    /// TCP connection is established
    TcpOpen,
    /// TCP connect was rejected
    TcpFailed,
    /// TCP connection was closed by request
    TcpClosed,
}

/// Remote TCP endpoint of the last connect call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    /// Remote IP or domain name
    pub host: String<MAX_HOST_LENGTH>,

    /// Remote port
    pub port: u16,
}

/// Network state, owned by the adapter
#[derive(Clone, Debug, Default)]
pub struct Session {
    /// Last endpoint passed to connect. Gets reused when reconnecting.
    endpoint: Option<Endpoint>,

    /// Current connection status
    status: ConnectionStatus,
}

impl Session {
    /// Stores the remote endpoint. Fails if host exceeds [MAX_HOST_LENGTH].
    pub fn set_endpoint(&mut self, host: &str, port: u16) -> Result<(), Error> {
        let mut stored = String::new();
        stored.push_str(host).map_err(|_| Error::InvalidHostLength)?;

        self.endpoint = Some(Endpoint { host: stored, port });
        Ok(())
    }

    /// Returns the endpoint of the last connect call
    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }

    pub fn set_status(&mut self, status: ConnectionStatus) {
        if self.status != status {
            log::info!("Connection status {:?} -> {:?}", self.status, status);
        }

        self.status = status;
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Returns true if a TCP connection may be opened in the current state. Requires an initialized module whose
    /// WIFI join was not rejected. A join still being processed by the module (status stays
    /// [ConnectionStatus::ModuleReady]) does not block the connect.
    pub fn may_open_tcp(&self) -> bool {
        matches!(
            self.status,
            ConnectionStatus::ModuleReady
                | ConnectionStatus::WifiAssociated
                | ConnectionStatus::TcpOpen
                | ConnectionStatus::TcpFailed
                | ConnectionStatus::TcpClosed
        )
    }
}
