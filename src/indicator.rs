//! # Visual feedback
//!
//! Handshake progress and failures are reported by an [Indicator], e.g. an LED matrix showing an icon per
//! [Feedback] state. Rendering is up to the implementation.

/// Feedback states reported by the adapter
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Feedback {
    /// Module responded to the initial liveness probe
    ModuleAlive,
    /// Module did not respond to the initial liveness probe
    ModuleNotResponding,
    /// Module responded after reset
    ResetConfirmed,
    /// Module did not respond after reset yet
    ResetPending,
    /// WIFI network joined
    WifiJoined,
    /// Joining the WIFI network was rejected
    WifiRejected,
    /// Static IP was accepted
    StaticIpAssigned,
    /// Static IP was rejected or not confirmed
    StaticIpRejected,
    /// TCP connection established
    TcpConnected,
    /// TCP connect was rejected
    TcpRejected,
    /// TCP connection gets reestablished
    Reconnecting,
    /// Activated by inbound command
    Activated,
}

/// Output device for feedback states
pub trait Indicator {
    /// Shows the given feedback state
    fn show(&mut self, feedback: Feedback);

    /// Clears any shown state
    fn clear(&mut self);
}

/// Indicator discarding all feedback
#[derive(Copy, Clone, Debug, Default)]
pub struct NoIndicator;

impl Indicator for NoIndicator {
    fn show(&mut self, _feedback: Feedback) {}

    fn clear(&mut self) {}
}
