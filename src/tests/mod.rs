mod channel;
mod session;
mod telemetry;
