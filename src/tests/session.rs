use crate::adapter::Error;
use crate::session::{ConnectionStatus, Session};

#[test]
fn test_default_session() {
    let session = Session::default();

    assert_eq!(ConnectionStatus::Uninitialized, session.status());
    assert!(session.endpoint().is_none());
}

#[test]
fn test_set_endpoint() {
    let mut session = Session::default();
    session.set_endpoint("10.0.0.5", 8080).unwrap();

    let endpoint = session.endpoint().unwrap();
    assert_eq!("10.0.0.5", endpoint.host.as_str());
    assert_eq!(8080, endpoint.port);
}

#[test]
fn test_set_endpoint_replaces_previous() {
    let mut session = Session::default();
    session.set_endpoint("10.0.0.5", 8080).unwrap();
    session.set_endpoint("example.org", 21).unwrap();

    let endpoint = session.endpoint().unwrap();
    assert_eq!("example.org", endpoint.host.as_str());
    assert_eq!(21, endpoint.port);
}

#[test]
fn test_set_endpoint_host_too_long() {
    let mut session = Session::default();
    session.set_endpoint("10.0.0.5", 8080).unwrap();

    let host = "a".repeat(65);
    assert_eq!(Error::InvalidHostLength, session.set_endpoint(&host, 80).unwrap_err());

    // Previous endpoint is kept
    assert_eq!("10.0.0.5", session.endpoint().unwrap().host.as_str());
}

#[test]
fn test_set_endpoint_max_host_length() {
    let mut session = Session::default();
    let host = "a".repeat(64);

    session.set_endpoint(&host, 80).unwrap();
    assert_eq!(64, session.endpoint().unwrap().host.len());
}

#[test]
fn test_may_open_tcp() {
    let mut session = Session::default();

    for status in [
        ConnectionStatus::Uninitialized,
        ConnectionStatus::WifiFailed,
    ] {
        session.set_status(status);
        assert!(!session.may_open_tcp(), "{:?}", status);
    }

    for status in [
        ConnectionStatus::ModuleReady,
        ConnectionStatus::WifiAssociated,
        ConnectionStatus::TcpOpen,
        ConnectionStatus::TcpFailed,
        ConnectionStatus::TcpClosed,
    ] {
        session.set_status(status);
        assert!(session.may_open_tcp(), "{:?}", status);
    }
}
