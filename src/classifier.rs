//! # Response classification
//!
//! Responses of the ESP-AT are read as raw text, which may be empty (device has not answered yet) or may contain
//! multiple concatenated lines including the command echo. Classification is a plain substring test on the
//! final result codes.

/// Final result code signaling a successful command
pub const SUCCESS_TOKEN: &[u8] = b"OK";

/// Final result code signaling a failed command
pub const ERROR_TOKEN: &[u8] = b"ERROR";

/// Classified response of a single command
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    /// Response contains the success token
    Success,
    /// Response contains the error token, but no success token
    Failure,
    /// Empty response or neither token received yet
    Pending,
}

impl Response {
    /// Returns true for [Response::Success]
    pub fn is_success(&self) -> bool {
        *self == Response::Success
    }
}

/// Classifies the given raw response.
///
/// Success is checked first, so a response containing both tokens (e.g. leftovers of a previous command) counts
/// as success.
pub fn classify<R: AsRef<[u8]>>(raw: R) -> Response {
    let raw = raw.as_ref();

    if contains(raw, SUCCESS_TOKEN) {
        return Response::Success;
    }

    if contains(raw, ERROR_TOKEN) {
        return Response::Failure;
    }

    Response::Pending
}

/// Returns true if needle is contained in haystack
pub(crate) fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    find(haystack, needle).is_some()
}

/// Returns the position of the first occurrence of needle in haystack
pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }

    haystack.windows(needle.len()).position(|window| window == needle)
}
