//! Synchronous feedback for triggers that declined to start.

use tdnet_types::Target;

/// Shown by the presentation layer as a transient message.
///
/// These never travel through the delivery queue: they are raised on the
/// consumer thread by the trigger itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// The connectivity gate reported the device offline.
    NetworkUnavailable { target: Target },
}

impl Notification {
    #[must_use]
    pub fn format(&self) -> String {
        match self {
            Self::NetworkUnavailable { target } => {
                format!("No network connection; {target} was not fetched.")
            }
        }
    }
}
