// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Protocol states of one chat request.

/// Where a request is in the two-round tool-calling protocol.
///
/// `Initial -> Done` when the first model call requests no functions,
/// otherwise `Initial -> Dispatching -> Finalizing -> Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolState {
    /// First model call, tools attached.
    Initial,
    /// Running the requested function calls in order.
    Dispatching,
    /// Second model call with the function results replayed.
    Finalizing,
    /// Final text available.
    Done,
}

impl std::fmt::Display for ProtocolState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolState::Initial => write!(f, "initial"),
            ProtocolState::Dispatching => write!(f, "dispatching"),
            ProtocolState::Finalizing => write!(f, "finalizing"),
            ProtocolState::Done => write!(f, "done"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_lowercase() {
        assert_eq!(ProtocolState::Dispatching.to_string(), "dispatching");
        assert_eq!(ProtocolState::Done.to_string(), "done");
    }
}
