//! Interactive questions that the debugger may ask in the middle of a command response.

use crate::debugger::pattern::find_from_end_wildcard;

/// Question about pending breakpoint, asked when breakpoint location is unknown.
pub const PENDING_BREAKPOINT_QUERY: &str =
    "Make breakpoint pending on future shared library load+  ?( ?[?y]? or [?n]? ?)";
pub const PENDING_BREAKPOINT_TITLE: &str = "Cannot set breakpoint";
pub const PENDING_BREAKPOINT_QUESTION: &str =
    "Make breakpoint pending on future shared library load?";

const QUERY_TRAILING_SLACK: usize = 1;

#[derive(Debug, PartialEq)]
pub struct SubQuery {
    /// Wildcard pattern, see [`crate::debugger::pattern`].
    pub pattern: &'static str,
    /// Fixed reply, `None` means that the reply depends on a session state.
    pub reply: Option<&'static str>,
}

impl SubQuery {
    /// True if the reply must be chosen by user.
    pub fn asks_user(&self) -> bool {
        self.reply.is_none()
    }
}

/// Known questions, order matters - first matched wins.
pub static SUB_QUERIES: [SubQuery; 4] = [
    SubQuery {
        pattern: PENDING_BREAKPOINT_QUERY,
        reply: None,
    },
    SubQuery {
        pattern: "( ?[?y]? or [?n]? ?)",
        reply: Some("y\n"),
    },
    SubQuery {
        pattern: "<return> to quit---",
        reply: Some("\n"),
    },
    SubQuery {
        pattern: "c to continue without paging--",
        reply: Some("c\n"),
    },
];

/// Find a question at the end of accumulated output.
pub fn detect(output: &[u8]) -> Option<&'static SubQuery> {
    SUB_QUERIES
        .iter()
        .find(|query| find_from_end_wildcard(output, query.pattern, QUERY_TRAILING_SLACK).is_some())
}
