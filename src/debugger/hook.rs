use crate::debugger::breakpoint::SourcePlace;
use crate::debugger::variable::Variable;

/// Kind of source-line annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Breakpoint,
    /// Line where debugee is stopped.
    Current,
}

/// Editor/UI collaborator. Debugger calls it to reflect a session state.
pub trait EventHook {
    /// Mark a line in a source file.
    fn insert_marker(&self, place: &SourcePlace, kind: MarkerKind);

    fn remove_marker(&self, place: &SourcePlace, kind: MarkerKind);

    /// Remove all markers of the given kind.
    fn clear_markers(&self, kind: MarkerKind);

    /// Show source file at a line where debugee is stopped.
    fn navigate(&self, place: &SourcePlace) -> anyhow::Result<()>;

    fn show_error(&self, title: &str, text: &str);

    /// Ask a user a question, return true if answer is yes.
    fn ask_yes_no(&self, title: &str, question: &str) -> bool;

    /// Called once per variable batch with actual values.
    fn refresh_variables(&self, variables: &[Variable]);

    fn show_text(&self, title: &str, text: &str);

    /// Raw protocol traffic, called only if echo is enabled.
    fn on_echo(&self, _traffic: &str) {}

    /// Output of a debugee running in a dedicated terminal.
    fn on_debugee_output(&self, _output: &[u8]) {}
}
