//! Message types for actor communication.

/// A classified user intent, sent from the event source to the dispatch loop.
///
/// The set is closed: every key the event source cares about maps to exactly
/// one of these, and the dispatch loop matches on them exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Leave without output.
    Exit,
    /// Append a character to the program.
    Commit(char),
    /// Delete the last character of the program.
    Backspace,
    /// Re-run the program.
    Submit,
    /// Leave and write the current result to standard output.
    Print,
    /// Flip compact output and re-run.
    ToggleCompact,
    /// Flip raw string output and re-run.
    ToggleRaw,
    /// Start typing a save destination.
    EnterSavePrompt,
    /// Append a character to the save path.
    SaveCommit(char),
    /// Delete the last character of the save path.
    SaveBackspace,
    /// Leave and write the current result to the save path.
    SaveSubmit,
}

impl Action {
    /// Whether handling this action ends the interactive session.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Exit | Self::Print | Self::SaveSubmit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_actions() {
        assert!(Action::Exit.is_terminal());
        assert!(Action::Print.is_terminal());
        assert!(Action::SaveSubmit.is_terminal());
        assert!(!Action::Submit.is_terminal());
        assert!(!Action::Commit('q').is_terminal());
    }
}
