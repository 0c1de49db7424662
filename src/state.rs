//! Input State: the program being edited, the save-path sub-mode, and the
//! dirty flags that tell the dispatch loop what to repaint.

/// Which buffer keystrokes currently edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Editing the query program.
    #[default]
    Program,
    /// Typing the destination path for a save.
    SavePath,
}

/// Editable text owned by the dispatch loop.
///
/// Buffers hold Unicode scalar values; a backspace always removes exactly
/// one of them, whatever its UTF-8 length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    program: String,
    mode: Mode,
    save_path: String,
    /// One-slot staging register between classification and mutation.
    pending: Option<char>,
    input_dirty: bool,
    results_dirty: bool,
}

impl InputState {
    /// Start in program mode with `program` as the text; the input row is
    /// dirty so the first render paints it.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            input_dirty: true,
            ..Self::default()
        }
    }

    /// The live query text.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The save destination typed so far.
    pub fn save_path(&self) -> &str {
        &self.save_path
    }

    /// Current editing mode.
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// The buffer selected by the mode.
    pub fn active_text(&self) -> &str {
        match self.mode {
            Mode::Program => &self.program,
            Mode::SavePath => &self.save_path,
        }
    }

    /// The character staged for the next [`append_char`](Self::append_char).
    pub const fn pending(&self) -> Option<char> {
        self.pending
    }

    /// Stage a typed character.
    pub fn stage(&mut self, ch: char) {
        self.pending = Some(ch);
    }

    /// Move the staged character onto the end of the active buffer.
    ///
    /// Without a staged character this does nothing.
    pub fn append_char(&mut self) {
        let Some(ch) = self.pending.take() else {
            return;
        };
        self.active_mut().push(ch);
        self.input_dirty = true;
    }

    /// Remove the last character of the active buffer, if any.
    pub fn backspace(&mut self) {
        self.active_mut().pop();
        self.input_dirty = true;
    }

    /// Switch to save-path editing with an empty path.
    pub fn enter_save_mode(&mut self) {
        self.mode = Mode::SavePath;
        self.save_path.clear();
        self.pending = None;
        self.input_dirty = true;
    }

    /// Record that the results region needs repainting.
    pub fn mark_results_dirty(&mut self) {
        self.results_dirty = true;
    }

    /// Read and clear the input-row dirty flag.
    pub fn take_input_dirty(&mut self) -> bool {
        std::mem::take(&mut self.input_dirty)
    }

    /// Read and clear the results dirty flag.
    pub fn take_results_dirty(&mut self) -> bool {
        std::mem::take(&mut self.results_dirty)
    }

    fn active_mut(&mut self) -> &mut String {
        match self.mode {
            Mode::Program => &mut self.program,
            Mode::SavePath => &mut self.save_path,
        }
    }
}
