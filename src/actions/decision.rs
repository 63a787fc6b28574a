//! Sources of user decisions for the deletion engine.
//!
//! The engine never reads a terminal itself. It asks a [`DecisionProvider`]
//! for the batch confirmation and for the keeper of each group in
//! interactive mode, and it validates the raw answers itself.
//!
//! - [`ConsoleDecisions`] prompts on a writer and reads lines from a reader
//!   (stdin and stdout for the binary).
//! - [`ScriptedDecisions`] replays canned answers.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::duplicates::DuplicateGroup;

/// Answers the questions the deletion engine asks.
pub trait DecisionProvider {
    /// Ask a yes/no question. Anything but an explicit yes is a no.
    fn confirm(&mut self, prompt: &str) -> bool;

    /// Ask which member of a group to keep.
    ///
    /// Returns the raw answer, or `None` when no more input is available.
    fn select_keeper(&mut self, group_number: usize, group: &DuplicateGroup) -> Option<String>;

    /// Tell the user an answer was not accepted.
    fn reject(&mut self, _message: &str) {}
}

/// Whether an answer is an explicit yes (`y` or `yes`, any case).
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Line-oriented prompts over a reader/writer pair.
#[derive(Debug)]
pub struct ConsoleDecisions<R, W> {
    input: R,
    output: W,
    assume_yes: bool,
}

impl ConsoleDecisions<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on stdout and read answers from stdin.
    #[must_use]
    pub fn stdio(assume_yes: bool) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), assume_yes)
    }
}

impl<R: BufRead, W: Write> ConsoleDecisions<R, W> {
    /// Create prompts over the given streams.
    ///
    /// With `assume_yes`, [`DecisionProvider::confirm`] answers yes without
    /// prompting; keeper selection still prompts.
    pub fn new(input: R, output: W, assume_yes: bool) -> Self {
        Self {
            input,
            output,
            assume_yes,
        }
    }

    /// Give back the underlying streams.
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn read_answer(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                log::warn!("Failed to read answer: {}", e);
                None
            }
        }
    }

    fn prompt(&mut self, text: &str) {
        // A broken terminal only loses the prompt text.
        let _ = write!(self.output, "{text}");
        let _ = self.output.flush();
    }
}

impl<R: BufRead, W: Write> DecisionProvider for ConsoleDecisions<R, W> {
    fn confirm(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            log::debug!("Confirmation assumed: {}", prompt.trim());
            return true;
        }
        self.prompt(prompt);
        self.read_answer().is_some_and(|a| is_affirmative(&a))
    }

    fn select_keeper(&mut self, group_number: usize, group: &DuplicateGroup) -> Option<String> {
        let mut listing = format!("\nGroup {} ({} files):\n", group_number, group.len());
        for (i, path) in group.paths.iter().enumerate() {
            listing.push_str(&format!("  [{}] {}\n", i + 1, path.display()));
        }
        listing.push_str(&format!(
            "Select the file to KEEP [1-{}], or press Enter to skip this group: ",
            group.len()
        ));
        self.prompt(&listing);
        self.read_answer()
    }

    fn reject(&mut self, message: &str) {
        let _ = writeln!(self.output, "{message}");
    }
}

/// Canned answers, consumed in order.
#[derive(Debug, Default)]
pub struct ScriptedDecisions {
    confirmations: VecDeque<bool>,
    selections: VecDeque<String>,
    /// Prompts passed to `confirm`, in order
    pub prompts: Vec<String>,
    /// Messages passed to `reject`, in order
    pub rejections: Vec<String>,
}

impl ScriptedDecisions {
    /// Start with no answers; every confirmation is a no and every
    /// selection reports exhausted input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a confirmation answer.
    #[must_use]
    pub fn confirm_with(mut self, answer: bool) -> Self {
        self.confirmations.push_back(answer);
        self
    }

    /// Queue raw keeper selections.
    #[must_use]
    pub fn select_with<I, S>(mut self, answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selections.extend(answers.into_iter().map(Into::into));
        self
    }
}

impl DecisionProvider for ScriptedDecisions {
    fn confirm(&mut self, prompt: &str) -> bool {
        self.prompts.push(prompt.to_string());
        self.confirmations.pop_front().unwrap_or(false)
    }

    fn select_keeper(&mut self, _group_number: usize, _group: &DuplicateGroup) -> Option<String> {
        self.selections.pop_front()
    }

    fn reject(&mut self, message: &str) {
        self.rejections.push(message.to_string());
    }
}
