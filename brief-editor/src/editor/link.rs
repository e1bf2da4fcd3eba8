//! Asking the user for a link target.

/// Source of link URLs, typically a modal prompt.
pub trait LinkPrompt {
    /// Ask for a URL, pre-filled with `current`. `None` means the user cancelled.
    fn prompt_url(&mut self, current: Option<&str>) -> Option<String>;
}

impl<F> LinkPrompt for F
where
    F: FnMut(Option<&str>) -> Option<String>,
{
    fn prompt_url(&mut self, current: Option<&str>) -> Option<String> {
        self(current)
    }
}

/// Reduce a prompt answer to the href to set; `None` removes the link.
pub fn link_target(answer: Option<String>) -> Option<String> {
    answer
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}
