//! Code fence tracking.
//!
//! Directive syntax inside fenced code blocks is documentation, not a request
//! to render, so the processor asks [`FenceTracker`] before dispatching.

/// Tracks fenced code block state during line-by-line processing.
///
/// Fences open with three or more backticks or tildes; the closing fence
/// uses the same character, is at least as long, and carries no info string.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<(char, usize)>,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feed one line. Returns `true` when the line opened or closed a fence.
    pub(crate) fn update(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();
        let Some((ch, len)) = fence_marker(trimmed) else {
            return false;
        };

        match self.open {
            Some((open_ch, open_len)) => {
                let closes =
                    ch == open_ch && len >= open_len && trimmed[len..].trim().is_empty();
                if closes {
                    self.open = None;
                }
                closes
            }
            None => {
                self.open = Some((ch, len));
                true
            }
        }
    }
}

/// Fence character and run length at the start of a trimmed line.
fn fence_marker(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = trimmed.chars().take_while(|&c| c == first).count();
    (len >= 3).then_some((first, len))
}
