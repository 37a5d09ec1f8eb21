/// What a single output line meant to the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// Console chatter before the project was selected
    Discarded,
    /// The project-selected marker was seen
    ProjectReady,
    /// Line kept for the pending response
    Buffered,
    /// Completion marker seen; all buffered lines, joined
    Complete(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    AwaitingReady,
    Collecting,
}

/// Line-by-line state machine over the console's output stream.
///
/// Everything before the project-selected marker is dropped. After it, lines
/// accumulate until one contains the completion marker, which closes one
/// response unit (marker line included).
#[derive(Debug, Clone)]
pub struct ResponseScanner {
    ready_marker: String,
    complete_marker: String,
    phase: Phase,
    buffer: Vec<String>,
}

impl ResponseScanner {
    pub fn new(ready_marker: impl Into<String>, complete_marker: impl Into<String>) -> Self {
        Self {
            ready_marker: ready_marker.into(),
            complete_marker: complete_marker.into(),
            phase: Phase::AwaitingReady,
            buffer: Vec::new(),
        }
    }

    pub fn feed(&mut self, line: &str) -> ScanEvent {
        match self.phase {
            Phase::AwaitingReady => {
                if line.contains(&self.ready_marker) {
                    self.phase = Phase::Collecting;
                    ScanEvent::ProjectReady
                } else {
                    ScanEvent::Discarded
                }
            }
            Phase::Collecting => {
                self.buffer.push(line.to_string());
                if line.contains(&self.complete_marker) {
                    let response = std::mem::take(&mut self.buffer).join("\n");
                    ScanEvent::Complete(response)
                } else {
                    ScanEvent::Buffered
                }
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Collecting
    }

    pub fn pending_lines(&self) -> usize {
        self.buffer.len()
    }
}
