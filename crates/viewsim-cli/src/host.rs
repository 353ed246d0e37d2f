use indicatif::ProgressBar;
use viewsim_core::error::Result;
use viewsim_core::messages::OutboundMessage;
use viewsim_core::sync::HostChannel;

/// Host channel that prints every outbound message as one JSON line.
#[derive(Debug)]
pub struct StdoutChannel {
    progress: Option<ProgressBar>,
    sent: usize,
}

impl StdoutChannel {
    /// Print above `pb` instead of over it.
    pub fn with_progress(pb: ProgressBar) -> Self {
        Self {
            progress: Some(pb),
            sent: 0,
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent
    }
}

impl HostChannel for StdoutChannel {
    fn send(&mut self, message: &OutboundMessage) -> Result<()> {
        let line = serde_json::to_string(message)?;
        match &self.progress {
            Some(pb) => pb.suspend(|| println!("  -> {line}")),
            None => println!("  -> {line}"),
        }
        self.sent += 1;
        Ok(())
    }
}
