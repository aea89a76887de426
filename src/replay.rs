use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::channel::LocalEventChannel;
use crate::error::Result;
use crate::events::BackendEvent;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    pub emitted: usize,
    pub skipped: usize,
}

/// Read JSON-lines event envelopes and emit them in order. Blank lines are
/// ignored and lines that fail to parse are logged and skipped.
pub async fn pump_events<R>(reader: R, channel: &LocalEventChannel) -> Result<ReplayStats>
where
    R: AsyncBufRead + Unpin,
{
    let mut stats = ReplayStats::default();
    let mut lines = reader.lines();
    let mut line_no = 0;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match BackendEvent::from_json(line) {
            Ok(event) => {
                tracing::trace!(line = line_no, event = %event.kind(), "emitting event");
                channel.emit(&event);
                stats.emitted += 1;
            }
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "skipping malformed event");
                stats.skipped += 1;
            }
        }
    }

    Ok(stats)
}
