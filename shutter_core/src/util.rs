//! Timing constants and small filesystem helpers.

use std::time::Duration;
use std::{fs, io::Write, path::Path};

/// Ticker period in milliseconds.
pub const TICK_MS: u64 = 100;
/// Ticker period.
pub const TICK: Duration = Duration::from_millis(TICK_MS);
/// How long the pairing switch reports "on" after a press.
pub const PAIR_RESET: Duration = Duration::from_millis(500);

/// Write `bytes` to `path` via a temporary sibling and a rename, so readers
/// never observe a half-written file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("new");
    {
        let mut f = fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    fs::rename(tmp, path)
}

/// Map an identifier to a file stem: `[A-Za-z0-9_-]` kept, everything else `_`.
pub fn sanitize_id(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
