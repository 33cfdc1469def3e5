use std::time::{Duration, Instant};

/// Call `frame` every `interval`, `frames` times (forever when `None`).
///
/// Frames are scheduled against the loop's start time, so a slow frame does
/// not push every later frame back. The first error stops the loop. Returns
/// the number of frames run.
pub fn run_loop<F>(interval: Duration, frames: Option<u64>, mut frame: F) -> anyhow::Result<u64>
where
    F: FnMut(u64) -> anyhow::Result<()>,
{
    let start = Instant::now();
    let mut n = 0;
    while frames.is_none_or(|limit| n < limit) {
        frame(n)?;
        n += 1;
        if frames == Some(n) {
            break;
        }
        if let Some(due) = deadline(start, interval, n) {
            let now = Instant::now();
            if due > now {
                std::thread::sleep(due - now);
            }
        }
    }
    Ok(n)
}

/// When frame `n` is due, or `None` if that instant is not representable.
/// Frame counts past `u32::MAX` saturate rather than wrap.
fn deadline(start: Instant, interval: Duration, n: u64) -> Option<Instant> {
    let offset = interval.saturating_mul(u32::try_from(n).unwrap_or(u32::MAX));
    start.checked_add(offset)
}
