use embassy_futures::select::{select, Either};
use embedded_hal_async::delay::DelayNs;

use crate::clock::Clock;
use crate::debug2defmt_wrapper::Debug2DefmtWrapper;
use crate::error::Error;
use crate::sentence::Sentence;
use crate::transport::{LineBuffer, Transport};

/// Pulls lines off a [`Transport`] until one starts with the requested tag.
///
/// The reader never busy-waits: while the transport has nothing buffered it
/// sleeps for the poll interval, and every wait is capped by the time left
/// until the caller's deadline.
pub struct SentenceReader<T: Transport, K: Clock, D: DelayNs> {
    transport: T,
    clock: K,
    delay: D,
    poll_interval_ms: u32,
    line: LineBuffer,
}

impl<T: Transport, K: Clock, D: DelayNs> SentenceReader<T, K, D> {
    pub fn new(transport: T, clock: K, delay: D, poll_interval_ms: u32) -> Self {
        Self {
            transport,
            clock,
            delay,
            poll_interval_ms: poll_interval_ms.max(1),
            line: LineBuffer::new(),
        }
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Returns the first line starting with `type_prefix` (exact, case
    /// sensitive), trimmed. Lines that can't be read or aren't UTF-8 are
    /// skipped, as is everything with another prefix.
    ///
    /// Fails with [`Error::Timeout`] once `timeout_ms` has passed since the
    /// call, at most one poll interval late. A failed read is followed by the
    /// same sleep as an idle poll.
    pub async fn read_sentence(&mut self, type_prefix: &str, timeout_ms: u32) -> Result<Sentence, Error> {
        let start = self.clock.now_ms();
        let timeout = timeout_ms as f64;

        loop {
            let elapsed = self.clock.now_ms() - start;
            if elapsed >= timeout {
                log_debug!("no {} sentence within {}ms", type_prefix, timeout_ms);
                return Err(Error::Timeout);
            }
            let remaining_ms = ceil_ms(timeout - elapsed);

            let available = match self.transport.bytes_available() {
                Ok(available) => available,
                Err(e) => {
                    log_warn!("Error polling transport: {:?}", Debug2DefmtWrapper(&e));
                    false
                }
            };
            if !available {
                self.delay
                    .delay_ms(self.poll_interval_ms.min(remaining_ms))
                    .await;
                continue;
            }

            let read = select(
                self.transport.read_line(&mut self.line),
                self.delay.delay_ms(remaining_ms),
            )
            .await;
            match read {
                Either::First(Ok(())) => {}
                Either::First(Err(e)) => {
                    log_warn!("Error reading line, skipping: {:?}", Debug2DefmtWrapper(&e));
                    // a UART stuck in an error state still reports ready
                    self.delay
                        .delay_ms(self.poll_interval_ms.min(remaining_ms))
                        .await;
                    continue;
                }
                Either::Second(()) => {
                    log_debug!("line read for {} stalled until the deadline", type_prefix);
                    return Err(Error::Timeout);
                }
            }

            let text = match core::str::from_utf8(&self.line) {
                Ok(text) => text.trim(),
                Err(_) => {
                    log_warn!("Unicode decoding error encountered. Skipping line.");
                    continue;
                }
            };
            if !text.starts_with(type_prefix) {
                log_trace!("discarding {}", text);
                continue;
            }
            match Sentence::try_from(text) {
                Ok(sentence) => {
                    log_trace!("got {}", text);
                    return Ok(sentence);
                }
                Err(_) => log_warn!("sentence too long, skipping"),
            }
        }
    }
}

fn ceil_ms(ms: f64) -> u32 {
    let whole = ms as u32;
    if (whole as f64) < ms {
        whole.saturating_add(1)
    } else {
        whole
    }
}
