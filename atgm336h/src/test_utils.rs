use core::convert::Infallible;
use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal_async::delay::DelayNs;
use log::LevelFilter;

use crate::clock::Clock;
use crate::transport::{LineBuffer, Transport};

pub(crate) fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

/// Manually advanced clock shared between a test and the code under test.
#[derive(Clone, Default)]
pub(crate) struct FakeClock(Rc<Cell<f64>>);

impl FakeClock {
    pub(crate) fn advance(&self, ms: f64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> f64 {
        self.0.get()
    }
}

/// Delay that completes immediately and moves the [`FakeClock`] forward.
pub(crate) struct FakeDelay {
    clock: FakeClock,
    pub(crate) calls: Rc<Cell<usize>>,
}

impl FakeDelay {
    pub(crate) fn new(clock: FakeClock) -> Self {
        Self {
            clock,
            calls: Rc::new(Cell::new(0)),
        }
    }
}

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.calls.set(self.calls.get() + 1);
        self.clock.advance(ns as f64 / 1_000_000.0);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.calls.set(self.calls.get() + 1);
        self.clock.advance(ms as f64);
    }
}

#[derive(Debug, PartialEq)]
pub(crate) struct FakeTransportError;

/// Hands out whole lines, each becoming available at its arrival time on the
/// shared [`FakeClock`].
pub(crate) struct LineTransport {
    clock: FakeClock,
    lines: VecDeque<(f64, Result<Vec<u8>, FakeTransportError>)>,
}

impl LineTransport {
    pub(crate) fn new(clock: FakeClock) -> Self {
        Self {
            clock,
            lines: VecDeque::new(),
        }
    }

    pub(crate) fn push_line(&mut self, arrival_ms: f64, line: &[u8]) {
        self.lines.push_back((arrival_ms, Ok(line.to_vec())));
    }

    pub(crate) fn push_error(&mut self, arrival_ms: f64) {
        self.lines.push_back((arrival_ms, Err(FakeTransportError)));
    }

    pub(crate) fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl Transport for LineTransport {
    type Error = FakeTransportError;

    fn bytes_available(&mut self) -> Result<bool, Self::Error> {
        Ok(self
            .lines
            .front()
            .is_some_and(|(arrival_ms, _)| *arrival_ms <= self.clock.now_ms()))
    }

    async fn read_line(&mut self, line: &mut LineBuffer) -> Result<(), Self::Error> {
        line.clear();
        match self.lines.pop_front() {
            Some((_, Ok(bytes))) => {
                line.extend_from_slice(&bytes).map_err(|_| FakeTransportError)?;
                Ok(())
            }
            Some((_, Err(e))) => Err(e),
            None => Err(FakeTransportError),
        }
    }
}

/// In-memory UART that returns at most `chunk_size` bytes per read.
pub(crate) struct VecReader {
    pub buffer: Vec<u8>,
    pub offset: usize,
    chunk_size: usize,
}

impl VecReader {
    pub(crate) fn new(buffer: Vec<u8>) -> Self {
        Self::with_chunk_size(buffer, usize::MAX)
    }

    pub(crate) fn with_chunk_size(buffer: Vec<u8>, chunk_size: usize) -> Self {
        Self {
            buffer,
            offset: 0,
            chunk_size,
        }
    }

    fn data_left(&self) -> usize {
        self.buffer.len() - self.offset
    }
}

impl embedded_io_async::ErrorType for VecReader {
    type Error = Infallible;
}

impl embedded_io_async::Read for VecReader {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let len = buf.len().min(self.chunk_size).min(self.data_left());
        buf[..len].copy_from_slice(&self.buffer[self.offset..self.offset + len]);
        self.offset += len;
        Ok(len)
    }
}

impl embedded_io::ReadReady for VecReader {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(self.data_left() > 0)
    }
}
