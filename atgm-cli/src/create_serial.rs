use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use atgm336h::{Clock, LineBuffer, Transport};
use embedded_hal_async::delay::DelayNs;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::sleep;
use tokio_serial::{SerialPort, SerialPortBuilderExt, SerialStream};

pub struct HostSerial(BufReader<SerialStream>);

impl Transport for HostSerial {
    type Error = io::Error;

    fn bytes_available(&mut self) -> Result<bool, Self::Error> {
        if !self.0.buffer().is_empty() {
            return Ok(true);
        }
        Ok(self.0.get_ref().bytes_to_read()? > 0)
    }

    async fn read_line(&mut self, line: &mut LineBuffer) -> Result<(), Self::Error> {
        let mut raw = Vec::with_capacity(line.capacity());
        self.0.read_until(b'\n', &mut raw).await?;
        match raw.pop() {
            Some(b'\n') => {}
            Some(byte) => raw.push(byte),
            None => return Err(io::ErrorKind::UnexpectedEof.into()),
        }
        line.clear();
        line.extend_from_slice(&raw)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "line too long"))
    }
}

#[derive(Clone, Copy)]
pub struct HostClock(Instant);

impl Default for HostClock {
    fn default() -> Self {
        Self(Instant::now())
    }
}

impl Clock for HostClock {
    fn now_ms(&self) -> f64 {
        self.0.elapsed().as_secs_f64() * 1000.0
    }
}

pub struct Delay;

impl DelayNs for Delay {
    async fn delay_ns(&mut self, ns: u32) {
        sleep(Duration::from_nanos(ns as u64)).await;
    }
}

pub fn create_serial(serial_port_name: String, baud_rate: u32) -> Result<HostSerial> {
    let serial: SerialStream = tokio_serial::new(&serial_port_name, baud_rate)
        .open_native_async()
        .with_context(|| format!("failed to open {}", serial_port_name))?;
    log::info!("opened {} at {} baud", serial_port_name, baud_rate);
    Ok(HostSerial(BufReader::new(serial)))
}
