use core::fmt;

use embedded_io::ReadReady;
use embedded_io_async::Read;
use heapless::Vec;

use crate::sentence::MAX_SENTENCE_LEN;

pub type LineBuffer = Vec<u8, MAX_SENTENCE_LEN>;

/// Byte channel to the receiver, usually a UART.
pub trait Transport {
    type Error: fmt::Debug;

    /// Whether `read_line` has data to work with right now.
    fn bytes_available(&mut self) -> Result<bool, Self::Error>;

    /// Reads up to the next `\n` into `line`, without the `\n`. May wait for
    /// the rest of a partially received line.
    async fn read_line(&mut self, line: &mut LineBuffer) -> Result<(), Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn bytes_available(&mut self) -> Result<bool, Self::Error> {
        (**self).bytes_available()
    }

    async fn read_line(&mut self, line: &mut LineBuffer) -> Result<(), Self::Error> {
        (**self).read_line(line).await
    }
}

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialError<E> {
    Uart(E),
    /// The line did not fit in a [`LineBuffer`]; it was consumed and dropped.
    LineTooLong,
    /// The UART returned zero bytes.
    EndOfStream,
}

const RX_CHUNK_LEN: usize = 32;

/// [`Transport`] over an `embedded-io` UART.
///
/// A `$` always starts a new line, so bytes left over from a sentence that
/// was cut off are dropped instead of corrupting the next one.
pub struct SerialTransport<R> {
    uart: R,
    rx: [u8; RX_CHUNK_LEN],
    rx_start: usize,
    rx_end: usize,
}

impl<R> SerialTransport<R>
where
    R: Read + ReadReady,
{
    pub fn new(uart: R) -> Self {
        Self {
            uart,
            rx: [0; RX_CHUNK_LEN],
            rx_start: 0,
            rx_end: 0,
        }
    }

    pub fn into_inner(self) -> R {
        self.uart
    }
}

impl<R> Transport for SerialTransport<R>
where
    R: Read + ReadReady,
{
    type Error = SerialError<R::Error>;

    fn bytes_available(&mut self) -> Result<bool, Self::Error> {
        if self.rx_start < self.rx_end {
            return Ok(true);
        }
        self.uart.read_ready().map_err(SerialError::Uart)
    }

    async fn read_line(&mut self, line: &mut LineBuffer) -> Result<(), Self::Error> {
        line.clear();
        let mut overflowed = false;
        loop {
            if self.rx_start == self.rx_end {
                let length = self.uart.read(&mut self.rx).await.map_err(SerialError::Uart)?;
                if length == 0 {
                    return Err(SerialError::EndOfStream);
                }
                self.rx_start = 0;
                self.rx_end = length;
            }

            while self.rx_start < self.rx_end {
                let byte = self.rx[self.rx_start];
                self.rx_start += 1;
                match byte {
                    b'\n' if overflowed => return Err(SerialError::LineTooLong),
                    b'\n' => return Ok(()),
                    b'$' => {
                        line.clear();
                        overflowed = false;
                        line.push(byte).ok();
                    }
                    _ => {
                        if line.push(byte).is_err() {
                            overflowed = true;
                        }
                    }
                }
            }
        }
    }
}
