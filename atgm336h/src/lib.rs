#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

// must go first so the log macros are visible to the other modules
mod fmt;

mod clock;
mod common;
mod config;
mod debug2defmt_wrapper;
mod error;
mod gll;
mod gsa;
mod gsv;
mod message;
mod reader;
mod sentence;
mod transport;
mod vtg;
mod zda;

#[cfg(test)]
mod test_utils;

pub use clock::Clock;
pub use config::{DriverConfig, FieldMap, SatelliteCountField};
pub use error::{DecodeError, Error};
pub use gll::parse_gll;
pub use gsa::parse_gsa;
pub use gsv::parse_gsv;
pub use message::{LocalTime, Location, SatelliteCount};
pub use reader::SentenceReader;
pub use sentence::{Sentence, MAX_SENTENCE_LEN};
pub use transport::{LineBuffer, SerialError, SerialTransport, Transport};
pub use vtg::{parse_vtg, KNOTS_TO_METERS_PER_SECOND, VTG_SPEED_FIELD};
pub use zda::parse_zda;

use embedded_hal_async::delay::DelayNs;

pub const TIME_PREFIX: &str = "$GNZDA";
pub const VELOCITY_PREFIX: &str = "$GNVTG";
pub const LOCATION_PREFIX: &str = "$GNGLL";
pub const SATELLITE_COUNT_PREFIX: &str = "$GNGSA";
pub const SIGNAL_QUALITY_PREFIX: &str = "$GPGSV";

/// Driver for the ATGM336H GNSS module.
///
/// Every `get_*` call waits for the next sentence of its type and decodes it;
/// nothing is cached between calls. [`Error::Timeout`] means the module sent
/// no such sentence within [`DriverConfig::timeout_ms`], usually because it
/// has no fix yet. [`Error::Decode`] means it sent one that didn't parse.
pub struct ATGM336H<T: Transport, K: Clock, D: DelayNs> {
    reader: SentenceReader<T, K, D>,
    config: DriverConfig,
}

impl<T: Transport, K: Clock, D: DelayNs> ATGM336H<T, K, D> {
    pub fn new(transport: T, clock: K, delay: D, config: DriverConfig) -> Self {
        log_debug!(
            "ATGM336H: timeout {}ms, poll interval {}ms, UTC offset {}h",
            config.timeout_ms,
            config.poll_interval_ms,
            config.utc_offset_hours,
        );
        Self {
            reader: SentenceReader::new(transport, clock, delay, config.poll_interval_ms),
            config,
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Gives the transport back, e.g. to reconfigure the UART.
    pub fn release(self) -> T {
        self.reader.into_transport()
    }

    /// Next raw sentence starting with `type_prefix`, with the configured
    /// timeout. For sentence types this driver does not decode.
    pub async fn read_sentence(&mut self, type_prefix: &str) -> Result<Sentence, Error> {
        self.reader
            .read_sentence(type_prefix, self.config.timeout_ms)
            .await
    }

    /// Time of day, shifted by [`DriverConfig::utc_offset_hours`].
    pub async fn get_time(&mut self) -> Result<LocalTime, Error> {
        let sentence = self.read_sentence(TIME_PREFIX).await?;
        Ok(parse_zda(&sentence, self.config.utc_offset_hours)?)
    }

    /// Speed over ground in m/s.
    pub async fn get_velocity(&mut self) -> Result<f32, Error> {
        let sentence = self.read_sentence(VELOCITY_PREFIX).await?;
        Ok(parse_vtg(&sentence)?)
    }

    pub async fn get_location(&mut self) -> Result<Location, Error> {
        let sentence = self.read_sentence(LOCATION_PREFIX).await?;
        Ok(parse_gll(&sentence)?)
    }

    pub async fn get_satellite_count(&mut self) -> Result<SatelliteCount, Error> {
        let sentence = self.read_sentence(SATELLITE_COUNT_PREFIX).await?;
        Ok(parse_gsa(&sentence, &self.config.field_map)?)
    }

    pub async fn get_signal_quality(&mut self) -> Result<u16, Error> {
        let sentence = self.read_sentence(SIGNAL_QUALITY_PREFIX).await?;
        Ok(parse_gsv(&sentence, &self.config.field_map)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{init_logger, FakeClock, FakeDelay, LineTransport, VecReader};
    use approx::assert_relative_eq;

    const STREAM: &[&[u8]] = &[
        b"$GNGGA,151230.000,4807.038,N,01131.000,E,1,09,1.2,545.4,M,46.9,M,,*47\r\n",
        b"$GNGLL,4807.038,N,01131.000,E,151230.000,A,A*5D\r\n",
        b"$GNGSA,A,3,10,16,18,26,9,1.2,0.9,1.5*2E\r\n",
        b"$GPGSV,2,1,07,10,63,137,17,16,61,347,31,18,41,041,28,26,39,230,33*7B\r\n",
        b"$GNRMC,151230.000,A,4807.038,N,01131.000,E,5.5,54.7,161026,,,A*5F\r\n",
        b"$GNVTG,054.7,T,034.4,M,005.5,N,10.2,K,A*48\r\n",
        b"$GNZDA,151230.000,16,10,2026,00,00*4F\r\n",
    ];

    fn driver(config: DriverConfig) -> (FakeClock, ATGM336H<LineTransport, FakeClock, FakeDelay>) {
        let clock = FakeClock::default();
        let mut transport = LineTransport::new(clock.clone());
        for line in STREAM {
            transport.push_line(0.0, line);
        }
        let driver = ATGM336H::new(transport, clock.clone(), FakeDelay::new(clock.clone()), config);
        (clock, driver)
    }

    #[tokio::test]
    async fn each_fix_from_one_burst() {
        init_logger();

        let (_, mut gps) = driver(DriverConfig::default());
        let time = gps.get_time().await.unwrap();
        assert_eq!(format!("{}", time), "12:12:30");

        let (_, mut gps) = driver(DriverConfig::default());
        assert_relative_eq!(gps.get_velocity().await.unwrap(), 5.247_329, epsilon = 1e-5);

        let (_, mut gps) = driver(DriverConfig::default());
        let location = gps.get_location().await.unwrap();
        assert_relative_eq!(location.latitude, 48.1173, epsilon = 1e-4);
        assert_relative_eq!(location.longitude, 11.5167, epsilon = 1e-4);

        let (_, mut gps) = driver(DriverConfig::default());
        let satellites = gps.get_satellite_count().await.unwrap();
        assert_eq!(satellites.satellites, 9);
        assert_relative_eq!(satellites.hdop.unwrap(), 1.2);

        let (_, mut gps) = driver(DriverConfig::default());
        assert_eq!(gps.get_signal_quality().await, Ok(137));

        let (_, mut gps) = driver(DriverConfig {
            field_map: FieldMap::NMEA_0183,
            ..Default::default()
        });
        assert_eq!(gps.get_signal_quality().await, Ok(17));
    }

    #[tokio::test]
    async fn fixes_in_stream_order() {
        init_logger();
        let (clock, mut gps) = driver(DriverConfig::default());
        assert_eq!(gps.config().field_map, FieldMap::ATGM336H);

        assert!(gps.get_location().await.is_ok());
        assert_eq!(gps.get_satellite_count().await.unwrap().satellites, 9);
        assert_eq!(gps.get_signal_quality().await, Ok(137));
        assert!(gps.get_velocity().await.is_ok());
        assert!(gps.get_time().await.is_ok());
        assert_eq!(clock.now_ms(), 0.0);

        // the burst is used up, the next call has to wait out its timeout
        assert_eq!(gps.get_location().await, Err(Error::Timeout));
        assert!(clock.now_ms() >= 5_000.0);
        assert_eq!(gps.release().remaining(), 0);
    }

    #[tokio::test]
    async fn timeout_and_decode_error_are_distinct() {
        init_logger();
        let clock = FakeClock::default();
        let mut transport = LineTransport::new(clock.clone());
        transport.push_line(0.0, b"$GNGLL,,,,,,V,N*7A\r\n");
        let config = DriverConfig {
            timeout_ms: 2_000,
            poll_interval_ms: 250,
            ..Default::default()
        };
        let mut gps = ATGM336H::new(transport, clock.clone(), FakeDelay::new(clock.clone()), config);

        let no_fix = gps.get_location().await.unwrap_err();
        assert_eq!(no_fix, Error::Decode(DecodeError::MissingField(1)));
        assert!(!no_fix.is_timeout());

        let silent = gps.get_location().await.unwrap_err();
        assert!(silent.is_timeout());
        assert!(clock.now_ms() <= 2_000.0 + 250.0);
    }

    #[tokio::test]
    async fn utc_offset_is_configurable() {
        init_logger();
        let (_, mut gps) = driver(DriverConfig {
            utc_offset_hours: 10,
            ..Default::default()
        });
        assert_eq!(
            gps.get_time().await,
            Ok(LocalTime {
                hour: 1,
                minute: 12,
                second: 30
            })
        );
    }

    #[tokio::test]
    async fn over_serial_transport() {
        init_logger();
        let clock = FakeClock::default();
        let bytes: Vec<u8> = STREAM.iter().flat_map(|line| line.iter().copied()).collect();
        let transport = SerialTransport::new(VecReader::with_chunk_size(bytes, 7));
        let mut gps = ATGM336H::new(
            transport,
            clock.clone(),
            FakeDelay::new(clock.clone()),
            DriverConfig::default(),
        );

        assert_eq!(gps.get_satellite_count().await.unwrap().satellites, 9);
        assert_eq!(format!("{}", gps.get_time().await.unwrap()), "12:12:30");
        assert_eq!(gps.get_velocity().await, Err(Error::Timeout));
    }

    #[tokio::test]
    async fn build_then_decode() {
        init_logger();
        let clock = FakeClock::default();
        let mut transport = LineTransport::new(clock.clone());
        let (hour, minute, second) = (4u8, 5u8, 6u8);
        let knots = 21.5f64;
        let (lat_deg, lat_min, lon_deg, lon_min) = (12u32, 34.5678f64, 123u32, 45.6789f64);
        let (satellites, hdop) = (11u8, 0.8f32);
        let signal = 42u16;
        let lines = [
            format!("$GNZDA,{:02}{:02}{:02}.000,01,01,2026,00,00\r\n", hour, minute, second),
            format!("$GNVTG,0.0,T,0.0,M,0.0,N,{},K,A\r\n", knots),
            format!(
                "$GNGLL,{:02}{:07.4},S,{:03}{:07.4},W,000000.000,A,A\r\n",
                lat_deg, lat_min, lon_deg, lon_min
            ),
            format!("$GNGSA,A,3,1,2,3,4,{},{}\r\n", satellites, hdop),
            format!("$GPGSV,1,1,01,5,60,{},30\r\n", signal),
        ];
        for line in &lines {
            transport.push_line(0.0, line.as_bytes());
        }
        let config = DriverConfig {
            utc_offset_hours: 0,
            ..Default::default()
        };
        let mut gps = ATGM336H::new(transport, clock.clone(), FakeDelay::new(clock.clone()), config);

        assert_eq!(
            gps.get_time().await,
            Ok(LocalTime {
                hour,
                minute,
                second
            })
        );
        assert_relative_eq!(
            gps.get_velocity().await.unwrap(),
            (knots * KNOTS_TO_METERS_PER_SECOND) as f32
        );
        let location = gps.get_location().await.unwrap();
        assert_relative_eq!(location.latitude, -(lat_deg as f64 + lat_min / 60.0), epsilon = 1e-9);
        assert_relative_eq!(location.longitude, -(lon_deg as f64 + lon_min / 60.0), epsilon = 1e-9);
        assert_eq!(
            gps.get_satellite_count().await,
            Ok(SatelliteCount {
                satellites,
                hdop: Some(hdop)
            })
        );
        assert_eq!(gps.get_signal_quality().await, Ok(signal));
    }
}
