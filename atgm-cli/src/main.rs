use std::fmt::Display;

use anyhow::Result;
use atgm336h::{DriverConfig, Error, FieldMap, ATGM336H};
use clap::{ArgAction, Parser, Subcommand};
use create_serial::{create_serial, Delay, HostClock, HostSerial};
use lock::{wait_for_lock, LockArgs};
use log::LevelFilter;
use tokio_serial::available_ports;

mod create_serial;
mod lock;

#[derive(Parser)]
#[command(name = "ATGM336H CLI")]
#[command(bin_name = "atgm-cli")]
struct Cli {
    serial: Option<String>,

    #[arg(long, default_value_t = 9600)]
    baud: u32,

    #[arg(long, default_value_t = 5000, help = "How long to wait for each sentence")]
    timeout_ms: u32,

    #[arg(long, default_value_t = 500)]
    poll_interval_ms: u32,

    #[arg(long, default_value_t = -3, allow_negative_numbers = true)]
    utc_offset: i8,

    #[arg(long, help = "Read GSA/GSV with the standard NMEA 0183 field layout")]
    standard_fields: bool,

    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "List all the serial ports on the host")]
    Detect,
    #[command(about = "Print the time of day")]
    Time,
    #[command(about = "Print the speed over ground in m/s")]
    Velocity,
    #[command(about = "Print latitude and longitude")]
    Location,
    #[command(about = "Print the number of satellites used and HDOP")]
    Satellites,
    #[command(about = "Print the signal quality")]
    Signal,
    #[command(about = "Print every fix once")]
    All,
    Lock(LockArgs),
}

impl Cli {
    fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            timeout_ms: self.timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
            utc_offset_hours: self.utc_offset,
            field_map: if self.standard_fields {
                FieldMap::NMEA_0183
            } else {
                FieldMap::ATGM336H
            },
        }
    }

    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn describe<T: Display>(fix: Result<T, Error>) -> String {
    match fix {
        Ok(value) => value.to_string(),
        Err(Error::Timeout) => "not available (no sentence before timeout)".into(),
        Err(Error::Decode(e)) => format!("malformed sentence ({})", e),
    }
}

type Gps = ATGM336H<HostSerial, HostClock, Delay>;

fn open_gps(args: &Cli) -> Result<Gps> {
    let Some(serial) = args.serial.clone() else {
        anyhow::bail!("a serial port is required, run `atgm-cli detect` to list them");
    };
    let transport = create_serial(serial, args.baud)?;
    Ok(ATGM336H::new(
        transport,
        HostClock::default(),
        Delay,
        args.driver_config(),
    ))
}

fn print_fix<T: Display>(name: &str, fix: Result<T, Error>) {
    println!("{}: {}", name, describe(fix));
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let _ = env_logger::builder()
        .filter_level(args.log_level())
        .try_init();

    match &args.command {
        Commands::Detect => {
            for port in available_ports()? {
                println!("{:?}", port);
            }
        }
        Commands::Time => print_fix("Current Time", open_gps(&args)?.get_time().await),
        Commands::Velocity => print_fix("Current Velocity", open_gps(&args)?.get_velocity().await),
        Commands::Location => print_fix(
            "Current Location",
            open_gps(&args)?
                .get_location()
                .await
                .map(|l| format!("{:.6}, {:.6}", l.latitude, l.longitude)),
        ),
        Commands::Satellites => print_fix(
            "Connected Satellites",
            open_gps(&args)?
                .get_satellite_count()
                .await
                .map(|count| match count.hdop {
                    Some(hdop) => format!("{} (HDOP {})", count.satellites, hdop),
                    None => count.satellites.to_string(),
                }),
        ),
        Commands::Signal => print_fix("Signal Quality", open_gps(&args)?.get_signal_quality().await),
        Commands::All => {
            let mut gps = open_gps(&args)?;
            print_fix("Current Time", gps.get_time().await);
            print_fix("Current Velocity", gps.get_velocity().await);
            print_fix(
                "Current Location",
                gps.get_location()
                    .await
                    .map(|l| format!("{:.6}, {:.6}", l.latitude, l.longitude)),
            );
            print_fix(
                "Connected Satellites",
                gps.get_satellite_count().await.map(|count| count.satellites),
            );
            print_fix("Signal Quality", gps.get_signal_quality().await);
        }
        Commands::Lock(lock_args) => {
            let mut gps = open_gps(&args)?;
            let clock = HostClock::default();
            let time_to_lock = wait_for_lock(&mut gps, &clock, &mut Delay, lock_args).await?;
            println!(
                "Time to get a lock on to satellites: {} seconds",
                time_to_lock.as_secs()
            );
            print_fix("Signal Quality", gps.get_signal_quality().await);
            print_fix(
                "Location",
                gps.get_location()
                    .await
                    .map(|l| format!("{:.6}, {:.6}", l.latitude, l.longitude)),
            );
            print_fix("GPS Time", gps.get_time().await);
        }
    }
    Ok(())
}
