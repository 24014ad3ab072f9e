use std::time::Duration;

use anyhow::{bail, Result};
use atgm336h::{Clock, Transport, ATGM336H};
use embedded_hal_async::delay::DelayNs;

#[derive(clap::Args)]
#[command(about = "Wait for a satellite lock, then read signal, location and time")]
pub struct LockArgs {
    #[arg(long, default_value_t = 4)]
    pub min_satellites: u8,
    #[arg(long, default_value_t = 10)]
    pub retry_interval_s: u32,
    #[arg(long, default_value_t = 600)]
    pub max_wait_s: u32,
}

/// Polls the satellite count until at least `min_satellites` are used in the
/// fix. Returns the time it took.
pub async fn wait_for_lock<T: Transport, K: Clock, D: DelayNs>(
    gps: &mut ATGM336H<T, K, D>,
    clock: &impl Clock,
    retry_delay: &mut impl DelayNs,
    args: &LockArgs,
) -> Result<Duration> {
    let start = clock.now_ms();
    loop {
        match gps.get_satellite_count().await {
            Ok(count) => {
                println!("Connected satellites: {}", count.satellites);
                if count.satellites >= args.min_satellites {
                    let elapsed_ms = (clock.now_ms() - start).max(0.0);
                    return Ok(Duration::from_secs_f64(elapsed_ms / 1000.0));
                }
            }
            Err(e) => log::warn!("no satellite count yet: {}", e),
        }

        if clock.now_ms() - start >= args.max_wait_s as f64 * 1000.0 {
            bail!(
                "fewer than {} satellites after {}s",
                args.min_satellites,
                args.max_wait_s
            );
        }
        retry_delay
            .delay_ms(args.retry_interval_s.saturating_mul(1000))
            .await;
    }
}
