use std::env;
use std::time::Duration;

use log::{info, warn};

use backprop_sim::{PhaseFilter, Session, SimConfig};

const DEFAULT_EPOCHS: u64 = 5;
const DEFAULT_TICK_MS: u64 = 1000;

fn env_u64(key: &str) -> Option<u64> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("ignoring {key}={raw:?}: {e}");
            None
        }
    }
}

#[tokio::main]
async fn main() -> backprop_sim::Result<()> {
    env_logger::init();

    let epochs = env_u64("BACKPROP_EPOCHS").unwrap_or(DEFAULT_EPOCHS).max(1);
    let tick_ms = env_u64("BACKPROP_TICK_MS").unwrap_or(DEFAULT_TICK_MS).max(1);

    let config = SimConfig {
        autoplay_period: Duration::from_millis(tick_ms),
        seed: env_u64("BACKPROP_SEED"),
        ..SimConfig::default()
    };
    let mut session = Session::new(config)?;

    info!("running {epochs} epochs, one phase every {tick_ms} ms");
    session.start_autoplay(Some(epochs));

    tokio::select! {
        _ = session.wait_autoplay() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("received SIGINT");
        }
    }
    session.stop_autoplay();

    for (i, entry) in session.log_entries(PhaseFilter::All).iter().enumerate() {
        println!("#{:<4} {entry}", i + 1);
    }

    let net = session.network();
    println!(
        "architecture {:?}, epoch {}, total error {:.6}",
        net.layer_sizes(),
        net.epoch(),
        net.total_error()
    );
    Ok(())
}
