use std::time::Duration;

use backprop_sim::{Phase, PhaseFilter, Session, SimConfig};

fn session() -> Session {
    Session::new(SimConfig {
        seed: Some(0),
        ..SimConfig::default()
    })
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn bounded_run_stops_at_target_epoch() {
    let mut session = session();
    session.start_autoplay(Some(2));
    assert!(session.is_autoplaying());

    tokio::time::sleep(Duration::from_secs(30)).await;

    assert!(!session.is_autoplaying());
    let net = session.network();
    assert_eq!(net.epoch(), 2);
    assert_eq!(session.phase(), Phase::Update);
    assert_eq!(session.log_entries(PhaseFilter::All).len(), 8);
}

#[tokio::test(start_paused = true)]
async fn one_advance_per_period() {
    let mut session = session();
    session.start_autoplay(None);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(session.log_entries(PhaseFilter::All).is_empty());

    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert_eq!(session.log_entries(PhaseFilter::All).len(), 2);
    assert_eq!(session.phase(), Phase::Error);

    session.stop_autoplay();
}

#[tokio::test(start_paused = true)]
async fn stop_cancels_future_ticks_and_is_idempotent() {
    let mut session = session();
    session.start_autoplay(Some(0));

    tokio::time::sleep(Duration::from_millis(3500)).await;
    session.stop_autoplay();
    session.stop_autoplay();
    assert!(!session.is_autoplaying());

    let logged = session.log_entries(PhaseFilter::All).len();
    assert_eq!(logged, 3);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(session.log_entries(PhaseFilter::All).len(), logged);
}

#[tokio::test(start_paused = true)]
async fn limit_counts_from_the_current_epoch() {
    let mut session = session();
    for _ in 0..4 {
        session.advance_phase();
    }
    assert_eq!(session.network().epoch(), 1);

    session.start_autoplay(Some(1));
    session.wait_autoplay().await;

    assert_eq!(session.network().epoch(), 2);
    assert!(!session.is_autoplaying());
}

#[tokio::test(start_paused = true)]
async fn reset_stops_autoplay() {
    let mut session = session();
    session.start_autoplay(None);
    tokio::time::sleep(Duration::from_millis(1500)).await;

    session.reset();
    assert!(!session.is_autoplaying());
    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(session.network().epoch(), 0);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(session.log_entries(PhaseFilter::All).is_empty());
}

#[tokio::test(start_paused = true)]
async fn commands_interleave_with_ticks() {
    let mut session = session();
    session.start_autoplay(None);

    tokio::time::sleep(Duration::from_millis(1500)).await;
    session.set_architecture(3, &[4]);
    assert_eq!(session.phase(), Phase::Idle);

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(session.phase(), Phase::Forward);
    assert_eq!(session.network().layer_sizes(), vec![3, 4, 1]);

    session.stop_autoplay();
}
