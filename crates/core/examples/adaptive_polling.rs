//! Example: Presence-aware polling
//!
//! This example drives one visibility tracker through a realistic
//! visible → flicker → hidden → visible timeline and shows how a repeating
//! timer adapts its cadence along the way: the base interval while the
//! host is visible, the inactive interval once a hidden commit lands, and
//! an immediate catch-up emission when activity resumes.
//!
//! The hidden commit is debounced by 15 seconds, so the middle of the run
//! deliberately waits that window out. Total runtime is about half a
//! minute.
//!
//! Run with: `cargo run --example adaptive_polling -p cadence-core`
//! (set `RUST_LOG=cadence_core=debug` to watch the engine's own logging)

use std::time::{Duration, Instant};

use cadence_core::{TimerConfig, TimerFactory, VisibilityTracker};
use tokio::time::sleep;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("Adaptive Polling Example");
    println!("========================\n");

    let tracker = VisibilityTracker::new();
    let factory = TimerFactory::new(tracker.clone());

    // Example 1: a one-shot timer completes after a single emission.
    println!("▶ one-shot: emit once after 500ms, then complete");
    let once = factory.once(500)?;
    let one_shot_started = Instant::now();
    let subscription = once.subscribe_with(
        move |sequence| {
            println!(
                "  [{:5.1}s] one-shot emission {sequence}",
                one_shot_started.elapsed().as_secs_f64()
            );
        },
        || println!("  ✓ one-shot completed\n"),
    );
    sleep(Duration::from_millis(700)).await;
    drop(subscription); // already complete; dropping is a no-op

    // Example 2: a repeating timer polling every second while visible and
    // every four seconds while hidden.
    println!("▶ repeating: 1s cadence while visible, 4s while hidden");
    let config = TimerConfig::repeating(0, 1_000).with_inactive_interval_ms(4_000);
    let timer = factory.timer(config)?;
    let started = Instant::now();
    let subscription = timer.subscribe(move |sequence| {
        println!("  [{:5.1}s] emission {sequence}", started.elapsed().as_secs_f64());
    });

    sleep(Duration::from_millis(2_500)).await;

    // A brief hide/show flicker is absorbed by the debounce: the cadence
    // never changes and dependent timers never hear about it.
    println!("→ flicker: hidden for one second, then visible again");
    tracker.on_raw_signal(true);
    sleep(Duration::from_secs(1)).await;
    tracker.on_raw_signal(false);
    println!("  ✓ absorbed; cadence unchanged (hidden: {})", tracker.is_hidden());

    sleep(Duration::from_secs(1)).await;

    // A sustained hide commits after the 15s debounce window. The emission
    // that was already armed still fires; re-arms after the commit use the
    // inactive cadence.
    println!("→ sustained hide: waiting out the 15s debounce window");
    tracker.on_raw_signal(true);
    sleep(Duration::from_millis(15_200)).await;
    println!("  ✓ hidden committed (hidden: {}); cadence drops to 4s", tracker.is_hidden());

    sleep(Duration::from_millis(10_500)).await;

    // Resuming more than one base interval after the last emission emits
    // immediately and restores the base cadence.
    println!("→ resume: activity returns");
    tracker.on_raw_signal(false);
    println!("  ✓ visible again; catch-up emission above, 1s cadence below");

    sleep(Duration::from_millis(2_300)).await;

    subscription.shutdown().await;
    println!("\n✓ session shut down; no callbacks after this point");

    Ok(())
}
