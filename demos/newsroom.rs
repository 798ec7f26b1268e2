//! # Example: newsroom
//!
//! Two newspapers follow one wire service; a third subscriber prints signals.
//!
//! Shows how to:
//! - Create [`Reader`]s and subscribe them to a [`Notifier`].
//! - Observe replay for late subscribers.
//! - Unsubscribe and see the projection reset.
//! - Complete the notifier.
//!
//! ## Flow
//! ```text
//! post(I1) ──► NYT.subscribe (replay I1) ──► post(I2) ──► WaPo.subscribe (replay I1, I2)
//!          ──► post(I3) (live to both) ──► NYT.unsubscribe ──► complete()
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=herald=debug cargo run --example newsroom --features logging
//! ```

use std::sync::Arc;

use herald::{Item, LogWriter, Notifier, Reader};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let wire = Notifier::new();
    let printer = wire.register(Arc::new(LogWriter::new("printer")));

    let nyt = Reader::new("New York Times")?;
    let wapo = Reader::new("Washington Post")?;

    wire.post(Item::new(1, "Harbor reopens", "Ships resumed traffic at dawn."));
    nyt.subscribe(&wire);

    wire.post(Item::new(2, "Budget vote", "The council approved the budget 7-2."));
    wapo.subscribe(&wire);

    wire.post(Item::new(3, "Heat wave", "Temperatures will top 38C this week."));
    // ignored: duplicate id, non-positive id
    wire.post(Item::new(3, "Heat wave (again)", ""));
    wire.post(Item::new(0, "Draft", ""));

    for reader in [&nyt, &wapo] {
        println!("{}:", reader.name());
        for line in reader.projection() {
            println!("  {line}");
        }
    }

    nyt.unsubscribe()?;
    println!(
        "{} after unsubscribe: {} items",
        nyt.name(),
        nyt.projection().len()
    );

    wire.complete();
    println!("{} after completion: {} items", wapo.name(), wapo.projection().len());
    println!("printer still active: {}", printer.is_active());
    Ok(())
}
