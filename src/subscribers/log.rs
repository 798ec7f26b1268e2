//! # LogWriter - simple signal printer
//!
//! A minimal subscriber that prints every signal it receives to stdout.
//! Use it for test or demo.
//!
//! ## Example output
//! ```text
//! [item] subscriber="wire" id=1 headline="Rates hold"
//! [error] subscriber="wire" label=delivery_panicked msg="panicked: boom"
//! [completed] subscriber="wire"
//! ```

use crate::error::DeliveryError;
use crate::items::Item;
use crate::subscribers::Subscribe;

/// Signal writer subscriber.
#[derive(Debug)]
pub struct LogWriter {
    name: &'static str,
}

impl LogWriter {
    /// Construct a new [`LogWriter`] printing under `name`.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Default for LogWriter {
    fn default() -> Self {
        Self::new("LogWriter")
    }
}

impl Subscribe for LogWriter {
    fn on_item(&self, item: &Item) -> Result<(), DeliveryError> {
        println!(
            "[item] subscriber={:?} id={} headline={:?}",
            self.name,
            item.id(),
            item.headline()
        );
        Ok(())
    }

    fn on_completed(&self) {
        println!("[completed] subscriber={:?}", self.name);
    }

    fn on_error(&self, err: &DeliveryError) {
        println!(
            "[error] subscriber={:?} label={} msg={:?}",
            self.name,
            err.as_label(),
            err.as_message()
        );
    }

    fn name(&self) -> &str {
        self.name
    }
}
