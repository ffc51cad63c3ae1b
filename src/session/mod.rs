//! Session manager: one exclusively owned automated browser per run.

mod browser;
mod driver;
mod page_helpers;

pub use browser::{BrowserSession, BrowserWrapper};
pub use driver::{NextAffordance, PageDriver};
