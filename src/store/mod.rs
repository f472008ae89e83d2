//! The root application state: the [`AppStore`] container with its named
//! action handlers, and the checkout state machine it drives.

mod app;
mod checkout;

pub use app::AppStore;
pub use checkout::{CheckoutFlow, CheckoutItem, CheckoutState, PROCESSING_DELAY};
