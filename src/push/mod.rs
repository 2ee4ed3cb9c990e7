// ABOUTME: Per-foundation deployment: pusher trait, state machine and factory.
// ABOUTME: Exports the courier-backed pusher and the cf pusher creator.

mod creator;
mod error;
mod pusher;
mod state;

pub use creator::CfPusherCreator;
pub use error::{PushError, PushErrorKind, Step};
pub use pusher::{CourierPusher, Pusher, PusherCreator};
pub use state::PusherState;
