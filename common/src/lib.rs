mod error;
mod frame;
mod playback;
mod snapshot;

pub mod api;
pub mod results;

pub use error::*;
pub use frame::*;
pub use playback::*;
pub use snapshot::*;
