pub mod controller;
pub mod media;
pub mod sync;

pub use controller::PlaybackController;
pub use media::MediaEngine;
pub use sync::{Applied, SyncBinder, SyncTarget};
