pub mod clock;
pub mod codec;
pub mod progress;
pub mod store;
