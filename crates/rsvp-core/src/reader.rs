//! The playback engine: owns the [`Session`](crate::session::Session) and advances
//! it from frame callbacks.

mod control;
mod navigation;
mod tick;
mod view;


pub use view::Reader;
