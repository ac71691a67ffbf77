//! View controller for the WavePortal page.

pub mod controller;
pub mod view;

pub use controller::WavePortal;
pub use view::{PageView, Renderer, ViewState, WaveRow, format_time};
