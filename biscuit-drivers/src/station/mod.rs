//! Station implementations
//!
//! Both stations subscribe to `pulse`; only the stamper also listens for
//! the drain's one-shot `pulse-stamper`.

pub mod extruder;
pub mod stamper;

pub use extruder::Extruder;
pub use stamper::Stamper;
