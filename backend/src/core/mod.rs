//! Ambient, cross-cutting primitives: wall-clock access and time-based windows.

pub mod clock;

pub use clock::Clock;
