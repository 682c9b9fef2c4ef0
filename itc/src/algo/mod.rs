//! Numerical helpers shared by curves and sampled spectra

pub mod misc;
pub mod trapezoid;

pub use misc::{interp, interp_or_zero, InterpError};
pub use trapezoid::{trap_integrate, TrapezoidError};
