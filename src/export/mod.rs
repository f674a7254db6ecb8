//! Image export collaborators.
//!
//! These consume the intensity grid produced by the core and turn it into
//! displayable PNGs. They are presentation code: the core's bit-exact
//! guarantees end here, and the 8-bit scaling and white-balance constants
//! below are pragmatic choices, not part of the decoding contract.

mod demosaic;
mod png;

pub use demosaic::demosaic_to_png;
pub use png::raw_to_png;
