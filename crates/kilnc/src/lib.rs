pub mod descriptor;
pub mod diagnostics;
pub mod emit;
pub mod native;

mod fingerprint;
