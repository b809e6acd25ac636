/// Native module contains implementations of core traits
/// that drive the host toolchain and plain child processes,
/// without any container runtime in between.
pub mod compiler;
pub mod runner;
