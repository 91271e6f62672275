//! Shelf application library: the service modules mounted by the binary.

pub mod modules;

pub use modules::register_all;
