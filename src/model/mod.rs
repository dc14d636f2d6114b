//src/model/mod.rs
pub mod constants;
pub mod spectral;
