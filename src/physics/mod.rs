// src/physics/mod.rs
pub mod bohr;
pub mod diffraction;
pub mod rydberg;
