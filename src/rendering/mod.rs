pub mod atom_view;
pub mod error_chart;
pub mod export;
pub mod painter;
pub mod primitives;
pub mod scene;
pub mod spectrum;
pub mod surface;

// Re-export the entry points the window wires up
pub use export::{export_spectrum, setup_atom_drawing, setup_spectrum_drawing};
