// src/panels/mod.rs
pub mod data_panel;
pub mod legend;
pub mod sidebar;
pub mod transitions;
