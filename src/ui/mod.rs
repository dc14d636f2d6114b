// src/ui/mod.rs
pub mod interactions;
pub mod preferences;

pub use interactions::setup_interactions;
pub use preferences::show_preferences_window;

use crate::io::MeasurementSet;
use crate::model::spectral::{BalmerTransition, LineCatalog};
use crate::panels::data_panel::DataPanel;
use crate::panels::legend::Legend;
use crate::panels::sidebar::SidebarControls;
use crate::panels::transitions::TransitionButtons;
use crate::state::AppState;
use gtk4::prelude::*;
use gtk4::DrawingArea;
use std::cell::RefCell;
use std::rc::Rc;

/// Handles to every view that reflects `AppState`.
#[derive(Clone)]
pub struct Ui {
    pub spectrum: DrawingArea,
    pub atom: DrawingArea,
    pub controls: SidebarControls,
    pub transitions: TransitionButtons,
    pub data: DataPanel,
    pub legend: Legend,
}

impl Ui {
    /// Pushes the current state into every view. Must not be called while
    /// `state` is borrowed: syncing widgets can re-enter their handlers.
    pub fn refresh(&self, state: &Rc<RefCell<AppState>>) {
        let (params, catalog, estimate, lines) = {
            let st = state.borrow();
            (st.params, st.catalog, st.rydberg(), st.lines())
        };
        self.controls.sync(&params, catalog);
        self.transitions.sync(params.active_transition);
        self.data.sync(&estimate);
        self.legend.sync(lines, params.active_transition);
        self.spectrum.queue_draw();
    }
}

// ============================================================================
// STATE CHANGES (widgets, keys and menu actions all go through here)
// ============================================================================

pub fn set_distance(state: &Rc<RefCell<AppState>>, ui: &Ui, cm: f64) {
    {
        let mut st = state.borrow_mut();
        let before = st.params.distance;
        st.params.set_distance(cm);
        if st.params.distance == before {
            return;
        }
    }
    ui.refresh(state);
}

pub fn set_pollution(state: &Rc<RefCell<AppState>>, ui: &Ui, pct: f64) {
    {
        let mut st = state.borrow_mut();
        let before = st.params.light_pollution;
        st.params.set_light_pollution(pct);
        if st.params.light_pollution == before {
            return;
        }
    }
    ui.refresh(state);
}

pub fn set_show_experimental(state: &Rc<RefCell<AppState>>, ui: &Ui, on: bool) {
    let report = {
        let mut st = state.borrow_mut();
        if st.params.show_experimental == on {
            return;
        }
        st.params.show_experimental = on;
        on.then(|| st.measurement_report())
    };
    log::info!("Experimental overlay {}", if on { "on" } else { "off" });
    if let Some(text) = report {
        log::info!("{}", text);
    }
    ui.refresh(state);
}

pub fn toggle_experimental(state: &Rc<RefCell<AppState>>, ui: &Ui) {
    let on = !state.borrow().params.show_experimental;
    set_show_experimental(state, ui, on);
}

pub fn select_transition(state: &Rc<RefCell<AppState>>, ui: &Ui, transition: Option<BalmerTransition>) {
    state.borrow_mut().set_transition(transition);
    ui.refresh(state);
    ui.atom.queue_draw();
}

pub fn set_catalog(state: &Rc<RefCell<AppState>>, ui: &Ui, catalog: LineCatalog) {
    {
        let mut st = state.borrow_mut();
        if st.catalog == catalog {
            return;
        }
        st.catalog = catalog;
    }
    log::info!("Spectrum source: {}", catalog.title());
    ui.refresh(state);
}

pub fn apply_measurements(state: &Rc<RefCell<AppState>>, ui: &Ui, set: MeasurementSet) {
    let report = {
        let mut st = state.borrow_mut();
        log::info!("Imported {} measurements from '{}'", set.points.len(), set.name);
        for point in set.unreachable() {
            log::warn!("{} ({} nm) has no first order on this grating and is not drawn", point.id, point.wavelength_nm);
        }
        st.imported = Some(set);
        st.params.show_experimental = true;
        st.measurement_report()
    };
    log::info!("{}", report);
    ui.refresh(state);
}

pub fn reset_camera(state: &Rc<RefCell<AppState>>, ui: &Ui) {
    state.borrow_mut().atom.camera_mut().reset();
    ui.atom.queue_draw();
}
