use crate::generate::PaletteService;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub palettes: PaletteService,
}
