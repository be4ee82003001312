mod canvas_settings_panel;
mod central_panel;
mod colors_panel;
mod layers_panel;
mod tools_panel;
mod wellness_panel;

pub use canvas_settings_panel::canvas_settings_panel;
pub use central_panel::central_panel;
pub use colors_panel::colors_panel;
pub use layers_panel::{layers_panel, LayersUiState};
pub use tools_panel::tools_panel;
pub use wellness_panel::wellness_panel;
