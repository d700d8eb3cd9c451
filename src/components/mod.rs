pub mod animation;
pub mod conformer_viewer;
pub mod graph_canvas;
pub mod header;
pub mod info_panel;
pub mod retry;
pub mod side_panel;
pub mod structure;
