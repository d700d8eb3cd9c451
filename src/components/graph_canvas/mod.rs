mod component;
mod handles;
mod render;
mod state;

pub use component::GraphCanvas;

/// One-shot requests from the surrounding UI to the canvas.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasCommand {
	/// Centre the view on a compound.
	Focus(String),
	/// Run the force simulation briefly to untangle cards.
	Relax,
	/// Forget stored positions and lay out from scratch.
	ResetLayout,
}
