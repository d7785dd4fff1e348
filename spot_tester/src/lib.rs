// The collaborators around the spot tracker that a live capture page would
// provide: a frame source, a fixed-rate tick loop, and a preview renderer.

pub mod driver;
pub mod render;
pub mod settings;
pub mod source;
