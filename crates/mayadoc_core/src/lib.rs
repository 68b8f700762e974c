//! Public library API for decoding Maya `.mb` and `.ma` scene files.

/// Scene file sniffing, binary chunk walking, ASCII command interpretation, and the shared event model.
pub mod scene;
