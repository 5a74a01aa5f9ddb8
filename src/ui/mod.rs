pub mod board_layout;
pub mod display;
pub mod terminal;
pub mod theme;
pub mod view_models;

pub use board_layout::BoardLayout;
pub use display::snapshot;
pub use view_models::{CellView, LogLineView, RenderSnapshot};
