pub mod engine;
pub mod session;
pub mod turn;

pub use engine::{MoveSource, UciEngine};
pub use session::{InputEvent, Phase, Session, SessionState};
pub use turn::TurnCoordinator;
