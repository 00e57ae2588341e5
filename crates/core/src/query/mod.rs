pub mod dispatch;
pub mod engine;
pub mod model;

pub use engine::{QueryEngine, sort_for_presentation};
pub use model::{LineMarker, MarkerDirection, MethodQuery, SourceElement};
