pub mod annotation;
pub mod class;
pub mod selector;
pub mod symbol;

pub use annotation::*;
pub use class::*;
pub use selector::MethodSelector;
pub use symbol::*;
