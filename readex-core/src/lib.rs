pub mod error;
pub mod key;
pub mod surface;
pub mod token;
pub mod trial;
pub mod unit;

pub use error::ConfigError;
pub use key::KeySet;
pub use surface::{Surface, TextMeasure};
pub use token::segment;
pub use trial::{ControllerState, MazeRecord, ReadingRecord};
pub use unit::{Pos, PresentationUnit, Side, SideAssignment, UnitPair};
