pub mod config;
pub mod listener;
pub mod maze;
pub mod reading;


pub use config::{FeedbackMessages, MazeParameters, ReadingParameters, RevealStyle};
pub use maze::MazeSession;
pub use reading::ReadingSession;
