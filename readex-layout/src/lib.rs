pub mod flow;
pub mod maze;

pub use flow::{FlowLayout, LineGroup, layout_flow};
pub use maze::{SlotGeometry, layout_pairs};
