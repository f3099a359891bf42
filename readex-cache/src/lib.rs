mod cache;

pub use cache::{Atom, count, intern, resolve};
