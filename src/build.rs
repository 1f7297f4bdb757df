mod builder;
mod history;
mod index;
mod paths;

pub use builder::{BuildError, BuildResult, Builder};
