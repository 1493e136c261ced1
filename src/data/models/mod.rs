pub mod system;
pub mod game;
pub mod snapshot;
pub mod metadata;
