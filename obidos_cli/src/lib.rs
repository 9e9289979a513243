mod cli_player;
mod config;
mod error;
mod game;
mod player;
mod random_player;
pub use cli_player::*;
pub use config::*;
pub use error::*;
pub use game::*;
pub use player::*;
pub use random_player::*;
