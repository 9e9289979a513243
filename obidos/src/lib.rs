pub use board::*;
pub use deck::*;
pub use renderer::*;
pub use tile::*;

#[cfg(test)]
mod arbitrary;
mod bitset;
mod board;
mod deck;
mod renderer;
mod tile;
