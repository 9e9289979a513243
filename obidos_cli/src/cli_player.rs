use std::io::{BufRead, Stdin, StdinLock, Stdout, Write};

use itertools::Itertools;
use obidos::{Board, ConsoleRenderer, Position, PositionWithSides, RotatedTile, Side, Tile};

use crate::player::{Placement, Player};

/// A human choosing moves at a terminal.
pub struct CliPlayer<R, W> {
    name: String,
    input: R,
    output: W,
    renderer: ConsoleRenderer,
    /// In columns
    width: usize,
    // A re-usable buffer for reading answers.
    buf: String,
}

impl CliPlayer<StdinLock<'static>, Stdout> {
    pub fn stdio(name: impl Into<String>, renderer: ConsoleRenderer, width: usize) -> Self {
        let stdin: Stdin = std::io::stdin();
        Self::new(name, stdin.lock(), std::io::stdout(), renderer, width)
    }
}

impl<R: BufRead, W: Write> CliPlayer<R, W> {
    pub fn new(
        name: impl Into<String>,
        input: R,
        output: W,
        renderer: ConsoleRenderer,
        width: usize,
    ) -> Self {
        Self {
            name: name.into(),
            input,
            output,
            renderer,
            width,
            buf: String::new(),
        }
    }

    /// Asks until the answer is a number between 1 and `max`.
    fn prompt(&mut self, question: &str, max: usize) -> anyhow::Result<usize> {
        loop {
            write!(self.output, "{} [1-{}] ", question, max)?;
            self.output.flush()?;

            self.buf.clear();
            if self.input.read_line(&mut self.buf)? == 0 {
                anyhow::bail!("Input ended before {} answered", self.name);
            }
            match self.buf.trim().parse::<usize>() {
                Ok(answer) if (1..=max).contains(&answer) => return Ok(answer),
                _ => writeln!(self.output, "Please enter a number from 1 to {}.", max)?,
            }
        }
    }

    /// How many tiles to put next to each other so that they fit the width,
    /// with rows as evenly filled as possible.
    fn per_row(&self, count: usize) -> usize {
        let tile_size = 2 * self.renderer.scale() + 4;
        let max = count.min(self.width / tile_size).max(1);
        let row_count = count.div_ceil(max);
        (1..max)
            .rev()
            .find(|&tile_cols| count.div_ceil(tile_cols) > row_count)
            .map_or(1, |tile_cols| tile_cols + 1)
    }

    /// Prints every orientation of `tile` in `choices`, numbered from 1.
    fn print_rotations(&mut self, tile: &Tile, choices: &[Side]) -> anyhow::Result<()> {
        let per_row = self.per_row(choices.len());
        for (row_idx, row) in choices.chunks(per_row).enumerate() {
            let grids: Vec<Vec<String>> = row
                .iter()
                .enumerate()
                .map(|(i, &orientation)| {
                    let rotated = RotatedTile::new(tile.clone(), orientation);
                    let label = (row_idx * per_row + i + 1).to_string();
                    self.renderer.render_tile_with_label(&rotated, &label)
                })
                .collect();
            writeln!(self.output)?;
            for i in 0..self.renderer.scale() + 2 {
                writeln!(self.output, "{}", grids.iter().map(|grid| &grid[i]).join("  "))?;
            }
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> Player for CliPlayer<R, W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn make_move(
        &mut self,
        board: &Board,
        tile: &Tile,
        valid_moves: &[PositionWithSides],
    ) -> anyhow::Result<Placement> {
        let positions: Vec<Position> = valid_moves.iter().map(|mv| (mv.row, mv.col)).collect();

        writeln!(self.output, "{}, it's your turn.", self.name)?;
        writeln!(self.output, "Board:")?;
        for line in self.renderer.render_board(board, &positions) {
            writeln!(self.output, "{}", line)?;
        }
        writeln!(self.output, "Tile:")?;
        for line in self.renderer.render_tile(tile) {
            writeln!(self.output, "{}", line)?;
        }

        let position_idx = self.prompt("Which position do you choose?", valid_moves.len())?;
        let mv = valid_moves[position_idx - 1];
        let sides: Vec<Side> = mv.sides.into_iter().collect();

        let orientation = match sides[..] {
            [] => anyhow::bail!("No orientation offered at ({}, {})", mv.row, mv.col),
            [only] => only,
            _ => {
                self.print_rotations(tile, &sides)?;
                let rotation_idx = self.prompt("Which rotation do you choose?", sides.len())?;
                sides[rotation_idx - 1]
            }
        };

        Ok(Placement {
            row: mv.row,
            col: mv.col,
            orientation,
        })
    }
}
