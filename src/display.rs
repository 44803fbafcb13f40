use anyhow::Result;
use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdout, Write};

use connect4_engine::{bitboard::BitBoard, HEIGHT, WIDTH};

/// Draws the board top row first, marking the cells of `winning_line` with an 'X'
pub fn draw_board(board: &BitBoard, winning_line: Option<[(usize, usize); 4]>) -> Result<()> {
    let mut stdout = stdout();
    let observation = board.observation();

    let cols: String = (1..=WIDTH).map(|x| x.to_string()).collect();
    stdout.queue(PrintStyledContent(style(cols + "\n")))?;

    for row in (0..HEIGHT).rev() {
        for column in 0..WIDTH {
            let in_line = winning_line.map_or(false, |line| line.contains(&(column, row)));
            let tile = if in_line { "X" } else { "O" };
            let cell = observation[column * HEIGHT + row];

            stdout.queue(PrintStyledContent(
                style(tile)
                    .attribute(Attribute::Bold)
                    .on(Color::DarkBlue)
                    .with(if cell > 0.0 {
                        Color::Red
                    } else if cell < 0.0 {
                        Color::Yellow
                    } else {
                        Color::DarkBlue
                    }),
            ))?;
        }
        stdout.queue(PrintStyledContent(style("\n")))?;
    }
    stdout.flush()?;
    Ok(())
}
