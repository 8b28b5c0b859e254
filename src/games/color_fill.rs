use crate::error::{Error, Result};
use crate::terminal::{self, RESET, Rgb, TerminalGuard, TerminalOptions};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::io::Stdout;
use std::time::{Duration, Instant};

const DEFAULT_SIZE: usize = 5;
const MIN_SIZE: usize = 3;
const MAX_SIZE: usize = 9;
const BOARD_PX: usize = 500;
const TICK_MS: u64 = 33;

const CELL_W: usize = 6;
const CELL_H: usize = 3;
const BOARD_LEFT: usize = 2;
const BOARD_TOP: usize = 3;

const WHITE: Rgb = Rgb::new(255, 255, 255);
const BORDER: Rgb = Rgb::new(0, 0, 0);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FillColor
{
    Red,
    Green,
    Blue,
    Yellow,
}

impl FillColor
{
    pub const ALL: [FillColor; 4] = [
        FillColor::Red,
        FillColor::Green,
        FillColor::Blue,
        FillColor::Yellow,
    ];

    fn from_key(ch: char) -> Option<Self>
    {
        match ch {
            '1' => Some(FillColor::Red),
            '2' => Some(FillColor::Green),
            '3' => Some(FillColor::Blue),
            '4' => Some(FillColor::Yellow),
            _ => None,
        }
    }

    fn name(self) -> &'static str
    {
        match self {
            FillColor::Red => "Red",
            FillColor::Green => "Green",
            FillColor::Blue => "Blue",
            FillColor::Yellow => "Yellow",
        }
    }

    fn rgb(self) -> Rgb
    {
        match self {
            FillColor::Red => Rgb::new(255, 0, 0),
            FillColor::Green => Rgb::new(0, 255, 0),
            FillColor::Blue => Rgb::new(0, 0, 255),
            FillColor::Yellow => Rgb::new(255, 255, 0),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Grid
{
    size: usize,
    cells: Vec<Option<FillColor>>,
}

impl Grid
{
    pub fn new(size: usize) -> Self
    {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    pub fn size(&self) -> usize
    {
        self.size
    }

    fn cell_size(&self) -> usize
    {
        BOARD_PX / self.size
    }

    pub fn get(&self, row: usize, col: usize) -> Option<FillColor>
    {
        if row < self.size && col < self.size {
            self.cells[row * self.size + col]
        } else {
            None
        }
    }

    pub fn cell_at(&self, x: usize, y: usize) -> Option<(usize, usize)>
    {
        let row = y / self.cell_size();
        let col = x / self.cell_size();
        (row < self.size && col < self.size).then_some((row, col))
    }

    pub fn is_valid_color(&self, row: usize, col: usize, color: FillColor) -> bool
    {
        self.neighbors(row, col)
            .into_iter()
            .flatten()
            .all(|(r, c)| self.get(r, c) != Some(color))
    }

    fn neighbors(&self, row: usize, col: usize) -> [Option<(usize, usize)>; 4]
    {
        [
            row.checked_sub(1).map(|r| (r, col)),
            (row + 1 < self.size).then_some((row + 1, col)),
            col.checked_sub(1).map(|c| (row, c)),
            (col + 1 < self.size).then_some((row, col + 1)),
        ]
    }

    pub fn place(&mut self, row: usize, col: usize, color: FillColor) -> bool
    {
        if row >= self.size || col >= self.size || !self.is_valid_color(row, col, color) {
            return false;
        }
        self.cells[row * self.size + col] = Some(color);
        true
    }

    pub fn clear(&mut self, row: usize, col: usize)
    {
        if row < self.size && col < self.size {
            self.cells[row * self.size + col] = None;
        }
    }

    pub fn reset(&mut self)
    {
        self.cells.iter_mut().for_each(|cell| *cell = None);
    }

    pub fn filled(&self) -> usize
    {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn check_win(&self) -> bool
    {
        for row in 0..self.size {
            for col in 0..self.size {
                match self.get(row, col) {
                    Some(color) if self.is_valid_color(row, col, color) => {}
                    _ => return false,
                }
            }
        }
        true
    }
}

pub struct FillConfig
{
    size: usize,
}

impl FillConfig
{
    pub fn from_size(size: Option<usize>) -> Result<Self>
    {
        let size = size.unwrap_or(DEFAULT_SIZE);
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(Error::Usage(format!(
                "Board size must be {MIN_SIZE}-{MAX_SIZE}, got {size}"
            )));
        }
        Ok(Self { size })
    }
}

impl Default for FillConfig
{
    fn default() -> Self
    {
        Self { size: DEFAULT_SIZE }
    }
}

struct Puzzle
{
    grid: Grid,
    selected: FillColor,
    cursor: (usize, usize),
    message: Option<String>,
    moves: u32,
}

impl Puzzle
{
    fn new(size: usize) -> Self
    {
        Self {
            grid: Grid::new(size),
            selected: FillColor::Red,
            cursor: (0, 0),
            message: None,
            moves: 0,
        }
    }

    fn place_at(&mut self, row: usize, col: usize)
    {
        self.cursor = (row, col);
        if self.grid.place(row, col, self.selected) {
            self.moves += 1;
            self.message = None;
        } else {
            self.message = Some(format!(
                "{} clashes with a neighbour at row {}, column {}",
                self.selected.name(),
                row + 1,
                col + 1
            ));
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool
    {
        let last = self.grid.size() - 1;
        let (row, col) = self.cursor;
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Up => self.cursor = (row.saturating_sub(1), col),
            KeyCode::Down => self.cursor = ((row + 1).min(last), col),
            KeyCode::Left => self.cursor = (row, col.saturating_sub(1)),
            KeyCode::Right => self.cursor = (row, (col + 1).min(last)),
            KeyCode::Enter | KeyCode::Char(' ') => self.place_at(row, col),
            KeyCode::Delete | KeyCode::Backspace | KeyCode::Char('x') => {
                self.grid.clear(row, col);
                self.message = None;
            }
            KeyCode::Char('r') => {
                self.grid.reset();
                self.message = Some("Board cleared".to_string());
            }
            KeyCode::Char(ch) => {
                if let Some(color) = FillColor::from_key(ch) {
                    self.selected = color;
                }
            }
            _ => {}
        }
        false
    }

    fn handle_mouse(&mut self, mouse: MouseEvent)
    {
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            let board_pos = screen_to_board(
                mouse.column as usize,
                mouse.row as usize,
                self.grid.size(),
            );
            if let Some((row, col)) = board_pos.and_then(|(x, y)| self.grid.cell_at(x, y)) {
                self.place_at(row, col);
            }
        }
    }
}

fn screen_to_board(column: usize, row: usize, size: usize) -> Option<(usize, usize)>
{
    let width = size * CELL_W;
    let height = size * CELL_H;
    if column < BOARD_LEFT || row < BOARD_TOP {
        return None;
    }
    let (dx, dy) = (column - BOARD_LEFT, row - BOARD_TOP);
    if dx >= width || dy >= height {
        return None;
    }
    let cell_px = BOARD_PX / size;
    Some((
        dx / CELL_W * cell_px + dx % CELL_W * cell_px / CELL_W,
        dy / CELL_H * cell_px + dy % CELL_H * cell_px / CELL_H,
    ))
}

pub fn run(config: FillConfig) -> Result<()>
{
    let mut term = TerminalGuard::enter(TerminalOptions {
        mouse: true,
        key_release: false,
    })?;
    let mut puzzle = Puzzle::new(config.size);
    let start = Instant::now();
    let mut last_tick = Instant::now();
    let mut solved = false;
    log::info!("colour fill started on a {0}x{0} board", config.size);

    loop {
        if handle_input(&mut puzzle)? {
            break;
        }

        let won = puzzle.grid.check_win();
        if won && !solved {
            log::info!("board solved in {} moves", puzzle.moves);
        }
        solved = won;

        if last_tick.elapsed() >= Duration::from_millis(TICK_MS) {
            draw_ui(term.stdout(), &puzzle, won)?;
            last_tick = Instant::now();
        }

        std::thread::sleep(Duration::from_millis(1));
    }

    draw_summary(term.stdout(), &puzzle, solved, start.elapsed())?;
    terminal::wait_for_space()?;
    Ok(())
}

fn handle_input(puzzle: &mut Puzzle) -> Result<bool>
{
    while event::poll(Duration::from_millis(0))? {
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                if puzzle.handle_key(key) {
                    return Ok(true);
                }
            }
            Event::Mouse(mouse) => puzzle.handle_mouse(mouse),
            _ => {}
        }
    }
    Ok(false)
}

fn draw_ui(stdout: &mut Stdout, puzzle: &Puzzle, won: bool) -> Result<()>
{
    let mut lines = Vec::new();
    lines.push("Lab Games - Colour Fill Puzzle".to_string());
    lines.push(format!(
        "Palette: {}  Filled: {}/{}",
        render_palette(puzzle.selected),
        puzzle.grid.filled(),
        puzzle.grid.size() * puzzle.grid.size()
    ));
    lines.push(String::new());
    lines.extend(render_board(&puzzle.grid, puzzle.cursor, won));
    lines.push(String::new());

    if won {
        lines.push("You Win!".to_string());
    } else if let Some(msg) = &puzzle.message {
        lines.push(msg.clone());
    } else {
        lines.push("No two neighbouring cells may share a colour.".to_string());
    }
    lines.push("1-4 pick colour (red, green, blue, yellow). Click or Space to fill.".to_string());
    lines.push("Arrows move, x clears, r resets, Esc quits.".to_string());

    terminal::present(stdout, &lines)
}

fn render_palette(selected: FillColor) -> String
{
    let mut text = String::new();
    for (idx, color) in FillColor::ALL.iter().enumerate() {
        let marker = if *color == selected { '>' } else { ' ' };
        text.push_str(&format!(
            "{}{} {}  {} ",
            marker,
            idx + 1,
            terminal::bg(color.rgb()),
            RESET
        ));
    }
    text.push_str(selected.name());
    text
}

fn render_board(grid: &Grid, cursor: (usize, usize), won: bool) -> Vec<String>
{
    let mut lines = Vec::with_capacity(grid.size() * CELL_H);
    let border = terminal::bg(BORDER);
    for row in 0..grid.size() {
        for line in 0..CELL_H {
            let mut text = " ".repeat(BOARD_LEFT);
            for col in 0..grid.size() {
                let color = grid.get(row, col).map_or(WHITE, FillColor::rgb);
                text.push_str(&terminal::bg(color));
                let inner = CELL_W - 1;
                if line == CELL_H / 2 && cursor == (row, col) && !won {
                    text.push_str(&terminal::fg(BORDER));
                    text.push_str(&format!("{:^inner$}", "[]"));
                } else {
                    text.push_str(&" ".repeat(inner));
                }
                text.push_str(&border);
                text.push(' ');
            }
            text.push_str(RESET);
            lines.push(text);
        }
    }
    lines
}

fn draw_summary(
    stdout: &mut Stdout,
    puzzle: &Puzzle,
    solved: bool,
    elapsed: Duration,
) -> Result<()>
{
    let total = puzzle.grid.size() * puzzle.grid.size();
    let mut lines = Vec::new();
    lines.push("Puzzle closed".to_string());
    lines.push(String::new());
    lines.push(format!(
        "Result: {}",
        if solved { "Solved" } else { "Unfinished" }
    ));
    lines.push(format!("Filled: {}/{}", puzzle.grid.filled(), total));
    lines.push(format!("Moves: {}", puzzle.moves));
    lines.push(format!("Time: {:>5.1}s", elapsed.as_secs_f32()));
    lines.push(String::new());
    lines.push("Press SPACE to exit.".to_string());

    terminal::present(stdout, &lines)
}
