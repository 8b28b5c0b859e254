use crate::error::Result;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use std::io::{self, Stdout, Write};
use std::time::Duration;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgb
{
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb
{
    pub const fn new(r: u8, g: u8, b: u8) -> Self
    {
        Self { r, g, b }
    }
}

#[derive(Clone, Copy, Default)]
pub struct TerminalOptions
{
    pub mouse: bool,
    pub key_release: bool,
}

pub struct TerminalGuard
{
    stdout: Stdout,
    mouse: bool,
    enhanced: bool,
}

impl TerminalGuard
{
    pub fn enter(options: TerminalOptions) -> io::Result<Self>
    {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, Hide)?;
        if options.mouse {
            execute!(stdout, EnableMouseCapture)?;
        }

        let mut enhanced = false;
        if options.key_release && terminal::supports_keyboard_enhancement().unwrap_or(false) {
            enhanced = execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )
            .is_ok();
        }
        log::debug!("terminal ready (mouse: {}, key release: {})", options.mouse, enhanced);

        Ok(Self {
            stdout,
            mouse: options.mouse,
            enhanced,
        })
    }

    pub fn stdout(&mut self) -> &mut Stdout
    {
        &mut self.stdout
    }

    pub fn reports_release(&self) -> bool
    {
        self.enhanced
    }
}

impl Drop for TerminalGuard
{
    fn drop(&mut self)
    {
        if self.enhanced {
            let _ = execute!(self.stdout, PopKeyboardEnhancementFlags);
        }
        if self.mouse {
            let _ = execute!(self.stdout, DisableMouseCapture);
        }
        let _ = execute!(self.stdout, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

pub fn present(stdout: &mut Stdout, lines: &[String]) -> Result<()>
{
    let output = format!("{}\r\n", lines.join("\r\n"));
    queue!(stdout, MoveTo(0, 0), Clear(ClearType::All))?;
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

pub fn wait_for_space() -> Result<()>
{
    while event::poll(Duration::from_millis(0))? {
        let _ = event::read()?;
    }

    loop {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(KeyEvent { code: KeyCode::Char(' '), .. }) = event::read()? {
                break;
            }
        }
    }
    Ok(())
}

pub fn size() -> (usize, usize)
{
    let (cols, rows) = terminal::size().unwrap_or((80, 24));
    (cols as usize, rows as usize)
}

pub fn bg(color: Rgb) -> String
{
    format!("\x1b[48;2;{};{};{}m", color.r, color.g, color.b)
}

pub fn fg(color: Rgb) -> String
{
    format!("\x1b[38;2;{};{};{}m", color.r, color.g, color.b)
}

pub const RESET: &str = "\x1b[0m";
