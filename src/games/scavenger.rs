use crate::audio::{self, Audio};
use crate::error::Result;
use crate::terminal::{self, RESET, Rgb, TerminalGuard, TerminalOptions};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Stdout;
use std::time::{Duration, Instant};

pub const SCREEN_WIDTH: i32 = 800;
pub const SCREEN_HEIGHT: i32 = 600;
const FPS: u32 = 60;

const SHIP_WIDTH: i32 = 60;
const SHIP_HEIGHT: i32 = 48;
const SHIP_SPEED: i32 = 8;
const SHIP_MARGIN: i32 = 10;

const ASTEROID_SIZE: i32 = 50;
const ASTEROID_SPEED: i32 = 5;
const ASTEROID_BASE_INTERVAL: i32 = 60;
const ASTEROID_MIN_INTERVAL: i32 = 30;
const CRYSTAL_SIZE: i32 = 40;
const CRYSTAL_SPAWN_WIDTH: i32 = 30;
const CRYSTAL_SPEED: i32 = 5;
const CRYSTAL_INTERVAL: u32 = 100;
const CRYSTAL_POINTS: u32 = 10;
const POINTS_PER_LEVEL: u32 = 50;

// How long a press keeps a direction held.
const REPEAT_HOLD: Duration = Duration::from_millis(140);
const RELEASE_HOLD: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rect
{
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect
{
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self
    {
        Self { x, y, w, h }
    }

    pub fn collides(&self, other: &Rect) -> bool
    {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct Controls
{
    pub left: bool,
    pub right: bool,
}

#[derive(Clone, Debug)]
pub struct Ship
{
    rect: Rect,
}

impl Ship
{
    fn new() -> Self
    {
        Self {
            rect: Rect::new(
                SCREEN_WIDTH / 2,
                SCREEN_HEIGHT - SHIP_HEIGHT - SHIP_MARGIN,
                SHIP_WIDTH,
                SHIP_HEIGHT,
            ),
        }
    }

    fn steer(&mut self, controls: Controls)
    {
        if controls.left && self.rect.x > 0 {
            self.rect.x -= SHIP_SPEED;
        }
        if controls.right && self.rect.x < SCREEN_WIDTH - SHIP_WIDTH {
            self.rect.x += SHIP_SPEED;
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ObjectKind
{
    Asteroid,
    Crystal,
}

#[derive(Clone, Debug)]
pub struct FallingObject
{
    kind: ObjectKind,
    rect: Rect,
    speed: i32,
}

impl FallingObject
{
    fn new(kind: ObjectKind, x: i32, size: i32, speed: i32) -> Self
    {
        Self {
            kind,
            rect: Rect::new(x, -size, size, size),
            speed,
        }
    }

    fn fall(&mut self)
    {
        self.rect.y += self.speed;
    }

    fn off_screen(&self) -> bool
    {
        self.rect.y > SCREEN_HEIGHT
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent
{
    Crash,
    Collected { score: u32 },
    LevelUp { level: u32 },
}

#[derive(Clone, Copy, Default, Debug)]
pub struct Stats
{
    pub crystals: u32,
    pub dodged: u32,
    pub crashes: u32,
    pub best_score: u32,
}

pub struct World
{
    ship: Ship,
    asteroids: Vec<FallingObject>,
    crystals: Vec<FallingObject>,
    score: u32,
    level: u32,
    game_over: bool,
    asteroid_timer: i32,
    crystal_timer: u32,
    stats: Stats,
}

impl World
{
    pub fn new() -> Self
    {
        Self {
            ship: Ship::new(),
            asteroids: Vec::new(),
            crystals: Vec::new(),
            score: 0,
            level: 1,
            game_over: false,
            asteroid_timer: 0,
            crystal_timer: 0,
            stats: Stats::default(),
        }
    }

    pub fn restart(&mut self)
    {
        let stats = self.stats;
        *self = Self::new();
        self.stats = stats;
    }

    pub fn score(&self) -> u32
    {
        self.score
    }

    pub fn level(&self) -> u32
    {
        self.level
    }

    pub fn is_over(&self) -> bool
    {
        self.game_over
    }

    pub fn stats(&self) -> Stats
    {
        self.stats
    }

    fn asteroid_interval(&self) -> i32
    {
        (ASTEROID_BASE_INTERVAL - self.level as i32 * 2).max(ASTEROID_MIN_INTERVAL)
    }

    pub fn step(&mut self, controls: Controls, rng: &mut impl Rng) -> Vec<GameEvent>
    {
        let mut events = Vec::new();
        if self.game_over {
            return events;
        }

        self.ship.steer(controls);

        self.asteroid_timer += 1;
        if self.asteroid_timer > self.asteroid_interval() {
            let level = self.level as i32;
            let x = rng.gen_range(0..=SCREEN_WIDTH - ASTEROID_SIZE);
            self.asteroids.push(FallingObject::new(
                ObjectKind::Asteroid,
                x,
                ASTEROID_SIZE + level * 2,
                ASTEROID_SPEED + level,
            ));
            self.asteroid_timer = 0;
        }

        self.crystal_timer += 1;
        if self.crystal_timer > CRYSTAL_INTERVAL {
            let x = rng.gen_range(0..=SCREEN_WIDTH - CRYSTAL_SPAWN_WIDTH);
            self.crystals.push(FallingObject::new(
                ObjectKind::Crystal,
                x,
                CRYSTAL_SIZE,
                CRYSTAL_SPEED,
            ));
            self.crystal_timer = 0;
        }

        let ship = self.ship.rect;
        let mut crashes = 0u32;
        let mut dodged = 0u32;
        self.asteroids.retain_mut(|asteroid| {
            asteroid.fall();
            if asteroid.rect.collides(&ship) {
                crashes += 1;
            }
            if asteroid.off_screen() {
                dodged += 1;
                return false;
            }
            true
        });
        self.stats.dodged += dodged;
        if crashes > 0 {
            self.game_over = true;
            self.stats.crashes += 1;
            events.extend(std::iter::repeat_n(GameEvent::Crash, crashes as usize));
        }

        let mut collected = 0u32;
        self.crystals.retain_mut(|crystal| {
            crystal.fall();
            if crystal.rect.collides(&ship) {
                collected += 1;
                return false;
            }
            !crystal.off_screen()
        });
        for _ in 0..collected {
            self.score += CRYSTAL_POINTS;
            self.stats.crystals += 1;
            events.push(GameEvent::Collected { score: self.score });
            if self.score % POINTS_PER_LEVEL == 0 {
                self.level += 1;
                events.push(GameEvent::LevelUp { level: self.level });
            }
        }

        self.stats.best_score = self.stats.best_score.max(self.score);
        events
    }

    fn objects(&self) -> impl Iterator<Item = &FallingObject>
    {
        self.asteroids.iter().chain(self.crystals.iter())
    }
}

impl Default for World
{
    fn default() -> Self
    {
        Self::new()
    }
}

pub struct ScavengerConfig
{
    seed: Option<u64>,
    muted: bool,
}

impl ScavengerConfig
{
    pub fn new(seed: Option<u64>, muted: bool) -> Self
    {
        Self { seed, muted }
    }

    fn rng(&self) -> StdRng
    {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for ScavengerConfig
{
    fn default() -> Self
    {
        Self::new(None, false)
    }
}

#[derive(Clone, Copy, Default)]
struct HeldKey
{
    until: Option<Instant>,
}

impl HeldKey
{
    fn press(&mut self, now: Instant, hold: Duration)
    {
        self.until = Some(now + hold);
    }

    fn release(&mut self)
    {
        self.until = None;
    }

    fn is_held(&self, now: Instant) -> bool
    {
        self.until.is_some_and(|until| now < until)
    }
}

struct Keys
{
    left: HeldKey,
    right: HeldKey,
    hold: Duration,
}

impl Keys
{
    fn new(hold: Duration) -> Self
    {
        Self {
            left: HeldKey::default(),
            right: HeldKey::default(),
            hold,
        }
    }

    fn controls(&self, now: Instant) -> Controls
    {
        Controls {
            left: self.left.is_held(now),
            right: self.right.is_held(now),
        }
    }
}

#[derive(PartialEq, Eq, Debug)]
enum Command
{
    Continue,
    Restart,
    Quit,
}

fn apply_key(keys: &mut Keys, key: KeyEvent, game_over: bool, now: Instant) -> Command
{
    let target = match key.code {
        KeyCode::Left | KeyCode::Char('a') => Some(&mut keys.left),
        KeyCode::Right | KeyCode::Char('d') => Some(&mut keys.right),
        _ => None,
    };
    if let Some(held) = target {
        if key.kind == KeyEventKind::Release {
            held.release();
        } else {
            held.press(now, keys.hold);
        }
        return Command::Continue;
    }
    if key.kind == KeyEventKind::Release {
        return Command::Continue;
    }

    match key.code {
        KeyCode::Esc => Command::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Command::Quit,
        KeyCode::Char('q') | KeyCode::Char('Q') if game_over => Command::Quit,
        KeyCode::Char('r') | KeyCode::Char('R') if game_over => Command::Restart,
        _ => Command::Continue,
    }
}

pub fn run(config: ScavengerConfig) -> Result<()>
{
    let audio = Audio::new(config.muted);
    let mut rng = config.rng();
    let mut term = TerminalGuard::enter(TerminalOptions {
        mouse: false,
        key_release: true,
    })?;
    let hold = if term.reports_release() {
        RELEASE_HOLD
    } else {
        REPEAT_HOLD
    };
    let mut keys = Keys::new(hold);
    let mut world = World::new();
    audio.loop_music();
    log::info!("space scavenger started (seed: {:?})", config.seed);

    let frame = Duration::from_secs(1) / FPS;
    let start = Instant::now();
    let mut next_frame = start;

    loop {
        match handle_input(&mut keys, world.is_over())? {
            Command::Quit => break,
            Command::Restart => {
                log::info!("restarting after score {}", world.score());
                world.restart();
            }
            Command::Continue => {}
        }

        let now = Instant::now();
        if now >= next_frame {
            for event in world.step(keys.controls(now), &mut rng) {
                match event {
                    GameEvent::Crash => {
                        audio.play(audio::clash());
                        log::info!("crashed at score {} level {}", world.score(), world.level());
                    }
                    GameEvent::Collected { score } => {
                        audio.play(audio::success());
                        log::debug!("crystal collected, score {score}");
                    }
                    GameEvent::LevelUp { level } => log::debug!("level up to {level}"),
                }
            }

            let (cols, rows) = terminal::size();
            let (field_width, field_height) = layout_metrics(cols, rows);
            draw_ui(term.stdout(), &world, field_width, field_height)?;

            next_frame += frame;
            if next_frame < now {
                next_frame = now + frame;
            }
        }

        std::thread::sleep(Duration::from_millis(1));
    }

    draw_summary(term.stdout(), &world, start.elapsed())?;
    terminal::wait_for_space()?;
    Ok(())
}

fn handle_input(keys: &mut Keys, game_over: bool) -> Result<Command>
{
    while event::poll(Duration::from_millis(0))? {
        if let Event::Key(key) = event::read()? {
            let command = apply_key(keys, key, game_over, Instant::now());
            if command != Command::Continue {
                return Ok(command);
            }
        }
    }
    Ok(Command::Continue)
}

#[derive(Clone, Copy)]
struct Cell
{
    ch: char,
    color: Option<Rgb>,
}

const SHIP_COLOR: Rgb = Rgb::new(80, 140, 255);
const ASTEROID_COLOR: Rgb = Rgb::new(150, 120, 100);
const CRYSTAL_COLOR: Rgb = Rgb::new(0, 230, 230);
const ALERT_COLOR: Rgb = Rgb::new(255, 0, 0);

fn layout_metrics(cols: usize, rows: usize) -> (usize, usize)
{
    let header_lines = 3;
    let footer_lines = 2;
    let trailing_newline = 1;
    let extra = header_lines + 1 + footer_lines + trailing_newline;
    let field_height = rows.saturating_sub(extra).max(10);
    let field_width = cols.saturating_sub(2).max(20);
    (field_width, field_height)
}

fn project(
    rect: &Rect,
    field_width: usize,
    field_height: usize,
) -> Option<(usize, usize, usize, usize)>
{
    let (fw, fh) = (field_width as i64, field_height as i64);
    let (sw, sh) = (SCREEN_WIDTH as i64, SCREEN_HEIGHT as i64);
    let x0 = (rect.x as i64 * fw).div_euclid(sw).max(0);
    let y0 = (rect.y as i64 * fh).div_euclid(sh).max(0);
    let x1 = (((rect.x + rect.w) as i64 * fw + sw - 1).div_euclid(sw)).min(fw);
    let y1 = (((rect.y + rect.h) as i64 * fh + sh - 1).div_euclid(sh)).min(fh);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((x0 as usize, x1 as usize, y0 as usize, y1 as usize))
}

fn paint(field: &mut [Vec<Cell>], rect: &Rect, cell: Cell)
{
    let height = field.len();
    let width = field.first().map_or(0, Vec::len);
    if let Some((x0, x1, y0, y1)) = project(rect, width, height) {
        for row in &mut field[y0..y1] {
            for slot in &mut row[x0..x1] {
                *slot = cell;
            }
        }
    }
}

fn build_field(world: &World, field_width: usize, field_height: usize) -> Vec<Vec<Cell>>
{
    let blank = Cell {
        ch: ' ',
        color: None,
    };
    let mut field = vec![vec![blank; field_width]; field_height];

    for object in world.objects() {
        let cell = match object.kind {
            ObjectKind::Asteroid => Cell {
                ch: '@',
                color: Some(ASTEROID_COLOR),
            },
            ObjectKind::Crystal => Cell {
                ch: '*',
                color: Some(CRYSTAL_COLOR),
            },
        };
        paint(&mut field, &object.rect, cell);
    }
    paint(
        &mut field,
        &world.ship.rect,
        Cell {
            ch: '^',
            color: Some(SHIP_COLOR),
        },
    );

    if world.is_over() {
        let text = "Game Over! Press Q to Quit.";
        let row = field_height / 2;
        let col = field_width.saturating_sub(text.len()) / 2;
        for (offset, ch) in text.chars().enumerate() {
            if let Some(slot) = field[row].get_mut(col + offset) {
                *slot = Cell {
                    ch,
                    color: Some(ALERT_COLOR),
                };
            }
        }
    }
    field
}

fn draw_ui(
    stdout: &mut Stdout,
    world: &World,
    field_width: usize,
    field_height: usize,
) -> Result<()>
{
    terminal::present(stdout, &frame_lines(world, field_width, field_height))
}

fn frame_lines(world: &World, field_width: usize, field_height: usize) -> Vec<String>
{
    let mut lines = Vec::new();
    lines.push("Lab Games - Space Scavenger".to_string());
    lines.push(format!("Score: {}", world.score()));
    lines.push(format!("Level: {}", world.level()));

    for row in build_field(world, field_width, field_height) {
        lines.push(render_row(&row));
    }
    lines.push("=".repeat(field_width));

    if world.is_over() {
        lines.push(format!(
            "{}Game Over!{} Q quits, R restarts.",
            terminal::fg(ALERT_COLOR),
            RESET
        ));
    } else {
        lines.push(format!("Best: {}", world.stats().best_score));
    }
    lines.push("Controls: Left/Right (or A/D) to steer, ESC to quit".to_string());
    lines
}

fn render_row(row: &[Cell]) -> String
{
    let mut line = String::with_capacity(row.len() + 16);
    let mut active: Option<Rgb> = None;
    for cell in row {
        if cell.color != active {
            match cell.color {
                Some(color) => line.push_str(&terminal::fg(color)),
                None => line.push_str(RESET),
            }
            active = cell.color;
        }
        line.push(cell.ch);
    }
    if active.is_some() {
        line.push_str(RESET);
    }
    line
}

fn draw_summary(stdout: &mut Stdout, world: &World, elapsed: Duration) -> Result<()>
{
    let stats = world.stats();
    let mut lines = Vec::new();
    lines.push("Flight log".to_string());
    lines.push(String::new());
    lines.push(format!("Final score: {}", world.score()));
    lines.push(format!("Level reached: {}", world.level()));
    lines.push(format!("Best score: {}", stats.best_score));
    lines.push(format!("Crystals collected: {}", stats.crystals));
    lines.push(format!("Asteroids dodged: {}", stats.dodged));
    lines.push(format!("Crashes: {}", stats.crashes));
    lines.push(format!("Time: {:>5.1}s", elapsed.as_secs_f32()));
    lines.push(String::new());
    lines.push("Press SPACE to exit.".to_string());

    terminal::present(stdout, &lines)
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn idle() -> Controls
    {
        Controls::default()
    }

    fn rng() -> StdRng
    {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn touching_edges_do_not_collide()
    {
        let a = Rect::new(0, 0, 10, 10);
        assert!(!a.collides(&Rect::new(10, 0, 10, 10)));
        assert!(!a.collides(&Rect::new(0, 10, 10, 10)));
        assert!(a.collides(&Rect::new(9, 9, 10, 10)));
        assert!(a.collides(&Rect::new(2, 2, 2, 2)));
    }

    #[test]
    fn ship_starts_centred_above_bottom()
    {
        let world = World::new();
        assert_eq!(world.ship.rect, Rect::new(400, 542, 60, 48));
        assert_eq!(world.score(), 0);
        assert_eq!(world.level(), 1);
        assert!(!world.is_over());
    }

    #[test]
    fn ship_movement_respects_bounds()
    {
        let mut ship = Ship::new();
        for _ in 0..100 {
            ship.steer(Controls {
                left: true,
                right: false,
            });
        }
        assert_eq!(ship.rect.x, 0);

        for _ in 0..200 {
            ship.steer(Controls {
                left: false,
                right: true,
            });
        }
        assert_eq!(ship.rect.x, 744);
    }

    #[test]
    fn asteroid_spawns_after_level_interval()
    {
        let mut world = World::new();
        let mut rng = rng();
        for _ in 0..58 {
            world.step(idle(), &mut rng);
        }
        assert!(world.asteroids.is_empty());

        world.step(idle(), &mut rng);
        assert_eq!(world.asteroids.len(), 1);
        let asteroid = &world.asteroids[0];
        assert_eq!(asteroid.kind, ObjectKind::Asteroid);
        assert_eq!((asteroid.rect.w, asteroid.rect.h), (52, 52));
        assert_eq!(asteroid.speed, 6);
        assert_eq!(asteroid.rect.y, -46);
        assert!((0..=750).contains(&asteroid.rect.x));
    }

    #[test]
    fn asteroid_interval_has_floor()
    {
        let mut world = World::new();
        assert_eq!(world.asteroid_interval(), 58);
        world.level = 10;
        assert_eq!(world.asteroid_interval(), 40);
        world.level = 40;
        assert_eq!(world.asteroid_interval(), 30);
    }

    #[test]
    fn crystal_spawns_every_hundred_and_one_frames()
    {
        let mut world = World::new();
        world.ship.rect.x = 0;
        let mut rng = rng();
        for _ in 0..100 {
            world.step(idle(), &mut rng);
        }
        assert!(world.crystals.is_empty());

        world.step(idle(), &mut rng);
        assert_eq!(world.crystals.len(), 1);
        let crystal = &world.crystals[0];
        assert_eq!((crystal.rect.w, crystal.rect.h), (40, 40));
        assert_eq!(crystal.rect.y, -35);
        assert!((0..=770).contains(&crystal.rect.x));
    }

    #[test]
    fn collecting_crystals_scores_and_levels()
    {
        let mut world = World::new();
        world.score = 40;
        world
            .crystals
            .push(FallingObject::new(ObjectKind::Crystal, 410, 40, 0));
        world.crystals[0].rect.y = 540;

        let events = world.step(idle(), &mut rng());
        assert_eq!(
            events,
            vec![
                GameEvent::Collected { score: 50 },
                GameEvent::LevelUp { level: 2 }
            ]
        );
        assert!(world.crystals.is_empty());
        assert_eq!(world.level(), 2);
        assert_eq!(world.stats().crystals, 1);
        assert_eq!(world.stats().best_score, 50);
    }

    #[test]
    fn asteroid_hit_ends_game_and_freezes_world()
    {
        let mut world = World::new();
        let mut asteroid = FallingObject::new(ObjectKind::Asteroid, 400, 50, 5);
        asteroid.rect.y = 500;
        world.asteroids.push(asteroid);
        let mut far = FallingObject::new(ObjectKind::Crystal, 0, 40, 5);
        far.rect.y = 100;
        world.crystals.push(far);

        let events = world.step(idle(), &mut rng());
        assert_eq!(events, vec![GameEvent::Crash]);
        assert!(world.is_over());
        assert_eq!(world.crystals[0].rect.y, 105);

        let events = world.step(
            Controls {
                left: true,
                right: false,
            },
            &mut rng(),
        );
        assert!(events.is_empty());
        assert_eq!(world.ship.rect.x, 400);
        assert_eq!(world.asteroids[0].rect.y, 505);
        assert_eq!(world.crystals[0].rect.y, 105);
    }

    #[test]
    fn objects_leave_below_screen()
    {
        let mut world = World::new();
        world.ship.rect.x = 0;
        let mut asteroid = FallingObject::new(ObjectKind::Asteroid, 700, 50, 5);
        asteroid.rect.y = 596;
        world.asteroids.push(asteroid);
        let mut crystal = FallingObject::new(ObjectKind::Crystal, 700, 40, 5);
        crystal.rect.y = 600;
        world.crystals.push(crystal);

        world.step(idle(), &mut rng());
        assert!(world.asteroids.is_empty());
        assert!(world.crystals.is_empty());
        assert_eq!(world.stats().dodged, 1);
        assert_eq!(world.score(), 0);
    }

    #[test]
    fn restart_keeps_lifetime_stats()
    {
        let mut world = World::new();
        let mut asteroid = FallingObject::new(ObjectKind::Asteroid, 400, 50, 5);
        asteroid.rect.y = 500;
        world.asteroids.push(asteroid);
        world.score = 30;
        world.step(idle(), &mut rng());
        assert!(world.is_over());

        world.restart();
        assert!(!world.is_over());
        assert!(world.asteroids.is_empty());
        assert_eq!(world.score(), 0);
        assert_eq!(world.level(), 1);
        assert_eq!(world.stats().crashes, 1);
        assert_eq!(world.stats().best_score, 30);
    }

    #[test]
    fn seeded_worlds_are_deterministic()
    {
        let mut a = World::new();
        let mut b = World::new();
        let (mut rng_a, mut rng_b) = (StdRng::seed_from_u64(42), StdRng::seed_from_u64(42));
        for _ in 0..300 {
            a.step(idle(), &mut rng_a);
            b.step(idle(), &mut rng_b);
        }
        let xs = |w: &World| w.objects().map(|o| o.rect.x).collect::<Vec<_>>();
        assert_eq!(xs(&a), xs(&b));
        assert_eq!(a.is_over(), b.is_over());
    }

    #[test]
    fn held_keys_expire_or_release()
    {
        let now = Instant::now();
        let mut keys = Keys::new(REPEAT_HOLD);
        let press = KeyEvent::new(KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(apply_key(&mut keys, press, false, now), Command::Continue);
        assert!(keys.controls(now).left);
        assert!(!keys.controls(now).right);
        assert!(!keys.controls(now + REPEAT_HOLD).left);

        let mut release = KeyEvent::new(KeyCode::Left, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        apply_key(&mut keys, release, false, now);
        assert!(!keys.controls(now).left);
    }

    #[test]
    fn quit_and_restart_keys_wait_for_game_over()
    {
        let now = Instant::now();
        let mut keys = Keys::new(REPEAT_HOLD);
        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        let r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(apply_key(&mut keys, q, false, now), Command::Continue);
        assert_eq!(apply_key(&mut keys, r, false, now), Command::Continue);
        assert_eq!(apply_key(&mut keys, q, true, now), Command::Quit);
        assert_eq!(apply_key(&mut keys, r, true, now), Command::Restart);
        assert_eq!(apply_key(&mut keys, esc, false, now), Command::Quit);
    }

    #[test]
    fn projection_scales_world_to_field()
    {
        assert_eq!(project(&Rect::new(0, 0, 800, 600), 80, 30), Some((0, 80, 0, 30)));
        assert_eq!(project(&Rect::new(400, 542, 60, 48), 80, 30), Some((40, 46, 27, 30)));
        assert_eq!(project(&Rect::new(100, -50, 50, 50), 80, 30), None);
        assert_eq!(project(&Rect::new(100, -10, 50, 50), 80, 30), Some((10, 15, 0, 2)));
    }

    #[test]
    fn frame_fits_terminal_height()
    {
        let mut world = World::new();
        for rows in [24, 30, 50] {
            let (width, height) = layout_metrics(80, rows);
            let lines = frame_lines(&world, width, height);
            assert!(lines.len() < rows, "{} lines for {} rows", lines.len(), rows);
            assert_eq!(lines[0], "Lab Games - Space Scavenger");
        }
        world.game_over = true;
        let (width, height) = layout_metrics(80, 24);
        assert!(frame_lines(&world, width, height).len() < 24);
    }

    #[test]
    fn field_shows_game_over_banner()
    {
        let mut world = World::new();
        world.game_over = true;
        let field = build_field(&world, 40, 12);
        let banner: String = field[6].iter().map(|cell| cell.ch).collect();
        assert!(banner.contains("Game Over! Press Q to Quit."));
        let ship_row: String = field[11].iter().map(|cell| cell.ch).collect();
        assert!(ship_row.contains('^'));
    }
}
