/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Compose the next frame into `front` (one Cell per terminal column)
///   2. Compare each cell with `back` (the previous frame)
///   3. Emit terminal commands only for cells that changed, batched with
///      `queue!` and flushed once
///   4. Swap front/back
///
/// Layout: a HUD line, a blank line, then the 16×16 map with two terminal
/// columns per tile and the highest world row on top. The actor is drawn
/// on the half-tile column its center falls in.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::map::{MAP_DIM, TILE_SIZE};
use crate::sim::world::SimulationState;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Never produced by composing, so a back buffer full of these forces
    /// a full repaint.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    const ACTOR: Cell = Cell { ch: '@', fg: Color::White, bg: Color::Magenta };
}

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            *self = FrameBuffer::new(w, h);
        }
    }

    fn invalidate(&mut self) {
        self.cells.fill(Cell::INVALID);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i, y, Cell { ch, fg, bg: Cell::BASE_BG });
        }
    }
}

/// Terminal columns per tile.
const CELL_W: usize = 2;
/// World pixels per terminal column.
const PX_PER_COL: f32 = TILE_SIZE / CELL_W as f32;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;
const HELP_ROW: usize = MAP_ROW + MAP_DIM + 1;

const HELP: &str = "a/d move  w/s climb  x jump  z run  r reset  q quit";

/// Compose a whole frame for `state` into `buf`.
fn compose(buf: &mut FrameBuffer, state: &SimulationState) {
    buf.cells.fill(Cell::BLANK);

    let a = &state.actor;
    let hud = format!(
        "tick {:>6}  pos {:>7.2},{:>7.2}  vel {:>5.2},{:>5.2}  {}{}",
        state.tick,
        a.pos.x,
        a.pos.y,
        a.vel.x,
        a.vel.y,
        if a.on_ground { "GROUND " } else { "" },
        if a.on_ladder { "LADDER" } else { "" },
    );
    buf.put_str(0, HUD_ROW, &hud, Color::White);

    for screen_row in 0..MAP_DIM {
        let grid_row = MAP_DIM - 1 - screen_row;
        for col in 0..MAP_DIM {
            let (r, g, b) = state.map.cell(col, grid_row).color();
            let tile = Cell { ch: ' ', fg: Color::White, bg: Color::Rgb { r, g, b } };
            for dx in 0..CELL_W {
                buf.set(col * CELL_W + dx, MAP_ROW + screen_row, tile);
            }
        }
    }

    if let Some((x, y)) = actor_cell(state) {
        buf.set(x, y, Cell::ACTOR);
    }

    buf.put_str(0, HELP_ROW, HELP, Color::DarkGrey);
}

/// Terminal cell of the actor center, if it is on the map.
fn actor_cell(state: &SimulationState) -> Option<(usize, usize)> {
    let pos = state.actor_position();
    let col = (pos.x / PX_PER_COL).floor();
    let row = (pos.y / TILE_SIZE).floor();
    let cols = (MAP_DIM * CELL_W) as f32;
    if col < 0.0 || col >= cols || row < 0.0 || row >= MAP_DIM as f32 {
        return None;
    }
    Some((col as usize, MAP_ROW + MAP_DIM - 1 - row as usize))
}

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    enhanced_keys: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            enhanced_keys: false,
        }
    }

    /// Enter raw mode on the alternate screen. Returns whether the terminal
    /// will report key releases.
    pub fn init(&mut self) -> io::Result<bool> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.enhanced_keys = true;
        }

        self.fit_terminal()?;
        Ok(self.enhanced_keys)
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.enhanced_keys {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, state: &SimulationState) -> io::Result<()> {
        self.fit_terminal()?;
        compose(&mut self.front, state);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    /// Track terminal size; a change forces a full repaint.
    fn fit_terminal(&mut self) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        let (tw, th) = (tw as usize, th as usize);
        if tw != self.front.width || th != self.front.height {
            self.front.resize(tw, th);
            self.back.resize(tw, th);
            self.back.invalidate();
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }
        Ok(())
    }

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        // cursor position after the last print, if known
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(
            self.writer,
            SetForegroundColor(last_fg),
            SetBackgroundColor(last_bg),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }
                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{ActorState, Vec2};
    use crate::domain::map::TileMap;

    fn frame(state: &SimulationState) -> FrameBuffer {
        let mut buf = FrameBuffer::new(80, 24);
        compose(&mut buf, state);
        buf
    }

    #[test]
    fn top_screen_row_is_highest_world_row() {
        let state = SimulationState::new(TileMap::builtin().unwrap());
        let buf = frame(&state);
        // water sits in world rows 1-2, so near the bottom of the screen
        let water = Color::Rgb { r: 0, g: 0, b: 255 };
        assert_eq!(buf.get(2, MAP_ROW + MAP_DIM - 2).bg, water);
        assert_eq!(buf.get(3, MAP_ROW + MAP_DIM - 2).bg, water);
        assert_ne!(buf.get(2, MAP_ROW + 1).bg, water);
        // solid border
        assert_eq!(buf.get(0, MAP_ROW).bg, Color::Rgb { r: 255, g: 0, b: 0 });
    }

    #[test]
    fn actor_drawn_on_half_tile_column() {
        let mut state = SimulationState::new(TileMap::builtin().unwrap());
        state.actor = ActorState::new(Vec2::new(44.0, 100.0));
        let buf = frame(&state);
        // x 44 → column 5, y 100 → world row 6 → screen row 9
        assert_eq!(actor_cell(&state), Some((5, MAP_ROW + 9)));
        assert_eq!(buf.get(5, MAP_ROW + 9), Cell::ACTOR);
    }

    #[test]
    fn actor_off_map_is_not_drawn() {
        let mut state = SimulationState::new(TileMap::builtin().unwrap());
        state.actor = ActorState::new(Vec2::new(-3.0, 100.0));
        assert_eq!(actor_cell(&state), None);
    }

    #[test]
    fn hud_shows_tick_and_flags() {
        let mut state = SimulationState::new(TileMap::builtin().unwrap());
        state.tick = 42;
        state.actor.on_ground = true;
        let buf = frame(&state);
        let hud: String = (0..80).map(|x| buf.get(x, HUD_ROW).ch).collect();
        assert!(hud.contains("tick     42"));
        assert!(hud.contains("GROUND"));
        assert!(!hud.contains("LADDER"));
    }
}
