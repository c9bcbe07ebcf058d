/// Gamepad input using gilrs.
///
/// D-pad and left stick drive the movement axes. Buttons are mapped to
/// actions from the `[gamepad]` config table:
///   primary   (held)   jump / swim / ladder drop
///   modifier  (held)   run boost
///   reset     (press)  actor back to spawn
///   quit      (press)  leave
///
/// Without the `gamepad` feature this is an inert stand-in that never
/// reports input.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::domain::entity::Intent;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

const BUTTON_COUNT: usize = 10;

/// Face, shoulder and menu buttons that can be bound to actions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,
    B,
    X,
    Y,
    L1,
    R1,
    L2,
    R2,
    Start,
    Select,
}

impl Btn {
    pub fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB" => Some(Btn::L1),
            "R1" | "RB" => Some(Btn::R1),
            "L2" | "LT" => Some(Btn::L2),
            "R2" | "RT" => Some(Btn::R2),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::LeftTrigger2 => Some(Btn::L2),
            Button::RightTrigger2 => Some(Btn::R2),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Which buttons trigger which action.
#[derive(Debug)]
struct Bindings {
    primary: Vec<Btn>,
    modifier: Vec<Btn>,
    reset: Vec<Btn>,
    quit: Vec<Btn>,
}

impl Bindings {
    /// Unknown names are dropped; an action left with no buttons keeps
    /// the default binding.
    fn from_config(cfg: &GamepadConfig) -> Self {
        fn parse(names: &[String], fallback: &[Btn]) -> Vec<Btn> {
            let btns: Vec<Btn> = names.iter().filter_map(|s| Btn::from_name(s)).collect();
            if btns.is_empty() {
                fallback.to_vec()
            } else {
                btns
            }
        }
        Bindings {
            primary: parse(&cfg.primary, &[Btn::A]),
            modifier: parse(&cfg.modifier, &[Btn::X, Btn::R1]),
            reset: parse(&cfg.reset, &[Btn::Start]),
            quit: parse(&cfg.quit, &[Btn::Select]),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    just_pressed: bool,
}

/// D-pad directions in `dpad` index order.
#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
#[derive(Clone, Copy)]
enum Dir {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    buttons: [BtnState; BUTTON_COUNT],
    dpad: [bool; 4],
    stick_x: f32,
    stick_y: f32,

    bindings: Bindings,

    pub connected: bool,
}

impl GamepadState {
    pub fn new(cfg: &GamepadConfig) -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                (Some(g), has_pad)
            }
            Err(e) => {
                tracing::warn!(error = %e, "gamepad support unavailable");
                (None, false)
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs,
            buttons: [BtnState::default(); BUTTON_COUNT],
            dpad: [false; 4],
            stick_x: 0.0,
            stick_y: 0.0,
            bindings: Bindings::from_config(cfg),
            connected,
        }
    }

    /// Pump pending gamepad events. Call once per poll.
    pub fn update(&mut self) {
        for b in &mut self.buttons {
            b.just_pressed = false;
        }

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => self.set_button(btn, true),
                EventType::ButtonReleased(btn, _) => self.set_button(btn, false),
                EventType::AxisChanged(Axis::LeftStickX, value, _) => self.stick_x = value,
                EventType::AxisChanged(Axis::LeftStickY, value, _) => self.stick_y = value,
                EventType::Connected => {
                    self.connected = true;
                    tracing::info!("gamepad connected");
                }
                EventType::Disconnected => {
                    self.connected = false;
                    self.release_all();
                    tracing::info!("gamepad disconnected");
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, held: bool) {
        self.connected = true;
        let dir = match gilrs_btn {
            Button::DPadUp => Some(Dir::Up),
            Button::DPadDown => Some(Dir::Down),
            Button::DPadLeft => Some(Dir::Left),
            Button::DPadRight => Some(Dir::Right),
            _ => None,
        };
        if let Some(dir) = dir {
            self.dpad[dir as usize] = held;
            return;
        }
        if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
            self.press(btn, held);
        }
    }

    fn press(&mut self, btn: Btn, held: bool) {
        let state = &mut self.buttons[btn as usize];
        if held && !state.held {
            state.just_pressed = true;
        }
        state.held = held;
    }

    fn any_held(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[b as usize].held)
    }

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[b as usize].just_pressed)
    }

    pub fn reset_pressed(&self) -> bool {
        self.any_just_pressed(&self.bindings.reset)
    }

    pub fn quit_pressed(&self) -> bool {
        self.any_just_pressed(&self.bindings.quit)
    }

    /// This pad's contribution to the tick intent. Stick up is +y.
    pub fn intent(&self) -> Intent {
        let left = self.dpad[Dir::Left as usize] || self.stick_x < -STICK_DEADZONE;
        let right = self.dpad[Dir::Right as usize] || self.stick_x > STICK_DEADZONE;
        let up = self.dpad[Dir::Up as usize] || self.stick_y > STICK_DEADZONE;
        let down = self.dpad[Dir::Down as usize] || self.stick_y < -STICK_DEADZONE;
        Intent {
            move_x: i8::from(right) - i8::from(left),
            move_y: i8::from(up) - i8::from(down),
            primary: self.any_held(&self.bindings.primary),
            modifier: self.any_held(&self.bindings.modifier),
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        self.buttons = [BtnState::default(); BUTTON_COUNT];
        self.dpad = [false; 4];
        self.stick_x = 0.0;
        self.stick_y = 0.0;
    }
}
