//! The two buttons the game reads: A to flap, Start to start.
//!
//! Both are active low with the internal pull-up. No debouncing: the game
//! samples levels and does its own edge detection on Start.

use esp_hal::gpio::{
    Input,
    InputConfig,
    Pull,
};

use crate::{
    ButtonResources,
    io::{
        DigitalInput,
        Line,
    },
};

pub struct Buttons {
    pub flap: Input<'static>,
    pub start: Input<'static>,
}

impl From<ButtonResources<'static>> for Buttons {
    fn from(res: ButtonResources<'static>) -> Self {
        let pull_up = InputConfig::default().with_pull(Pull::Up);
        Self {
            flap: Input::new(res.a, pull_up),
            start: Input::new(res.start, pull_up),
        }
    }
}

impl DigitalInput for Buttons {
    fn read(&mut self, line: Line) -> bool {
        match line {
            Line::Flap => self.flap.is_low(),
            Line::Start => self.start.is_low(),
        }
    }
}
