use std::time::Instant;

use kiss3d::event::{Action, Event, Key, WindowEvent};

use super::view::View;

// Key config, all in one place
const KEY_TOGGLE_PAUSE: Key = Key::Space;

pub struct Controller {
    paused: bool,
    fps_counter: FpsCounter,
}

pub struct FpsCounter {
    instant: Instant,
    counter: usize,
    window_size_millis: usize,
    previous_fps: f64,
}

impl FpsCounter {
    pub fn new(window_size_millis: usize) -> Self {
        FpsCounter {
            instant: Instant::now(),
            counter: 0,
            previous_fps: 0.0,
            window_size_millis,
        }
    }

    pub fn reset(&mut self) {
        self.instant = Instant::now();
        self.counter = 0;
    }

    pub fn value(&self) -> f64 {
        self.previous_fps
    }

    /// Counts a frame. Returns true when the window rolled over and `value` is fresh.
    pub fn increment(&mut self) -> bool {
        self.counter += 1;

        let elapsed = self.instant.elapsed();
        if elapsed.as_millis() > self.window_size_millis as u128 {
            self.previous_fps = (1000 * self.counter) as f64 / elapsed.as_millis() as f64;
            self.reset();
            true
        } else {
            false
        }
    }
}

impl Controller {
    pub fn new(paused: bool) -> Self {
        Controller {
            paused,
            fps_counter: FpsCounter::new(1000),
        }
    }

    pub fn process_event(&mut self, event: Event, view: &mut View) {
        match event.value {
            WindowEvent::Key(KEY_TOGGLE_PAUSE, Action::Press, _) => {
                self.toggle_pause();
            }
            WindowEvent::FramebufferSize(width, height) => {
                view.resize(width, height);
            }
            _ => {}
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn increment_frame_counter(&mut self) {
        if self.fps_counter.increment() {
            log::debug!("{:.1} fps", self.fps_counter.value());
        }
    }
}
