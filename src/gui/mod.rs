use kiss3d::camera::Camera;
use kiss3d::event::EventManager;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::window::{State, Window};

use self::controller::Controller;
use self::view::View;
use crate::assets::TextureLibrary;
use crate::model::SceneState;

mod camera;
mod controller;
mod materials;
mod view;

pub struct Simulation {
    view: View,
    controller: Controller,
}

impl Simulation {
    pub fn new(
        state: SceneState,
        textures: &TextureLibrary,
        paused: bool,
        window: &mut Window,
    ) -> Self {
        Self {
            view: View::new(state, textures, window),
            controller: Controller::new(paused),
        }
    }

    fn process_user_input(&mut self, mut events: EventManager) {
        // Process events
        for event in events.iter() {
            self.controller.process_event(event, &mut self.view);
        }
    }
}

impl State for Simulation {
    fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        self.view.cameras_and_effect_and_renderer()
    }

    fn step(&mut self, window: &mut Window) {
        self.process_user_input(window.events());
        self.view.update_state(self.controller.is_paused());
        self.controller.increment_frame_counter();
    }
}
