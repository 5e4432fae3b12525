use std::time::Duration;

use ocean_ngin::{
    camera::Camera,
    clock::{FrameSample, FrameTime},
    config::Config,
    render::{DepthCompare, Draw, RenderBackend, RenderContext, SurfaceError},
    scene::{Prop, RenderableGroup, Scene},
};

/// Everything the core asked the backend to do, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    BindReflection,
    BindRefraction,
    Unbind,
    Clear,
    ClipTesting(bool),
    Depth(DepthCompare),
    /// The draw plus the clip-testing state it was issued under.
    Draw(Draw, bool),
    Present,
    Viewport(u32, u32),
    Reload(RenderableGroup),
}

/// A backend that renders nothing and remembers every call.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub calls: Vec<Call>,
    pub clip_testing: bool,
    pub fail_present: Option<SurfaceError>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draws(&self) -> Vec<(Draw, bool)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Draw(draw, clip) => Some((*draw, *clip)),
                _ => None,
            })
            .collect()
    }

    /// Calls grouped by pass; a new pass starts at every target bind or unbind.
    pub fn passes(&self) -> Vec<Vec<Call>> {
        let mut passes: Vec<Vec<Call>> = Vec::new();
        for call in &self.calls {
            match call {
                Call::BindReflection | Call::BindRefraction | Call::Unbind => {
                    passes.push(vec![call.clone()])
                }
                _ => {
                    if let Some(pass) = passes.last_mut() {
                        pass.push(call.clone());
                    }
                }
            }
        }
        passes
    }

    pub fn pass_draws(&self, pass: usize) -> Vec<(Draw, bool)> {
        self.passes()[pass]
            .iter()
            .filter_map(|call| match call {
                Call::Draw(draw, clip) => Some((*draw, *clip)),
                _ => None,
            })
            .collect()
    }
}

impl RenderBackend for RecordingBackend {
    fn bind_reflection_target(&mut self) {
        self.calls.push(Call::BindReflection);
    }

    fn bind_refraction_target(&mut self) {
        self.calls.push(Call::BindRefraction);
    }

    fn unbind_current_target(&mut self) {
        self.calls.push(Call::Unbind);
    }

    fn clear(&mut self) {
        self.calls.push(Call::Clear);
    }

    fn set_clip_testing(&mut self, enabled: bool) {
        self.clip_testing = enabled;
        self.calls.push(Call::ClipTesting(enabled));
    }

    fn set_depth_compare(&mut self, compare: DepthCompare) {
        self.calls.push(Call::Depth(compare));
    }

    fn draw(&mut self, draw: Draw) {
        self.calls.push(Call::Draw(draw, self.clip_testing));
    }

    fn present(&mut self) -> anyhow::Result<()> {
        self.calls.push(Call::Present);
        match self.fail_present.take() {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    fn set_screen_viewport(&mut self, width: u32, height: u32) {
        self.calls.push(Call::Viewport(width, height));
    }

    fn reload_shader(&mut self, group: RenderableGroup) -> anyhow::Result<()> {
        self.calls.push(Call::Reload(group));
        Ok(())
    }
}

pub fn context_with(props: Vec<Prop>) -> RenderContext {
    let config = Config::default();
    let camera = Camera::from_config(&config);
    let scene = Scene::new(&config, props);
    RenderContext::new(config, camera, scene)
}

pub fn at_millis(millis: u64) -> FrameSample {
    FrameSample {
        time: FrameTime::from_millis(millis),
        dt: Duration::ZERO,
    }
}
