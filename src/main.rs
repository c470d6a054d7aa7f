use anyhow::Result;
use forge_input::engine::input::{
    InputActionDesc, InputBinding, InputPhase, InputSystem, InputSystemConfig, WinitWindowControl,
};
use log::info;
use std::cell::Cell;
use std::rc::Rc;
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::{Fullscreen, WindowBuilder},
};

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting input demo...");

    let event_loop = EventLoop::new()?;
    let window = Rc::new(
        WindowBuilder::new()
            .with_title("Forge Input")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
            .with_resizable(true)
            .build(&event_loop)?,
    );

    let mut input = InputSystem::new(
        InputSystemConfig::default(),
        Box::new(WinitWindowControl::new(window.clone())),
    )?;

    let quit = Rc::new(Cell::new(false));
    register_actions(&mut input, &window, &quit);

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("Close requested, shutting down...");
                elwt.exit();
            }
            Event::WindowEvent { event, .. } => input.handle_window_event(&event),
            Event::DeviceEvent { event, .. } => input.handle_device_event(&event),
            Event::AboutToWait => {
                let size = window.inner_size();
                input.update(size.width, size.height);
                if quit.get() {
                    elwt.exit();
                }
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}

fn register_actions(input: &mut InputSystem, window: &Rc<winit::window::Window>, quit: &Rc<Cell<bool>>) {
    input.add_input_action(InputActionDesc::new(InputBinding::South, |ctx| {
        info!("South {:?} at {:?} from {:?}", ctx.phase, ctx.position, ctx.device_type);
        true
    }));

    input.add_input_action(InputActionDesc::new(InputBinding::FloatLeftStick, |ctx| {
        info!("Move {:?}: {} / {}", ctx.phase, ctx.float2, ctx.float3);
        true
    }));

    input.add_input_action(InputActionDesc::new(InputBinding::FloatMouseWheel, |ctx| {
        if ctx.phase == InputPhase::Performed {
            info!("Scroll {}", ctx.float2.y);
        }
        true
    }));

    input.add_input_action(InputActionDesc::new(InputBinding::Text, |ctx| {
        info!("Text {:?}", ctx.text.iter().collect::<String>());
        true
    }));

    let fullscreen_window = window.clone();
    input.add_input_action(InputActionDesc::new(InputBinding::Fullscreen, move |_| {
        let fullscreen = match fullscreen_window.fullscreen() {
            Some(_) => None,
            None => Some(Fullscreen::Borderless(None)),
        };
        fullscreen_window.set_fullscreen(fullscreen);
        true
    }));

    let quit = quit.clone();
    input.add_input_action(InputActionDesc::new(InputBinding::Exit, move |ctx| {
        if ctx.phase == InputPhase::Performed {
            quit.set(true);
        }
        true
    }));
}
