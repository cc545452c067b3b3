//! Wiring: audio device, engine, decoders and the terminal UI.

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use saavy_ir::{
    control::{ControlEvent, ControlTarget},
    io::LoadTarget,
    Engine, EngineConfig,
};
use tracing::info;

use crate::{audio, ui::UiApp, Args};

pub fn run(args: Args) -> EyreResult<()> {
    let config = EngineConfig::default();
    let output = audio::open(config.queue_capacity)?;
    info!(
        sample_rate = output.sample_rate,
        channels = output.channels,
        "audio running"
    );

    let mut engine = Engine::new(output.queue, config);
    engine
        .handle_control(ControlEvent::Slider {
            target: ControlTarget::DryWetMix,
            percent: args.mix,
        })
        .wrap_err("failed to apply initial mix")?;

    let mut app = UiApp::new(engine, output.scope_rx, output.sample_rate);
    if let Some(path) = &args.sample {
        app.load(LoadTarget::Dry, path);
    }
    for ir in &args.irs {
        app.load(LoadTarget::Ir(ir.slot), &ir.path);
    }

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    // Keep the device open until the UI is gone
    drop(output.stream);
    result
}
