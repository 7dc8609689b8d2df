use anyhow::Result;
use clap::Parser;
use orrery::app::{OrreryApp, ViewState};
use orrery::cli::Args;
use orrery::system::SolarSystem;
use orrery_engine::device::GpuInit;
use orrery_engine::logging::init_logging;
use orrery_engine::text::FontSystem;
use orrery_engine::window::Runtime;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.logging());

    let mut fonts = FontSystem::new();
    let font = match args.font_bytes() {
        Some(bytes) => fonts
            .load_font(&bytes)
            .map_err(|e| log::warn!("{e}; text disabled"))
            .ok(),
        None => {
            log::warn!("no usable font found; text disabled");
            None
        }
    };

    let system = SolarSystem::build(&args.assets, args.outer_planets);
    let view = ViewState::new(args.simulation(), !args.no_labels);
    let app = OrreryApp::new(system, view, fonts, font);

    Runtime::run(args.runtime(), GpuInit::default(), app)
}
