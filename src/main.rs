use anyhow::Result;
use dialoguer::Input;
use itemscroller::{
    config::ConfigLoader,
    gui::grid_registry::KnownTypes,
    logging::init_logger,
    persist::FileSink,
    replay::{format_contents, ReplayScript},
    state::SessionManager,
};
use std::path::PathBuf;
use tracing::info;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> Result<()> {
    // Load or create configuration
    let config_loader = ConfigLoader::new();
    let config = config_loader.load()?;
    let data_dir = config.generic.data_dir();

    init_logger(&data_dir.join("logs"))?;
    info!("Starting itemscroller-replay v{}", VERSION);

    let script_path = match std::env::args_os().nth(1) {
        Some(path) => PathBuf::from(path),
        None => {
            let path: String = Input::new()
                .with_prompt("Path to the replay script")
                .interact_text()?;
            PathBuf::from(path.trim())
        }
    };

    let script = ReplayScript::load(&script_path)?;
    let mut container = script.build_container()?;
    info!("Loaded {} step(s) from {:?}", script.steps.len(), script_path);

    let mut manager = SessionManager::new(&config, &KnownTypes::vanilla(), FileSink::new(data_dir.clone()));
    manager.start_session(script.world.as_deref());

    let outcome = script.run(&mut manager, &mut container);
    info!(
        "Replayed {} event(s), {} consumed, {} primitive operation(s) applied",
        outcome.events,
        outcome.consumed,
        outcome.applied.len()
    );

    println!("Final container contents:");
    print!("{}", format_contents(&container));
    println!("{}", manager.recipes().page_info());

    manager.end_session();
    info!("Saved recipes and villager trades to {:?}", data_dir);
    Ok(())
}
