// Folio layout session driver.
// Wires settings, file storage, the layout engine and the input router into
// one workspace and replays an event script against it, printing each frame.

mod document;
mod script;
mod settings;
mod store;
mod workspace;

use std::io::Read;
use std::time::Instant;

use anyhow::Context;

use script::Command;
use store::FileStore;
use workspace::Workspace;

fn read_script() -> anyhow::Result<String> {
    match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read script {}", path)),
        None => {
            let mut script = String::new();
            std::io::stdin()
                .read_to_string(&mut script)
                .context("failed to read script from stdin")?;
            Ok(script)
        }
    }
}

fn open_store(settings: &settings::FolioSettings) -> anyhow::Result<FileStore> {
    let path = settings
        .storage_path
        .clone()
        .or_else(|| settings::config_dir().map(|dir| dir.join("storage.json")))
        .context("cannot determine a storage location")?;

    match FileStore::open(&path) {
        Ok(store) => Ok(store),
        Err(e) => {
            log::warn!("Starting with empty storage: {}", e);
            Ok(FileStore::empty(path))
        }
    }
}

fn print_frame(workspace: &Workspace<FileStore>) {
    let frame = workspace.layout().frame();
    if workspace.header_visible() {
        println!("{}", frame);
    } else {
        println!("{} header=off", frame);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = settings::load_settings();
    // Write the defaults once so the knobs are discoverable.
    if let Some(path) = settings::settings_path() {
        if !path.exists() {
            settings::save_settings(&settings, &path);
        }
    }

    let store = open_store(&settings)?;
    let script = read_script()?;

    let mut workspace = Workspace::new(&settings, store);
    log::info!("Layout storage at {}", workspace.store().path().display());
    let mut now = Instant::now();
    print_frame(&workspace);

    for (index, line) in script.lines().enumerate() {
        let command = script::parse_line(line)
            .with_context(|| format!("line {}: {}", index + 1, line.trim()))?;
        let changed = match command {
            None => continue,
            Some(Command::Event(event)) => workspace.handle_event(event, now),
            Some(Command::Cancel(reason)) => workspace.cancel_drag(reason, now),
            Some(Command::Type(text)) => {
                workspace.type_text(text, now);
                false
            }
            Some(Command::Wait(delay)) => {
                now += delay;
                workspace.tick(now)
            }
            Some(Command::Frame) => true,
        };
        if changed {
            print_frame(&workspace);
        }
    }

    workspace.shutdown();
    log::debug!("Document is {} bytes", workspace.document().text().len());
    Ok(())
}
