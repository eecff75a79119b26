use std::io::{self, BufReader};
use std::sync::mpsc;

use anyhow::Context;
use debate_chat_cli::app::{disclaimer_once, App};
use debate_chat_cli::config::EnvConfig;
use debate_chat_cli::logging::init_file_logging;
use debate_chat_cli::providers::provider_from_config;
use debate_chat_cli::runtime::{spawn_input_reader, TurnRuntime};
use debate_chat_cli::surface::TranscriptView;
use settings_store::Preferences;

fn main() -> anyhow::Result<()> {
    let config = EnvConfig::from_env().context("reading configuration")?;
    let settings_dir = config.settings_dir();

    if let Some(dir) = &settings_dir {
        if let Err(error) = init_file_logging(dir, &config.log_filter) {
            eprintln!("warning: file logging disabled: {error:#}");
        }
    }

    let provider = provider_from_config(&config, settings_dir.as_deref())
        .context("initializing completion provider")?;

    let (events_tx, events_rx) = mpsc::channel();
    spawn_input_reader(BufReader::new(io::stdin()), events_tx.clone())
        .context("starting input reader")?;

    let mut runtime = TurnRuntime::new(provider, events_tx);
    let profile = runtime.profile();
    tracing::info!(
        provider = %profile.provider_id,
        model = %profile.model_id,
        "debate chat started"
    );

    let stdout = io::stdout();
    let mut view = TranscriptView::new(stdout.lock());

    if let Some(dir) = &settings_dir {
        match Preferences::load(dir) {
            Ok(mut preferences) => {
                if let Some(disclaimer) = disclaimer_once(&mut preferences) {
                    view.write_banner(disclaimer)?;
                }
            }
            Err(error) => tracing::warn!(%error, "failed to load preferences"),
        }
    }

    let mut app = App::new(config.persona.clone(), settings_dir);
    view.render(&mut app)?;
    app.take_dirty();

    while !app.should_exit() {
        let Ok(event) = events_rx.recv() else {
            break;
        };

        app.on_event(event, &mut runtime);
        let host_render = runtime.take_render_request();
        if app.take_dirty() || host_render {
            view.render(&mut app)?;
        }
    }

    Ok(())
}
