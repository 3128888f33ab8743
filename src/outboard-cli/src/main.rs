use anyhow::{Context, Result};
use clap::Parser;
use outboard_bridge::{UiBridge, UiDescriptor};
use outboard_core::{
    init_logging, AppDirs, Config, CustomData, ParameterChange, ProgramChange, UiEventHandler,
};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Parser)]
#[command(name = "outboard", version, about = "Headless host harness for external plugin UIs")]
struct Cli {
    /// UI executable to launch
    ui: PathBuf,
    /// Sample rate reported to the UI
    #[arg(long, default_value_t = 48000.0)]
    sample_rate: f64,
    /// Window title handed to the UI
    #[arg(long, default_value = "Outboard")]
    ui_name: String,
    /// Parameter count exposed to the UI
    #[arg(long, default_value_t = 16)]
    parameters: u32,
    /// Stop after this many seconds (0 = run until the UI goes away)
    #[arg(long, default_value_t = 0)]
    timeout: u64,
}

/// Logs every UI event and remembers how the session ended.
#[derive(Debug, Default)]
struct LoggingHandler {
    closed: bool,
    unavailable: bool,
}

impl UiEventHandler for LoggingHandler {
    fn on_parameter_changed(&mut self, change: ParameterChange) {
        tracing::info!(index = change.index, value = change.value, "parameter changed");
    }

    fn on_program_changed(&mut self, change: ProgramChange) {
        tracing::info!(
            channel = change.channel,
            bank = change.bank,
            program = change.program,
            "program changed"
        );
    }

    fn on_custom_data_changed(&mut self, data: CustomData) {
        tracing::info!(key = %data.key, value = %data.value, "custom data changed");
    }

    fn on_ui_closed(&mut self) {
        tracing::info!("ui closed");
        self.closed = true;
    }

    fn on_ui_unavailable(&mut self) {
        tracing::warn!("ui unavailable, continuing headless");
        self.unavailable = true;
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let dirs = AppDirs::discover().context("failed to locate application directories")?;
    let config = Config::load_or_default(&dirs).context("failed to load configuration")?;
    let _guard = init_logging(&config.logging, &dirs).context("failed to initialize logging")?;

    let resource_dir = cli
        .ui
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf();
    let ui_path = cli
        .ui
        .file_name()
        .map(PathBuf::from)
        .context("ui path has no file name")?;

    let descriptor = UiDescriptor {
        resource_dir,
        ui_path,
        ui_name: cli.ui_name,
        sample_rate: cli.sample_rate,
        parameter_count: cli.parameters,
    };

    let mut bridge = UiBridge::new(descriptor, &config.bridge);
    let mut handler = LoggingHandler::default();

    bridge.set_visible(true).context("failed to start the ui")?;

    let deadline = (cli.timeout > 0).then(|| Instant::now() + Duration::from_secs(cli.timeout));
    loop {
        bridge.poll(&mut handler);
        if handler.closed || handler.unavailable {
            break;
        }
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                tracing::info!("timeout reached, hiding ui");
                bridge.set_visible(false)?;
                break;
            }
        }
        std::thread::sleep(Duration::from_millis(33));
    }

    Ok(())
}
