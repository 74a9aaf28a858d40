use clap::{CommandFactory, Parser};
use config::Config;
use kernel::{
    Services, Watchdog,
    action::ShellRunner,
    clock::{Clock, SystemClock},
    device::system_tree,
    store::FileStore,
    uptime::SystemUptime,
};
use std::time::SystemTime;
use tracing::{debug, error, info};
use tracing_log::AsTrace;
use usbwatchdog::{cli::Cli, logs};

#[cfg(feature = "jemalloc")]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() -> anyhow::Result<()> {
    if Cli::is_help_request(std::env::args_os().skip(1)) {
        Cli::command().print_help()?;
        return Ok(());
    }

    let cli = Cli::parse();
    let mut config = match &cli.conffile {
        Some(path) => Config::load(path)?,
        _ => Config::new(),
    };
    cli.apply(&mut config);
    let settings = config.resolve()?;

    let clock = SystemClock;
    logs::prepare_dir(&settings.log_dir)?;
    logs::init(
        &settings.log_dir,
        &clock.now(),
        cli.verbosity.log_level_filter().as_trace(),
    )?;
    debug!(?settings);

    let pruned = logs::prune(&settings.log_dir, settings.retention_days, SystemTime::now())?;
    debug!(count = pruned.len(), "old logs deleted");

    info!("{}", logs::separator());

    let devices = system_tree().inspect_err(|err| error!(%err, "Cannot enumerate devices"))?;
    let services = Services {
        devices,
        store: Box::new(FileStore::in_dir(&settings.log_dir)),
        clock: Box::new(clock),
        uptime: Box::new(SystemUptime),
        runner: Box::new(ShellRunner),
    };
    let watchdog = Watchdog::new(&settings, services)?;

    let report = watchdog
        .run_once_with(logs::emit)
        .inspect_err(|err| error!(%err, "Check aborted"))?;
    debug!(decision = ?report.decision);

    Ok(())
}
