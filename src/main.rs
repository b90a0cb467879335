use std::process::ExitCode;

use workdesk::kernel::services::adapters::{ensure_settings_file, load_settings};
use workdesk::kernel::services::ports::{Localization, WorkspaceSettings};

mod demo;
mod logging;

fn main() -> ExitCode {
    let overwrite = std::env::args().skip(1).any(|arg| arg == "--overwrite");

    if let Err(e) = ensure_settings_file() {
        eprintln!("settings file unavailable: {e}");
    }
    let settings = load_settings().unwrap_or_else(WorkspaceSettings::default);
    let _logging = logging::init(&settings);

    match demo::run(&settings, overwrite) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_fatal_for_bootstrap() => {
            tracing::error!(error = %e, "workspace bootstrap failed");
            eprintln!("{}", demo::catalog().translate("workspace.bootstrapFailed"));
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(error = %e, "workspace session failed");
            eprintln!("workdesk: {e}");
            ExitCode::FAILURE
        }
    }
}
