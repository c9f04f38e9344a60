use chrono::Local;
use directories::ProjectDirs;
use fern::Dispatch;
use log::LevelFilter;
use std::fs;
use std::path::PathBuf;

fn get_log_file_path() -> Result<PathBuf, String> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "TtmlCaptions", "TtmlCaptions") {
        let log_dir = proj_dirs.data_local_dir();
        if !log_dir.exists() {
            fs::create_dir_all(log_dir)
                .map_err(|e| format!("could not create log directory {log_dir:?}: {e}"))?;
        }
        Ok(log_dir.join("ttml_captions.log"))
    } else {
        let current_dir_log_path = PathBuf::from("ttml_captions.log");
        eprintln!(
            "No data directory available, logging to the working directory: {current_dir_log_path:?}"
        );
        Ok(current_dir_log_path)
    }
}

/// Installs the global logger. Console output goes to stderr so that stdout only carries
/// the requested report.
pub fn init_global_logger(level: LevelFilter, enable_file_log: bool) {
    let base_dispatch = Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S.%3f"),
                record.level(),
                record.target(),
                message
            ));
        })
        .level(level);

    let mut final_dispatch = base_dispatch.chain(std::io::stderr());

    if enable_file_log {
        let log_file_path = match get_log_file_path() {
            Ok(path) => path,
            Err(e) => {
                eprintln!("{e}. Falling back to the working directory.");
                PathBuf::from("ttml_captions_fallback.log")
            }
        };
        match fern::log_file(&log_file_path) {
            Ok(log_file) => {
                final_dispatch = final_dispatch.chain(log_file);
            }
            Err(e) => {
                eprintln!("Could not open log file {log_file_path:?}: {e}. File logging disabled.");
            }
        }
    }

    if let Err(e) = final_dispatch.apply() {
        eprintln!("Failed to install logger: {e}");
    } else {
        log::debug!("Logger initialised at level {level}.");
    }
}
