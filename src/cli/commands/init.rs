use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::gateway::StorageGateway;
use crate::db::log::ttlog;
use crate::errors::AppResult;
use crate::core::repository::TaskRepository;
use crate::ui::messages::warning;
use crate::ui::view::TerminalView;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite database and its schema
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;
    let db_path = cfg.database.clone();

    println!("⚙️  Initializing rPomodoro…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Database   : {}", &db_path);

    let gateway = StorageGateway::open(&cfg.db_options())?;
    let repo = TaskRepository::with_view(gateway, Box::new(TerminalView))?;

    println!("✅ Database initialized at {}", &db_path);

    // Internal log (non blocking)
    if let Err(e) = repo.gateway().transaction(|tx| {
        ttlog(
            tx,
            "init",
            "Database initialized",
            &format!("Database initialized at {}", &db_path),
        )?;
        Ok(())
    }) {
        warning(format!("Failed to write internal log: {}", e));
    }

    repo.shutdown()?;
    println!("🎉 rPomodoro initialization completed!");
    Ok(())
}
