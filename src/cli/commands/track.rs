use crate::cli::commands::parse_id;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::TokioScheduler;
use crate::core::open_repository;
use crate::core::repository::TaskRepository;
use crate::core::timer::{TICK_MILLIS, TimerEngine, TimerEvent};
use crate::errors::AppResult;
use crate::ui::messages::{failure, info, success, warning};
use crate::ui::view::{TaskView, TerminalView};

use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Track {
        id,
        minutes,
        tick_ms,
    } = cmd
    {
        let id = parse_id(id)?;
        let repo = open_repository(cfg, None)?;

        // Unknown task: nothing is started
        let task = repo.get_task(id)?;

        let minutes = minutes.unwrap_or(cfg.pomodoro_minutes);
        let period = Duration::from_millis(tick_ms.unwrap_or(TICK_MILLIS).max(1));

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let outcome = runtime.block_on(run_session(&repo, task.id, &task.name, minutes, period));

        repo.shutdown()?;
        outcome?;
    }

    Ok(())
}

async fn run_session(
    repo: &TaskRepository,
    task_id: i64,
    name: &str,
    minutes: u64,
    period: Duration,
) -> AppResult<()> {
    let view = TerminalView;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut engine = TimerEngine::with_minutes(TokioScheduler::new(tx), repo, minutes)
        .with_period(period);

    info(format!(
        "Tracking task #{} \"{}\" for {} (Ctrl-C to stop)",
        task_id,
        name,
        engine.remaining_display()
    ));
    engine.start(task_id);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        let event = tokio::select! {
            token = rx.recv() => match token {
                Some(token) => engine.on_tick(token),
                None => break,
            },
            _ = &mut ctrl_c => {
                println!();
                engine.stop()
            }
        };

        match event {
            Some(TimerEvent::Progress(progress)) => view.render_progress(&progress),
            Some(TimerEvent::Completed { task_id, commit }) => {
                println!();
                return match commit {
                    Ok(count) => {
                        success(format!(
                            "Pomodoro finished for task #{}: Pomodoros: {}",
                            task_id, count
                        ));
                        Ok(())
                    }
                    Err(e) => {
                        failure("Recording the pomodoro", &e);
                        Err(e)
                    }
                };
            }
            Some(TimerEvent::Stopped {
                task_id,
                elapsed_ms,
            }) => {
                debug!(task_id, elapsed_ms, "session abandoned");
                warning(format!(
                    "Pomodoro stopped for task #{}; nothing recorded",
                    task_id
                ));
                return Ok(());
            }
            None => {}
        }
    }

    Ok(())
}
