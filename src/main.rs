//! rPomodoro main entrypoint.

use rpomodoro::run;
use rpomodoro::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
