use bindsim::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use std::sync::{Arc, Mutex};
use tracing::warn;

#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0)
            .with_style(Self::bar_style())
            .with_message("Initializing...");
        pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::RunStart { total_ticks } => {
                    pb_guard.reset();
                    pb_guard.set_length(total_ticks);
                    pb_guard.set_position(0);
                    pb_guard.set_message("starting");
                }
                Progress::TickCompleted { bound, .. } => {
                    pb_guard.inc(1);
                    pb_guard.set_message(format!(
                        "bound {} normal / {} competitor",
                        bound.normal, bound.competitor
                    ));
                }
                Progress::TickSkipped => {
                    pb_guard.inc(1);
                    pb_guard.set_message("paused");
                }
                Progress::RunFinish => {
                    let length = pb_guard.length().unwrap_or(0);
                    if pb_guard.position() < length {
                        pb_guard.set_position(length);
                    }
                    pb_guard.finish();
                }
                Progress::Message(msg) => {
                    if !pb_guard.is_finished() {
                        pb_guard.println(format!("  {}", msg));
                    } else {
                        pb_guard.set_message(msg);
                    }
                }
            }
        })
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos}/{len} ticks ({eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bindsim::core::models::system::BoundCounts;
    use std::thread;

    #[test]
    fn handler_initializes_in_a_clean_state() {
        let handler = CliProgressHandler::new();
        let pb = handler.pb.lock().unwrap();
        assert_eq!(pb.length(), Some(0));
        assert!(pb.is_finished());
    }

    #[test]
    fn callback_tracks_ticks_and_bound_counts() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        callback(Progress::RunStart { total_ticks: 10 });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.length(), Some(10));
            assert_eq!(pb.position(), 0);
            assert!(!pb.is_finished());
        }

        callback(Progress::TickCompleted {
            tick: 0,
            bound: BoundCounts {
                normal: 4,
                competitor: 2,
            },
        });
        callback(Progress::TickSkipped);
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.position(), 2);
            assert_eq!(pb.message(), "paused");
        }

        callback(Progress::RunFinish);
        {
            let pb = handler.pb.lock().unwrap();
            assert!(pb.is_finished());
            assert_eq!(pb.position(), 10);
        }
    }

    #[test]
    fn tick_message_reports_both_species() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        callback(Progress::RunStart { total_ticks: 1 });
        callback(Progress::TickCompleted {
            tick: 0,
            bound: BoundCounts {
                normal: 3,
                competitor: 1,
            },
        });

        let pb = handler.pb.lock().unwrap();
        assert_eq!(pb.message(), "bound 3 normal / 1 competitor");
    }

    #[test]
    fn callback_is_thread_safe() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::RunStart { total_ticks: 3 });
            callback(Progress::TickSkipped);
            callback(Progress::RunFinish);
        })
        .join()
        .unwrap();

        let pb = handler.pb.lock().unwrap();
        assert!(pb.is_finished());
        assert_eq!(pb.position(), 3);
    }
}
