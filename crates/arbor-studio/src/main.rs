use arbor_engine::logging::{init_logging, LoggingConfig};
use arbor_studio::Studio;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    Studio::new()
        .title("Fractal Tree")
        .size(1280.0, 720.0)
        .target_fps(60)
        .run()
}
