use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

const CONFIG_FILE: &str = "log4rs.yaml";
const FALLBACK_PATTERN: &str = "{d(%H:%M:%S%.3f)} {l} {t} - {m}{n}";

#[ctor::ctor]
fn init() {
    if log4rs::init_file(CONFIG_FILE, Default::default()).is_ok() {
        return;
    }
    // A logger may already be installed by the host; keep it.
    if let Some(config) = fallback_config() {
        let _ = log4rs::init_config(config);
    }
}

fn fallback_config() -> Option<Config> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(FALLBACK_PATTERN)))
        .build();
    Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn))
        .ok()
}

pub fn log_decomposition_summary(label: &str, width: usize, height: usize, rectangles: usize) {
    let cells = width * height;
    log::info!(
        "{}: {}x{} grid ({} cells) decomposed into {} rectangles",
        label,
        width,
        height,
        cells,
        rectangles
    );
}
