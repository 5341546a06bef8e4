use std::io::Write;
use std::sync::Once;

static INIT: Once = Once::new();

/// Install the process-wide logger. `RUST_LOG` overrides the default `info` filter.
/// Safe to call more than once; only the first call has an effect.
pub fn init() {
    INIT.call_once(|| {
        let mut builder =
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
        builder.format(|buf, record| {
            let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
            writeln!(buf, "[{}] {:<5} {}", timestamp, record.level(), record.args())
        });

        if builder.try_init().is_ok() {
            log::info!("=== TusaBot stories v{} started ===", env!("CARGO_PKG_VERSION"));
            log::info!("OS: {}", std::env::consts::OS);
            log::info!("Arch: {}", std::env::consts::ARCH);
        }
    });
}
