use tracing_subscriber::EnvFilter;

/// Used when neither `RUST_LOG` nor the build-time `LOG_DIRECTIVES` say otherwise. Kept quiet so logs don't fight the spinner.
const DEFAULT_DIRECTIVES: &str = "warn";

/// Install the global subscriber. Logs always go to stderr; stdout is reserved for command output.
pub fn init(json: bool) {
	let filter = EnvFilter::try_from_default_env()
		.or_else(|_| EnvFilter::try_new(option_env!("LOG_DIRECTIVES").unwrap_or(DEFAULT_DIRECTIVES)))
		.unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

	let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
	if json {
		builder.json().init();
	} else {
		builder.with_target(false).init();
	}
}
