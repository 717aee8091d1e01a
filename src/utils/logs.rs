// installs the global subscriber; log lines are json so the collector can index fields
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        // disable printing the name of the module in every log line.
        .with_target(false)
        // ANSI color codes end up as garbage in collected logs.
        .with_ansi(false)
        // the collector adds the ingestion time.
        .without_time()
        .json()
        .init();
}
