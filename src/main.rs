fn main() {
    if let Err(err) = ticket_scrape_lib::run() {
        tracing::error!("{err:#}");
        std::process::exit(1);
    }
}
