use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = caldera::cli::Cli::parse();
    if let Err(e) = caldera::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
