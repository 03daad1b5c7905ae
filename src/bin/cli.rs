use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    tutorhub::install_crypto_provider();
    tutorhub::cli::run().await
}
