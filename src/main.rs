// LegalEase server entry point

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    legalease_lib::run().await
}
