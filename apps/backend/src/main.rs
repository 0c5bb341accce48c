#[tokio::main]
async fn main() -> anyhow::Result<()> {
    studyhub_backend::run().await
}
