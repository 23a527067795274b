#[tokio::main]
async fn main() -> anyhow::Result<()> {
    openalgo_trending_oi::run().await
}
