#[tokio::main]
async fn main() -> anyhow::Result<()> {
    macro_feed_lib::run().await
}
